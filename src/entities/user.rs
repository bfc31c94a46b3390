//! User entity - Profile information of an authenticated account.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User profile database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Identifier issued by the auth provider
    #[sea_orm(primary_key, auto_increment = false)]
    pub uid: String,
    /// Account email
    pub email: String,
    /// Display name
    pub fullname: String,
    /// Location of the profile picture, empty when none was uploaded
    #[serde(rename = "imageURL")]
    pub image_url: String,
}

/// `User` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
