//! Account entity - Credentials owned by the database auth provider.
//!
//! Kept apart from `users` so profile documents never carry password material.

use sea_orm::entity::prelude::*;

/// Stored credentials for one account
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// Identifier handed out at sign-up
    #[sea_orm(primary_key, auto_increment = false)]
    pub uid: String,
    /// Login email, lowercase
    #[sea_orm(unique)]
    pub email: String,
    /// bcrypt hash of the password, salt included
    pub password_hash: String,
    /// When the account was created
    pub created_at: DateTimeUtc,
}

/// `Account` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
