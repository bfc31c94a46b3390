//! Aisle entity - A named storage location.
//!
//! The ordered list of medicines stored in an aisle lives in the `aisle_medicines`
//! join table. `version` is bumped on every membership change so concurrent
//! read-modify-write cycles can be detected.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Aisle database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "aisles")]
pub struct Model {
    /// Unique identifier (UUID string)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Aisle name, unique across aisles
    #[sea_orm(unique)]
    pub name: String,
    /// Symbol name shown next to the aisle
    pub icon: String,
    /// Icon colour as hex digits
    pub color: String,
    /// Optimistic concurrency token
    pub version: i64,
}

/// Defines relationships between Aisle and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One aisle has many membership rows
    #[sea_orm(has_many = "super::aisle_medicine::Entity")]
    Memberships,
}

impl Related<super::aisle_medicine::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Memberships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
