//! Aisle membership entity - Join table between aisles and medicine ids.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One medicine shelved in one aisle
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "aisle_medicines")]
pub struct Model {
    /// Aisle the medicine belongs to
    #[sea_orm(primary_key, auto_increment = false)]
    pub aisle_id: String,
    /// Medicine identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub medicine_id: String,
    /// Insertion order within the aisle
    pub position: i64,
}

/// Defines relationships between memberships and aisles
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each membership belongs to one aisle
    #[sea_orm(
        belongs_to = "super::aisle::Entity",
        from = "Column::AisleId",
        to = "super::aisle::Column::Id"
    )]
    Aisle,
}

impl Related<super::aisle::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Aisle.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
