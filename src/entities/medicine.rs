//! Medicine entity - A medicine tracked in the inventory.
//!
//! Each medicine carries its current stock, the name of the aisle it is shelved in,
//! three advisory thresholds (normal, warning, alert) and display attributes.
//! Field names serialize in the camelCase form used by stored documents.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Medicine database model
#[derive(Clone, Debug, PartialEq, Eq, Hash, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "medicines")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier (UUID string)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name (e.g., "Doliprane 500mg")
    pub name: String,
    /// Units currently in stock
    pub stock: i32,
    /// Name of the aisle the medicine is stored in
    pub aisle: String,
    /// Target stock level
    pub normal_stock: i32,
    /// Stock level at or below which the medicine is flagged as low
    pub warning_stock: i32,
    /// Stock level at or below which the medicine is flagged as critical
    pub alert_stock: i32,
    /// Symbol name shown next to the medicine
    pub icon: String,
    /// Icon colour as hex digits (e.g., `"6495ED"`)
    pub color: String,
}

/// Medicines have no foreign keys; history and aisle membership reference them by id
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
