//! History entry entity - Append-only audit log of medicine changes.
//!
//! Each entry records who changed which medicine, a short action label, a
//! human-readable description and the stock level right after the change.
//! `medicine_id` is a weak reference: entries are removed explicitly when their
//! medicine is deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// History entry database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "history")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Unique identifier (UUID string)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Medicine this entry describes
    #[sea_orm(indexed)]
    pub medicine_id: String,
    /// Who made the change (usually an email)
    pub user: String,
    /// Short label (e.g., `"Increased stock of Doliprane by 3"`)
    pub action: String,
    /// Longer description (e.g., `"a@b.c changed stock from 2 to 5"`)
    pub details: String,
    /// When the change happened
    pub timestamp: DateTimeUtc,
    /// Stock level after the change
    pub current_stock: i32,
}

/// `HistoryEntry` has no enforced relationships
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
