//! History business logic - Append-only audit log of medicine changes.
//!
//! Entries are written once and never edited. They are read back newest first and
//! removed only together with the medicine they describe.

use crate::{
    entities::{HistoryEntry, history_entry},
    errors::Result,
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Persists a history entry.
pub async fn add_history<C>(db: &C, entry: &history_entry::Model) -> Result<history_entry::Model>
where
    C: ConnectionTrait,
{
    let model = history_entry::ActiveModel {
        id: Set(entry.id.clone()),
        medicine_id: Set(entry.medicine_id.clone()),
        user: Set(entry.user.clone()),
        action: Set(entry.action.clone()),
        details: Set(entry.details.clone()),
        timestamp: Set(entry.timestamp),
        current_stock: Set(entry.current_stock),
    };
    model.insert(db).await.map_err(Into::into)
}

/// Retrieves the history of one medicine, newest first.
pub async fn fetch_history(
    db: &DatabaseConnection,
    medicine_id: &str,
) -> Result<Vec<history_entry::Model>> {
    HistoryEntry::find()
        .filter(history_entry::Column::MedicineId.eq(medicine_id))
        .order_by_desc(history_entry::Column::Timestamp)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes every entry of one medicine and returns how many were removed.
pub async fn delete_history<C>(db: &C, medicine_id: &str) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = HistoryEntry::delete_many()
        .filter(history_entry::Column::MedicineId.eq(medicine_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
