//! Medicine business logic - Handles all medicine-related operations.
//!
//! This module provides functions for creating, retrieving, updating and deleting medicines.
//! Inputs are validated before any database access: names must not be empty and stock
//! values must not be negative. Deleting a medicine also removes its history and its
//! aisle membership in the same database transaction.

use crate::{
    core::{aisle, history, reconcile},
    entities::{Medicine, history_entry, medicine},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{debug, info, instrument};

/// Checks the fields a medicine must satisfy before it is written.
///
/// # Errors
/// Returns an error if:
/// - The name or the aisle is empty or whitespace-only
/// - Any of stock, normal, warning or alert stock is negative
pub fn validate_medicine(medicine: &medicine::Model) -> Result<()> {
    if medicine.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Medicine name cannot be empty".to_string(),
        });
    }

    if medicine.aisle.trim().is_empty() {
        return Err(Error::Validation {
            message: "Medicine aisle cannot be empty".to_string(),
        });
    }

    for stock in [
        medicine.stock,
        medicine.normal_stock,
        medicine.warning_stock,
        medicine.alert_stock,
    ] {
        if stock < 0 {
            return Err(Error::InvalidStock { stock });
        }
    }

    Ok(())
}

/// Retrieves a medicine by its id.
pub async fn get_medicine_by_id<C>(db: &C, id: &str) -> Result<Option<medicine::Model>>
where
    C: ConnectionTrait,
{
    Medicine::find_by_id(id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every medicine, ordered alphabetically by name.
pub async fn get_all_medicines(db: &DatabaseConnection) -> Result<Vec<medicine::Model>> {
    Medicine::find()
        .order_by_asc(medicine::Column::Name)
        .order_by_asc(medicine::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Whether a medicine with exactly this name is already stored.
///
/// Used as a conflict check before inserting; it counts matching rows instead of
/// loading them.
pub async fn medicine_name_exists(db: &DatabaseConnection, name: &str) -> Result<bool> {
    let count = Medicine::find()
        .filter(medicine::Column::Name.eq(name))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Inserts a new medicine.
///
/// # Errors
/// Returns an error if validation fails or the insert fails (for instance when the id
/// is already taken).
#[instrument(skip(db, medicine), fields(id = %medicine.id, name = %medicine.name))]
pub async fn add_medicine(
    db: &DatabaseConnection,
    medicine: &medicine::Model,
) -> Result<medicine::Model> {
    validate_medicine(medicine)?;

    let model = medicine::ActiveModel {
        id: Set(medicine.id.clone()),
        name: Set(medicine.name.trim().to_string()),
        stock: Set(medicine.stock),
        aisle: Set(medicine.aisle.clone()),
        normal_stock: Set(medicine.normal_stock),
        warning_stock: Set(medicine.warning_stock),
        alert_stock: Set(medicine.alert_stock),
        icon: Set(medicine.icon.clone()),
        color: Set(medicine.color.clone()),
    };
    let inserted = model.insert(db).await?;
    info!("Added medicine {}", inserted.name);
    Ok(inserted)
}

/// Overwrites every field of an existing medicine.
///
/// # Errors
/// Returns an error if validation fails, the medicine does not exist, or the update fails.
#[instrument(skip(db, medicine), fields(id = %medicine.id))]
pub async fn update_medicine(
    db: &DatabaseConnection,
    medicine: &medicine::Model,
) -> Result<medicine::Model> {
    validate_medicine(medicine)?;

    let mut stored: medicine::ActiveModel = get_medicine_by_id(db, &medicine.id)
        .await?
        .ok_or_else(|| Error::MedicineNotFound {
            id: medicine.id.clone(),
        })?
        .into();

    stored.name = Set(medicine.name.trim().to_string());
    stored.stock = Set(medicine.stock);
    stored.aisle = Set(medicine.aisle.clone());
    stored.normal_stock = Set(medicine.normal_stock);
    stored.warning_stock = Set(medicine.warning_stock);
    stored.alert_stock = Set(medicine.alert_stock);
    stored.icon = Set(medicine.icon.clone());
    stored.color = Set(medicine.color.clone());

    stored.update(db).await.map_err(Into::into)
}

/// Sets only the stock field of a medicine.
///
/// # Errors
/// Returns an error if:
/// - The stock is negative
/// - No medicine has this id
/// - The database update fails
pub async fn update_stock<C>(db: &C, id: &str, stock: i32) -> Result<()>
where
    C: ConnectionTrait,
{
    if stock < 0 {
        return Err(Error::InvalidStock { stock });
    }

    let result = Medicine::update_many()
        .col_expr(medicine::Column::Stock, Expr::value(stock))
        .filter(medicine::Column::Id.eq(id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::MedicineNotFound { id: id.to_string() });
    }

    Ok(())
}

/// Persists a new stock value and the history entry describing the change.
///
/// The previous value is read from storage, so repeating a call with the same target
/// writes nothing and returns `None`. Stock and history are written in one transaction.
#[instrument(skip(db))]
pub async fn record_stock_change(
    db: &DatabaseConnection,
    id: &str,
    stock: i32,
    user: &str,
) -> Result<Option<history_entry::Model>> {
    if stock < 0 {
        return Err(Error::InvalidStock { stock });
    }

    let txn = db.begin().await?;

    let stored = get_medicine_by_id(&txn, id)
        .await?
        .ok_or_else(|| Error::MedicineNotFound { id: id.to_string() })?;

    let updated = medicine::Model {
        stock,
        ..stored.clone()
    };
    let Some(entry) = reconcile::stock_change_entry(&updated, stored.stock, user) else {
        debug!("Stock of {} already at {}", id, stock);
        return Ok(None);
    };

    update_stock(&txn, id, stock).await?;
    let entry = history::add_history(&txn, &entry).await?;

    txn.commit().await?;
    Ok(Some(entry))
}

/// Deletes medicines together with their history and aisle membership.
///
/// Each medicine is removed in its own transaction; a failure stops the loop and leaves
/// the medicines already processed deleted.
#[instrument(skip(db, medicines), fields(count = medicines.len()))]
pub async fn delete_medicines(db: &DatabaseConnection, medicines: &[medicine::Model]) -> Result<()> {
    for medicine in medicines {
        let txn = db.begin().await?;

        let removed_history = history::delete_history(&txn, &medicine.id).await?;
        aisle::remove_medicine_from_all_aisles(&txn, &medicine.id).await?;
        Medicine::delete_by_id(medicine.id.clone())
            .exec(&txn)
            .await?;

        txn.commit().await?;
        debug!(
            "Deleted medicine {} and {} history entries",
            medicine.id, removed_history
        );
    }
    Ok(())
}
