//! Aisle business logic - Aisles and the medicines shelved in them.
//!
//! Membership is stored in the `aisle_medicines` join table, keyed by aisle id and
//! medicine id, with a position giving insertion order. Every membership write first
//! bumps the aisle's `version` with a conditional update on the version the caller read;
//! if another writer got there first the update matches no row and the write is refused
//! with [`Error::AisleConflict`] instead of silently overwriting their change.

use crate::{
    config::settings::AisleConfig,
    entities::{AisleEntity, AisleMedicine, aisle, aisle_medicine},
    errors::{Error, Result},
    models::Aisle,
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Retrieves every aisle with its medicines in insertion order, sorted by aisle name.
pub async fn fetch_all_aisles(db: &DatabaseConnection) -> Result<Vec<Aisle>> {
    let aisles = AisleEntity::find()
        .order_by_asc(aisle::Column::Name)
        .all(db)
        .await?;

    let memberships = AisleMedicine::find()
        .order_by_asc(aisle_medicine::Column::AisleId)
        .order_by_asc(aisle_medicine::Column::Position)
        .all(db)
        .await?;

    let mut by_aisle: HashMap<String, Vec<String>> = HashMap::new();
    for membership in memberships {
        by_aisle
            .entry(membership.aisle_id)
            .or_default()
            .push(membership.medicine_id);
    }

    Ok(aisles
        .into_iter()
        .map(|model| {
            let medicines = by_aisle.remove(&model.id).unwrap_or_default();
            Aisle::from_parts(model, medicines)
        })
        .collect())
}

/// Finds an aisle by its exact name.
pub async fn get_aisle_by_name<C>(db: &C, name: &str) -> Result<Option<Aisle>>
where
    C: ConnectionTrait,
{
    let Some(model) = AisleEntity::find()
        .filter(aisle::Column::Name.eq(name))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    let medicines = medicine_ids(db, &model.id).await?;
    Ok(Some(Aisle::from_parts(model, medicines)))
}

async fn medicine_ids<C>(db: &C, aisle_id: &str) -> Result<Vec<String>>
where
    C: ConnectionTrait,
{
    let memberships = AisleMedicine::find()
        .filter(aisle_medicine::Column::AisleId.eq(aisle_id))
        .order_by_asc(aisle_medicine::Column::Position)
        .all(db)
        .await?;
    Ok(memberships
        .into_iter()
        .map(|membership| membership.medicine_id)
        .collect())
}

/// Creates an aisle together with any medicines already listed on it.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or whitespace-only
/// - An aisle with the same name exists
/// - The database insert fails
#[instrument(skip(db, new_aisle), fields(name = %new_aisle.name))]
pub async fn add_aisle(db: &DatabaseConnection, new_aisle: &Aisle) -> Result<Aisle> {
    let name = new_aisle.name.trim();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "Aisle name cannot be empty".to_string(),
        });
    }

    let txn = db.begin().await?;

    let existing = AisleEntity::find()
        .filter(aisle::Column::Name.eq(name))
        .count(&txn)
        .await?;
    if existing > 0 {
        return Err(Error::DuplicateAisle {
            name: name.to_string(),
        });
    }

    let model = aisle::ActiveModel {
        id: Set(new_aisle.id.clone()),
        name: Set(name.to_string()),
        icon: Set(new_aisle.icon.clone()),
        color: Set(new_aisle.color.clone()),
        version: Set(0),
    }
    .insert(&txn)
    .await?;

    let mut medicines: Vec<String> = Vec::with_capacity(new_aisle.medicines.len());
    for medicine_id in &new_aisle.medicines {
        if medicines.contains(medicine_id) {
            continue;
        }
        insert_membership(&txn, &model.id, medicine_id, medicines.len()).await?;
        medicines.push(medicine_id.clone());
    }

    txn.commit().await?;
    info!("Created aisle {}", model.name);
    Ok(Aisle::from_parts(model, medicines))
}

async fn insert_membership<C>(
    db: &C,
    aisle_id: &str,
    medicine_id: &str,
    position: usize,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let position = i64::try_from(position).map_err(|e| Error::Validation {
        message: format!("Aisle position out of range: {e}"),
    })?;

    aisle_medicine::ActiveModel {
        aisle_id: Set(aisle_id.to_string()),
        medicine_id: Set(medicine_id.to_string()),
        position: Set(position),
    }
    .insert(db)
    .await?;
    Ok(())
}

/// Increments the aisle version if it still equals the version the caller read.
async fn bump_version<C>(db: &C, aisle: &Aisle) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = AisleEntity::update_many()
        .col_expr(
            aisle::Column::Version,
            Expr::col(aisle::Column::Version).add(1),
        )
        .filter(aisle::Column::Id.eq(aisle.id.as_str()))
        .filter(aisle::Column::Version.eq(aisle.version))
        .exec(db)
        .await?;

    if result.rows_affected > 0 {
        return Ok(());
    }

    if AisleEntity::find_by_id(aisle.id.clone())
        .one(db)
        .await?
        .is_none()
    {
        return Err(Error::AisleNotFound {
            name: aisle.name.clone(),
        });
    }

    Err(Error::AisleConflict {
        name: aisle.name.clone(),
        expected: aisle.version,
    })
}

/// Appends a medicine to an aisle unless it is already shelved there.
///
/// # Arguments
/// * `db` - Database connection
/// * `aisle` - Aisle as read by the caller; its `version` must still be current
/// * `medicine_id` - Medicine to add
///
/// # Returns
/// The aisle as stored after the write.
#[instrument(skip(db, aisle), fields(aisle = %aisle.name))]
pub async fn add_medicine_to_aisle(
    db: &DatabaseConnection,
    aisle: &Aisle,
    medicine_id: &str,
) -> Result<Aisle> {
    let txn = db.begin().await?;

    bump_version(&txn, aisle).await?;

    let mut medicines = medicine_ids(&txn, &aisle.id).await?;
    if medicines.iter().any(|id| id == medicine_id) {
        debug!("Medicine {} already in aisle {}", medicine_id, aisle.name);
    } else {
        let next_position = match AisleMedicine::find()
            .filter(aisle_medicine::Column::AisleId.eq(aisle.id.as_str()))
            .order_by_desc(aisle_medicine::Column::Position)
            .one(&txn)
            .await?
        {
            Some(last) => usize::try_from(last.position + 1).unwrap_or(medicines.len()),
            None => 0,
        };
        insert_membership(&txn, &aisle.id, medicine_id, next_position).await?;
        medicines.push(medicine_id.to_string());
    }

    txn.commit().await?;

    Ok(Aisle {
        medicines,
        version: aisle.version + 1,
        ..aisle.clone()
    })
}

/// Removes a medicine from an aisle.
///
/// # Returns
/// The aisle as stored after the write.
#[instrument(skip(db, aisle), fields(aisle = %aisle.name))]
pub async fn remove_medicine_from_aisle(
    db: &DatabaseConnection,
    aisle: &Aisle,
    medicine_id: &str,
) -> Result<Aisle> {
    let txn = db.begin().await?;

    bump_version(&txn, aisle).await?;

    AisleMedicine::delete_many()
        .filter(aisle_medicine::Column::AisleId.eq(aisle.id.as_str()))
        .filter(aisle_medicine::Column::MedicineId.eq(medicine_id))
        .exec(&txn)
        .await?;
    let medicines = medicine_ids(&txn, &aisle.id).await?;

    txn.commit().await?;

    Ok(Aisle {
        medicines,
        version: aisle.version + 1,
        ..aisle.clone()
    })
}

/// Reloads the aisle called `aisle_name` and adds the medicine to it.
///
/// # Errors
/// Returns [`Error::AisleNotFound`] without writing anything if no aisle has this name.
pub async fn add_medicine_to_named_aisle(
    db: &DatabaseConnection,
    aisle_name: &str,
    medicine_id: &str,
) -> Result<Aisle> {
    let aisle = get_aisle_by_name(db, aisle_name)
        .await?
        .ok_or_else(|| Error::AisleNotFound {
            name: aisle_name.to_string(),
        })?;
    add_medicine_to_aisle(db, &aisle, medicine_id).await
}

/// Reloads the aisle called `aisle_name` and removes the medicine from it.
///
/// # Errors
/// Returns [`Error::AisleNotFound`] without writing anything if no aisle has this name.
pub async fn remove_medicine_from_named_aisle(
    db: &DatabaseConnection,
    aisle_name: &str,
    medicine_id: &str,
) -> Result<Aisle> {
    let aisle = get_aisle_by_name(db, aisle_name)
        .await?
        .ok_or_else(|| Error::AisleNotFound {
            name: aisle_name.to_string(),
        })?;
    remove_medicine_from_aisle(db, &aisle, medicine_id).await
}

/// Drops a medicine from every aisle that lists it and bumps those aisles' versions.
///
/// Returns the number of memberships removed.
pub async fn remove_medicine_from_all_aisles<C>(db: &C, medicine_id: &str) -> Result<u64>
where
    C: ConnectionTrait,
{
    let aisle_ids: Vec<String> = AisleMedicine::find()
        .filter(aisle_medicine::Column::MedicineId.eq(medicine_id))
        .all(db)
        .await?
        .into_iter()
        .map(|membership| membership.aisle_id)
        .collect();

    if aisle_ids.is_empty() {
        return Ok(0);
    }

    let removed = AisleMedicine::delete_many()
        .filter(aisle_medicine::Column::MedicineId.eq(medicine_id))
        .exec(db)
        .await?;

    AisleEntity::update_many()
        .col_expr(
            aisle::Column::Version,
            Expr::col(aisle::Column::Version).add(1),
        )
        .filter(aisle::Column::Id.is_in(aisle_ids))
        .exec(db)
        .await?;

    Ok(removed.rows_affected)
}

/// Creates the configured aisles that do not exist yet.
///
/// Returns how many aisles were created.
pub async fn seed_aisles(db: &DatabaseConnection, aisles: &[AisleConfig]) -> Result<usize> {
    let mut created = 0;
    for config in aisles {
        if get_aisle_by_name(db, config.name.trim()).await?.is_some() {
            debug!("Aisle {} already exists, skipping", config.name);
            continue;
        }
        add_aisle(db, &Aisle::new(&config.name, &config.icon, &config.color)).await?;
        created += 1;
    }

    if created > 0 {
        info!("Seeded {} aisle(s) from configuration", created);
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_add_aisle_validation() -> Result<()> {
        let db = setup_test_db().await?;
        let result = add_aisle(&db, &Aisle::new("  ", "pills.fill", "6495ED")).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));
        assert!(fetch_all_aisles(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_add_aisle_and_fetch() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_aisle(&db, "Syrups").await?;
        create_test_aisle(&db, "Pills").await?;

        let aisles = fetch_all_aisles(&db).await?;
        let names: Vec<&str> = aisles.iter().map(|aisle| aisle.name.as_str()).collect();
        assert_eq!(names, vec!["Pills", "Syrups"]);
        assert!(aisles.iter().all(|aisle| aisle.medicines.is_empty()));
        assert!(aisles.iter().all(|aisle| aisle.version == 0));
        Ok(())
    }

    #[tokio::test]
    async fn test_add_aisle_keeps_listed_medicines() -> Result<()> {
        let db = setup_test_db().await?;
        let mut new_aisle = Aisle::new("Pills", "pills.fill", "6495ED");
        new_aisle.medicines = vec!["2".to_string(), "1".to_string(), "2".to_string()];

        let stored = add_aisle(&db, &new_aisle).await?;
        assert_eq!(stored.medicines, vec!["2".to_string(), "1".to_string()]);

        let reloaded = get_aisle_by_name(&db, "Pills").await?.unwrap();
        assert_eq!(reloaded, stored);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_aisle_duplicate_name() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_aisle(&db, "Pills").await?;

        let result = add_aisle(&db, &Aisle::new("Pills", "pills.fill", "6495ED")).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::DuplicateAisle { name: _ }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_membership_add_is_ordered_and_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let aisle = create_test_aisle(&db, "Pills").await?;

        let aisle = add_medicine_to_aisle(&db, &aisle, "b").await?;
        let aisle = add_medicine_to_aisle(&db, &aisle, "a").await?;
        let aisle = add_medicine_to_aisle(&db, &aisle, "b").await?;

        assert_eq!(aisle.medicines, vec!["b".to_string(), "a".to_string()]);
        assert_eq!(aisle.version, 3);

        let reloaded = get_aisle_by_name(&db, "Pills").await?.unwrap();
        assert_eq!(reloaded, aisle);
        Ok(())
    }

    #[tokio::test]
    async fn test_membership_remove() -> Result<()> {
        let db = setup_test_db().await?;
        let aisle = create_test_aisle(&db, "Pills").await?;
        let aisle = add_medicine_to_aisle(&db, &aisle, "1").await?;
        let aisle = add_medicine_to_aisle(&db, &aisle, "2").await?;

        let aisle = remove_medicine_from_aisle(&db, &aisle, "1").await?;
        assert_eq!(aisle.medicines, vec!["2".to_string()]);

        // Removing an absent medicine is not an error
        let aisle = remove_medicine_from_aisle(&db, &aisle, "1").await?;
        assert_eq!(aisle.medicines, vec!["2".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_stale_aisle_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let stale = create_test_aisle(&db, "Pills").await?;

        add_medicine_to_aisle(&db, &stale, "1").await?;

        let result = add_medicine_to_aisle(&db, &stale, "2").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::AisleConflict { name: _, expected: 0 }
        ));

        // The first writer's change survives and the rejected one left no trace
        let stored = get_aisle_by_name(&db, "Pills").await?.unwrap();
        assert_eq!(stored.medicines, vec!["1".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_named_aisle_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = add_medicine_to_named_aisle(&db, "Nowhere", "1").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::AisleNotFound { name: _ }
        ));
        let result = remove_medicine_from_named_aisle(&db, "Nowhere", "1").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::AisleNotFound { name: _ }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_named_aisle_reloads_before_writing() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_aisle(&db, "Pills").await?;

        add_medicine_to_named_aisle(&db, "Pills", "1").await?;
        let aisle = add_medicine_to_named_aisle(&db, "Pills", "2").await?;
        assert_eq!(aisle.medicines, vec!["1".to_string(), "2".to_string()]);

        let aisle = remove_medicine_from_named_aisle(&db, "Pills", "1").await?;
        assert_eq!(aisle.medicines, vec!["2".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_medicine_from_all_aisles() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_aisle(&db, "Pills").await?;
        create_test_aisle(&db, "Syrups").await?;
        add_medicine_to_named_aisle(&db, "Pills", "1").await?;
        add_medicine_to_named_aisle(&db, "Syrups", "1").await?;
        add_medicine_to_named_aisle(&db, "Syrups", "2").await?;

        assert_eq!(remove_medicine_from_all_aisles(&db, "1").await?, 2);
        assert_eq!(remove_medicine_from_all_aisles(&db, "1").await?, 0);

        let pills = get_aisle_by_name(&db, "Pills").await?.unwrap();
        let syrups = get_aisle_by_name(&db, "Syrups").await?.unwrap();
        assert!(pills.medicines.is_empty());
        assert_eq!(syrups.medicines, vec!["2".to_string()]);
        assert_eq!(pills.version, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_aisles_skips_existing() -> Result<()> {
        let db = setup_test_db().await?;
        let configs = vec![
            AisleConfig {
                name: "Pills".to_string(),
                icon: "pills.fill".to_string(),
                color: "6495ED".to_string(),
            },
            AisleConfig {
                name: "Syrups".to_string(),
                icon: "drop.fill".to_string(),
                color: "06ffb7".to_string(),
            },
        ];

        assert_eq!(seed_aisles(&db, &configs).await?, 2);
        assert_eq!(seed_aisles(&db, &configs).await?, 0);

        let syrups = get_aisle_by_name(&db, "Syrups").await?.unwrap();
        assert_eq!(syrups.icon, "drop.fill");
        assert_eq!(fetch_all_aisles(&db).await?.len(), 2);
        Ok(())
    }
}
