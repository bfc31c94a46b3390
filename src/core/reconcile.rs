//! Builds the history entries that describe a change to a medicine.
//!
//! Stock, aisle and name are compared independently, so a single edit produces between
//! zero and three entries. Nothing here touches the database; callers persist the result.

use crate::entities::{history_entry, medicine};
use chrono::Utc;
use uuid::Uuid;

/// Creates a history entry stamped with a fresh id and the current time.
#[must_use]
pub fn new_entry(
    medicine_id: &str,
    user: &str,
    action: String,
    details: String,
    current_stock: i32,
) -> history_entry::Model {
    history_entry::Model {
        id: Uuid::new_v4().to_string(),
        medicine_id: medicine_id.to_string(),
        user: user.to_string(),
        action,
        details,
        timestamp: Utc::now(),
        current_stock,
    }
}

/// Entry for a stock change from `old_stock` to `medicine.stock`, or `None` when the
/// stock did not move.
///
/// # Examples
/// A change from 2 to 5 yields action `"Increased stock of Doliprane by 3"` and details
/// `"a@b.c changed stock from 2 to 5"`.
#[must_use]
pub fn stock_change_entry(
    medicine: &medicine::Model,
    old_stock: i32,
    user: &str,
) -> Option<history_entry::Model> {
    let delta = i64::from(medicine.stock) - i64::from(old_stock);
    if delta == 0 {
        return None;
    }

    let direction = if delta > 0 { "Increased" } else { "Decreased" };
    Some(new_entry(
        &medicine.id,
        user,
        format!(
            "{direction} stock of {} by {}",
            medicine.name,
            delta.unsigned_abs()
        ),
        format!(
            "{user} changed stock from {old_stock} to {}",
            medicine.stock
        ),
        medicine.stock,
    ))
}

/// All entries describing the difference between the stored medicine and its edit.
///
/// Order is stock, aisle, name.
#[must_use]
pub fn diff_medicine(
    old: &medicine::Model,
    new: &medicine::Model,
    user: &str,
) -> Vec<history_entry::Model> {
    let mut entries = Vec::new();

    if let Some(entry) = stock_change_entry(new, old.stock, user) {
        entries.push(entry);
    }

    if old.aisle != new.aisle {
        entries.push(new_entry(
            &new.id,
            user,
            format!("Updated {}", new.name),
            format!("{user} changed aisle from {} to {}", old.aisle, new.aisle),
            new.stock,
        ));
    }

    if old.name != new.name {
        entries.push(new_entry(
            &new.id,
            user,
            format!("Updated {}", new.name),
            format!("{user} changed name from {} to {}", old.name, new.name),
            new.stock,
        ));
    }

    entries
}

/// Entry recorded when a medicine is first added.
#[must_use]
pub fn creation_entry(medicine: &medicine::Model, user: &str) -> history_entry::Model {
    let action = format!(
        "Created {} with initial stock of {}",
        medicine.name, medicine.stock
    );
    let details = format!("{user} {action}");
    new_entry(&medicine.id, user, action, details, medicine.stock)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::test_medicine;

    const USER: &str = "user@test.app";

    #[test]
    fn test_stock_increase_entry() {
        let mut medicine = test_medicine("1", "Doliprane", "Pills");
        medicine.stock = 5;

        let entry = stock_change_entry(&medicine, 2, USER).unwrap();
        assert_eq!(entry.action, "Increased stock of Doliprane by 3");
        assert_eq!(entry.details, "user@test.app changed stock from 2 to 5");
        assert_eq!(entry.current_stock, 5);
        assert_eq!(entry.medicine_id, "1");
        assert_eq!(entry.user, USER);
    }

    #[test]
    fn test_stock_decrease_reports_magnitude() {
        let mut medicine = test_medicine("1", "Doliprane", "Pills");
        medicine.stock = 1;

        let entry = stock_change_entry(&medicine, 4, USER).unwrap();
        assert_eq!(entry.action, "Decreased stock of Doliprane by 3");
        assert!(entry.details.contains("from 4 to 1"));
    }

    #[test]
    fn test_unchanged_stock_has_no_entry() {
        let medicine = test_medicine("1", "Doliprane", "Pills");
        assert!(stock_change_entry(&medicine, medicine.stock, USER).is_none());
    }

    #[test]
    fn test_diff_identical_medicine_is_empty() {
        let medicine = test_medicine("1", "Doliprane", "Pills");
        assert!(diff_medicine(&medicine, &medicine.clone(), USER).is_empty());
    }

    #[test]
    fn test_diff_reports_each_changed_fact() {
        let old = test_medicine("1", "Doliprane", "Pills");
        let mut new = old.clone();
        new.stock = old.stock + 2;
        new.aisle = "Syrups".to_string();
        new.name = "Doliprane 1000".to_string();

        let entries = diff_medicine(&old, &new, USER);
        assert_eq!(entries.len(), 3);
        assert!(entries[0].action.starts_with("Increased"));
        assert_eq!(entries[1].action, "Updated Doliprane 1000");
        assert_eq!(
            entries[1].details,
            "user@test.app changed aisle from Pills to Syrups"
        );
        assert_eq!(
            entries[2].details,
            "user@test.app changed name from Doliprane to Doliprane 1000"
        );
        assert!(entries.iter().all(|entry| entry.current_stock == new.stock));

        // Every entry gets its own id
        assert_ne!(entries[0].id, entries[1].id);
        assert_ne!(entries[1].id, entries[2].id);
    }

    #[test]
    fn test_diff_aisle_only() {
        let old = test_medicine("1", "Doliprane", "Pills");
        let mut new = old.clone();
        new.aisle = "Syrups".to_string();

        let entries = diff_medicine(&old, &new, USER);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].details.contains("changed aisle"));
    }

    #[test]
    fn test_creation_entry() {
        let medicine = test_medicine("1", "Doliprane", "Pills");
        let entry = creation_entry(&medicine, USER);
        assert_eq!(
            entry.action,
            format!("Created Doliprane with initial stock of {}", medicine.stock)
        );
        assert_eq!(entry.details, format!("{USER} {}", entry.action));
        assert_eq!(entry.current_stock, medicine.stock);
    }
}
