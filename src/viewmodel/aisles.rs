//! Aisle list screen state.

use super::failure;
use crate::{core::aisle, models::Aisle};
use sea_orm::DatabaseConnection;
use tracing::warn;

/// Aisles, a client-side name filter and membership edits.
#[derive(Debug)]
pub struct AislesViewModel {
    db: DatabaseConnection,
    /// Aisles as last fetched
    pub aisles: Vec<Aisle>,
    /// Case-insensitive name filter applied by [`AislesViewModel::filtered_aisles`]
    pub filter_text: String,
    /// Description of the last failed operation
    pub error: Option<String>,
    /// Whether an operation is running
    pub is_loading: bool,
}

impl AislesViewModel {
    /// Creates an empty view-model over `db`.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            aisles: Vec::new(),
            filter_text: String::new(),
            error: None,
            is_loading: false,
        }
    }

    /// Aisles whose name contains the filter text, ignoring case.
    #[must_use]
    pub fn filtered_aisles(&self) -> Vec<&Aisle> {
        let needle = self.filter_text.to_lowercase();
        self.aisles
            .iter()
            .filter(|aisle| needle.is_empty() || aisle.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Reloads every aisle.
    pub async fn fetch_aisles(&mut self) {
        self.error = None;
        self.is_loading = true;

        match aisle::fetch_all_aisles(&self.db).await {
            Ok(aisles) => self.aisles = aisles,
            Err(e) => self.error = Some(failure("fetching aisles", &e)),
        }

        self.is_loading = false;
    }

    /// Adds a medicine to the aisle called `aisle_name`, reloading aisles first.
    pub async fn add(&mut self, medicine_id: &str, aisle_name: &str) {
        self.edit_membership(medicine_id, aisle_name, true).await;
    }

    /// Removes a medicine from the aisle called `aisle_name`, reloading aisles first.
    pub async fn remove(&mut self, medicine_id: &str, aisle_name: &str) {
        self.edit_membership(medicine_id, aisle_name, false).await;
    }

    async fn edit_membership(&mut self, medicine_id: &str, aisle_name: &str, add: bool) {
        let operation = if add {
            "adding medicine to aisle"
        } else {
            "removing medicine from aisle"
        };

        self.fetch_aisles().await;
        self.error = None;
        self.is_loading = true;

        let Some(index) = self.aisles.iter().position(|aisle| aisle.name == aisle_name) else {
            warn!("Error {}: no aisle named {}", operation, aisle_name);
            self.error = Some(operation.to_string());
            self.is_loading = false;
            return;
        };

        let result = if add {
            aisle::add_medicine_to_aisle(&self.db, &self.aisles[index], medicine_id).await
        } else {
            aisle::remove_medicine_from_aisle(&self.db, &self.aisles[index], medicine_id).await
        };

        match result {
            Ok(updated) => self.aisles[index] = updated,
            Err(e) => self.error = Some(failure(operation, &e)),
        }

        self.is_loading = false;
    }
}
