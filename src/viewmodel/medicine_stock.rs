//! Medicine list screen state.
//!
//! Holds the pages of medicines loaded so far, the history of the medicine being viewed,
//! and the derived views the screens display. Edits go through the core operations and
//! then update the loaded lists in place.

use super::{AislesViewModel, StockDebouncer, failure};
use crate::{
    config::settings::InventorySettings,
    core::{history, medicine as medicines, pagination::MedicinePager, reconcile},
    entities::{history_entry, medicine},
    models::{SortOption, StockLevel},
};
use sea_orm::DatabaseConnection;
use std::{collections::BTreeSet, time::Duration};
use tracing::{debug, warn};

/// Medicines, their history and the stock edits made from the list screens.
#[derive(Debug)]
pub struct MedicineStockViewModel {
    db: DatabaseConnection,
    pager: MedicinePager,
    debouncer: StockDebouncer,
    /// Medicines loaded so far, in fetch order
    pub medicines: Vec<medicine::Model>,
    /// History of the medicine last viewed, newest first
    pub history: Vec<history_entry::Model>,
    /// Name filter; sent as an exact match when fetching and applied as a
    /// case-insensitive substring by [`MedicineStockViewModel::filtered_medicines`]
    pub filter_text: String,
    /// Sort applied when fetching and by [`MedicineStockViewModel::filtered_medicines`]
    pub sort_option: SortOption,
    /// Reverse the client-side sort
    pub sort_descending: bool,
    /// Description of the last failed operation
    pub error: Option<String>,
    /// Whether an operation is running
    pub is_loading: bool,
}

impl MedicineStockViewModel {
    /// Creates an empty view-model with the configured page size and debounce delay.
    #[must_use]
    pub fn new(db: DatabaseConnection, settings: &InventorySettings) -> Self {
        Self {
            db,
            pager: MedicinePager::new(settings.page_size),
            debouncer: StockDebouncer::new(Duration::from_millis(settings.stock_debounce_ms)),
            medicines: Vec::new(),
            history: Vec::new(),
            filter_text: String::new(),
            sort_option: SortOption::None,
            sort_descending: false,
            error: None,
            is_loading: false,
        }
    }

    /// Loads the first page, or appends the next one when `fetch_next` is set.
    pub async fn fetch_medicines(&mut self, fetch_next: bool) {
        self.error = None;
        self.is_loading = true;

        match self
            .pager
            .fetch_medicines(&self.db, self.sort_option, &self.filter_text, fetch_next)
            .await
        {
            Ok(page) if fetch_next => self.medicines.extend(page),
            Ok(page) => self.medicines = page,
            Err(e) => self.error = Some(failure("fetching medicines", &e)),
        }

        self.is_loading = false;
    }

    /// Sorted, de-duplicated aisle names of the loaded medicines.
    #[must_use]
    pub fn aisles(&self) -> Vec<String> {
        self.medicines
            .iter()
            .map(|medicine| medicine.aisle.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Loaded medicines whose name contains the filter text (ignoring case), sorted by
    /// the sort option.
    #[must_use]
    pub fn filtered_medicines(&self) -> Vec<&medicine::Model> {
        let needle = self.filter_text.to_lowercase();
        let mut filtered: Vec<&medicine::Model> = self
            .medicines
            .iter()
            .filter(|medicine| needle.is_empty() || medicine.name.to_lowercase().contains(&needle))
            .collect();

        match self.sort_option {
            SortOption::None => {}
            SortOption::Name => {
                filtered.sort_by_key(|medicine| medicine.name.to_lowercase());
            }
            SortOption::Stock => filtered.sort_by_key(|medicine| medicine.stock),
        }
        if self.sort_descending {
            filtered.reverse();
        }

        filtered
    }

    /// Loaded medicines above their alert threshold but at or below their warning threshold.
    #[must_use]
    pub fn warning_medicines(&self) -> Vec<&medicine::Model> {
        self.medicines
            .iter()
            .filter(|medicine| StockLevel::classify(medicine) == StockLevel::Warning)
            .collect()
    }

    /// Loaded medicines at or below their alert threshold.
    #[must_use]
    pub fn alert_medicines(&self) -> Vec<&medicine::Model> {
        self.medicines
            .iter()
            .filter(|medicine| StockLevel::classify(medicine).is_alert())
            .collect()
    }

    /// Loaded medicines shelved in `aisle`, sorted by name.
    #[must_use]
    pub fn medicines_in_aisle(&self, aisle: &str) -> Vec<&medicine::Model> {
        let mut in_aisle: Vec<&medicine::Model> = self
            .medicines
            .iter()
            .filter(|medicine| medicine.aisle == aisle)
            .collect();
        in_aisle.sort_by(|a, b| a.name.cmp(&b.name));
        in_aisle
    }

    /// Deletes the medicines at `offsets` in the loaded list, then reloads the first page.
    ///
    /// Offsets outside the list are ignored.
    pub async fn delete_medicines(&mut self, offsets: &[usize]) {
        self.error = None;
        self.is_loading = true;

        let to_delete: Vec<medicine::Model> = offsets
            .iter()
            .filter_map(|&offset| self.medicines.get(offset).cloned())
            .collect();
        for medicine in &to_delete {
            self.debouncer.cancel(&medicine.id);
        }

        match medicines::delete_medicines(&self.db, &to_delete).await {
            Ok(()) => self.fetch_medicines(false).await,
            Err(e) => self.error = Some(failure("deleting medicines", &e)),
        }

        self.is_loading = false;
    }

    /// Sets the stock of a loaded medicine and records the change.
    ///
    /// Negative values are clamped to zero. Setting the value the medicine already has
    /// writes nothing. A debounced write still pending for the medicine is dropped.
    pub async fn update_stock(&mut self, medicine_id: &str, stock: i32, user: &str) {
        self.error = None;
        let Some(index) = self.index_of(medicine_id) else {
            self.error = Some("updating medicines".to_string());
            return;
        };
        self.is_loading = true;
        self.debouncer.cancel(medicine_id);

        let stock = stock.max(0);
        match medicines::record_stock_change(&self.db, medicine_id, stock, user).await {
            Ok(entry) => {
                self.medicines[index].stock = stock;
                if let Some(entry) = entry {
                    self.push_history(entry);
                }
            }
            Err(e) => self.error = Some(failure("updating stock", &e)),
        }

        self.is_loading = false;
    }

    /// Shows a new stock value at once and persists it after the debounce delay.
    ///
    /// A further call for the same medicine before the delay elapses replaces this one, so
    /// only the settled value is written (with a single history entry).
    pub fn schedule_stock_update(&mut self, medicine_id: &str, stock: i32, user: &str) {
        self.error = None;
        let Some(index) = self.index_of(medicine_id) else {
            self.error = Some("updating medicines".to_string());
            return;
        };

        let stock = stock.max(0);
        self.medicines[index].stock = stock;

        let db = self.db.clone();
        let id = medicine_id.to_string();
        let user = user.to_string();
        self.debouncer.schedule(medicine_id, async move {
            match medicines::record_stock_change(&db, &id, stock, &user).await {
                Ok(Some(_)) => debug!("Persisted stock {} for {}", stock, id),
                Ok(None) => debug!("Stock for {} unchanged", id),
                Err(e) => warn!("Error updating stock: {}", e),
            }
        });
    }

    /// Number of debounced stock writes still waiting.
    #[must_use]
    pub fn pending_stock_updates(&self) -> usize {
        self.debouncer.pending_count()
    }

    /// Saves an edited medicine, records what changed and keeps aisle membership in sync.
    ///
    /// Changes are measured against the stored medicine, so a pending debounced stock
    /// value is dropped and its change recorded here instead.
    ///
    /// Steps run in order (medicine, history entries, aisle membership) and stop at the
    /// first failure; earlier writes are kept.
    pub async fn update_medicine(&mut self, edited: &medicine::Model, user: &str) {
        self.error = None;
        let Some(index) = self.index_of(&edited.id) else {
            self.error = Some("updating medicines".to_string());
            return;
        };
        self.is_loading = true;
        self.debouncer.cancel(&edited.id);

        // The loaded copy may already show a debounced stock that was never written
        let previous = match medicines::get_medicine_by_id(&self.db, &edited.id).await {
            Ok(Some(stored)) => stored,
            Ok(None) => self.medicines[index].clone(),
            Err(e) => {
                self.error = Some(failure("updating medicines", &e));
                self.is_loading = false;
                return;
            }
        };
        if let Err(message) = self.persist_edit(&previous, edited, user).await {
            self.error = Some(message);
        }

        self.is_loading = false;
    }

    async fn persist_edit(
        &mut self,
        previous: &medicine::Model,
        edited: &medicine::Model,
        user: &str,
    ) -> Result<(), String> {
        let stored = medicines::update_medicine(&self.db, edited)
            .await
            .map_err(|e| failure("updating medicines", &e))?;
        if let Some(slot) = self.medicines.iter_mut().find(|m| m.id == stored.id) {
            *slot = stored.clone();
        }

        for entry in reconcile::diff_medicine(previous, &stored, user) {
            let entry = history::add_history(&self.db, &entry)
                .await
                .map_err(|e| failure("adding change to history", &e))?;
            self.push_history(entry);
        }

        if previous.aisle != stored.aisle {
            let mut aisles = AislesViewModel::new(self.db.clone());
            aisles.remove(&stored.id, &previous.aisle).await;
            if let Some(message) = aisles.error.take() {
                return Err(message);
            }
            aisles.add(&stored.id, &stored.aisle).await;
            if let Some(message) = aisles.error.take() {
                return Err(message);
            }
        }

        Ok(())
    }

    /// Loads the history of `medicine`, newest first.
    pub async fn fetch_history(&mut self, medicine: &medicine::Model) {
        self.error = None;
        self.is_loading = true;

        match history::fetch_history(&self.db, &medicine.id).await {
            Ok(entries) => {
                self.history = entries;
                self.sort_history();
            }
            Err(e) => {
                self.error = Some(failure(format!("fetching history for {}", medicine.name), &e));
            }
        }

        self.is_loading = false;
    }

    fn index_of(&self, medicine_id: &str) -> Option<usize> {
        self.medicines
            .iter()
            .position(|medicine| medicine.id == medicine_id)
    }

    fn push_history(&mut self, entry: history_entry::Model) {
        self.history.push(entry);
        self.sort_history();
    }

    fn sort_history(&mut self) {
        self.history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    }
}
