//! New medicine form.

use super::{AislesViewModel, failure};
use crate::{
    core::{aisle, color::Rgba, history, medicine as medicines, reconcile},
    entities::medicine,
};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

/// Icon given to new medicines
pub const DEFAULT_MEDICINE_ICON: &str = "pills";
/// Icon colour given to new medicines
pub const DEFAULT_MEDICINE_COLOR: &str = "6495ED";

/// Form state for creating a medicine.
#[derive(Debug)]
pub struct AddMedicineViewModel {
    db: DatabaseConnection,
    /// Medicine name
    pub name: String,
    /// Name of the aisle it goes in
    pub aisle: String,
    /// Initial stock
    pub stock: Option<i32>,
    /// Target stock level
    pub normal_stock: Option<i32>,
    /// Warning threshold
    pub warning_stock: Option<i32>,
    /// Alert threshold
    pub alert_stock: Option<i32>,
    /// Icon colour as hex digits
    pub color: String,
    /// Symbol name
    pub icon: String,
    /// Aisle names to choose from
    pub aisles: Vec<String>,
    /// Description of the last failed operation
    pub error: Option<String>,
    /// Set when the name is already taken and the user must confirm
    pub show_alert: bool,
    /// Whether an operation is running
    pub is_loading: bool,
}

impl AddMedicineViewModel {
    /// Creates an empty form, optionally preselecting an aisle.
    #[must_use]
    pub fn new(db: DatabaseConnection, aisle: &str) -> Self {
        Self {
            db,
            name: String::new(),
            aisle: aisle.to_string(),
            stock: None,
            normal_stock: None,
            warning_stock: None,
            alert_stock: None,
            color: DEFAULT_MEDICINE_COLOR.to_string(),
            icon: DEFAULT_MEDICINE_ICON.to_string(),
            aisles: Vec::new(),
            error: None,
            show_alert: false,
            is_loading: false,
        }
    }

    /// Whether the add button is disabled: a stock field is missing or negative, the name
    /// or aisle is empty, or an operation is running.
    #[must_use]
    pub fn should_disable(&self) -> bool {
        let (Some(stock), Some(normal), Some(warning), Some(alert)) = (
            self.stock,
            self.normal_stock,
            self.warning_stock,
            self.alert_stock,
        ) else {
            return true;
        };

        self.name.is_empty()
            || self.aisle.is_empty()
            || stock < 0
            || normal < 0
            || warning < 0
            || alert < 0
            || self.is_loading
    }

    /// Loads the aisle names and selects the first one if none is chosen.
    pub async fn fetch_aisles(&mut self) {
        self.error = None;

        match aisle::fetch_all_aisles(&self.db).await {
            Ok(aisles) => {
                self.aisles = aisles.into_iter().map(|aisle| aisle.name).collect();
                if self.aisle.is_empty()
                    && let Some(first) = self.aisles.first()
                {
                    self.aisle = first.clone();
                }
            }
            Err(e) => self.error = Some(failure("fetching aisle list", &e)),
        }
    }

    /// Creates the medicine described by the form.
    ///
    /// If another medicine already has this name, nothing is written and `show_alert` is
    /// set, unless `try_anyway` confirms the duplicate. On success the creation is recorded
    /// in the history, the medicine is added to its aisle and the form is cleared.
    ///
    /// Returns the created medicine.
    pub async fn add_medicine(&mut self, user: &str, try_anyway: bool) -> Option<medicine::Model> {
        self.error = None;
        let (Some(stock), Some(normal_stock), Some(warning_stock), Some(alert_stock)) = (
            self.stock,
            self.normal_stock,
            self.warning_stock,
            self.alert_stock,
        ) else {
            return None;
        };
        self.is_loading = true;

        let new_medicine = medicine::Model {
            id: Uuid::new_v4().to_string(),
            name: self.name.clone(),
            stock,
            aisle: self.aisle.clone(),
            normal_stock,
            warning_stock,
            alert_stock,
            icon: self.icon.clone(),
            color: Rgba::from_hex(&self.color).to_hex(),
        };

        let created = self.create(new_medicine, user, try_anyway).await;
        self.is_loading = false;
        created
    }

    async fn create(
        &mut self,
        new_medicine: medicine::Model,
        user: &str,
        try_anyway: bool,
    ) -> Option<medicine::Model> {
        let exists = match medicines::medicine_name_exists(&self.db, new_medicine.name.trim()).await
        {
            Ok(exists) => exists,
            Err(e) => {
                self.error = Some(failure("adding new medicines", &e));
                return None;
            }
        };
        if exists && !try_anyway {
            self.show_alert = true;
            return None;
        }

        let created = match medicines::add_medicine(&self.db, &new_medicine).await {
            Ok(created) => created,
            Err(e) => {
                self.error = Some(failure("adding new medicines", &e));
                return None;
            }
        };

        let entry = reconcile::creation_entry(&created, user);
        if let Err(e) = history::add_history(&self.db, &entry).await {
            self.error = Some(failure("adding change to history", &e));
        }

        let mut aisles = AislesViewModel::new(self.db.clone());
        aisles.add(&created.id, &created.aisle).await;
        if let Some(message) = aisles.error {
            self.error = Some(message);
        }

        self.show_alert = false;
        self.reset_fields();
        Some(created)
    }

    fn reset_fields(&mut self) {
        self.name.clear();
        self.aisle.clear();
        self.stock = None;
        self.normal_stock = None;
        self.warning_stock = None;
        self.alert_stock = None;
    }
}
