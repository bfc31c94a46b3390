//! New aisle form.

use super::failure;
use crate::{
    core::{aisle, color::Rgba},
    models::Aisle,
};
use sea_orm::DatabaseConnection;

/// Icon given to new aisles
pub const DEFAULT_AISLE_ICON: &str = "pills.fill";
/// Icon colour given to new aisles
pub const DEFAULT_AISLE_COLOR: &str = "6495ED";

/// Form state for creating an aisle.
#[derive(Debug)]
pub struct AddAisleViewModel {
    db: DatabaseConnection,
    /// Aisle name
    pub name: String,
    /// Symbol name
    pub icon: String,
    /// Icon colour as hex digits
    pub color: String,
    /// Description of the last failed operation
    pub error: Option<String>,
    /// Whether an operation is running
    pub is_loading: bool,
}

impl AddAisleViewModel {
    /// Creates a blank form with the default icon and colour.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            name: String::new(),
            icon: DEFAULT_AISLE_ICON.to_string(),
            color: DEFAULT_AISLE_COLOR.to_string(),
            error: None,
            is_loading: false,
        }
    }

    /// Creates an empty aisle from the form. The form is reset whether or not it succeeds.
    pub async fn add_aisle(&mut self) -> Option<Aisle> {
        self.error = None;
        self.is_loading = true;

        let color = Rgba::from_hex(&self.color).to_hex();
        let new_aisle = Aisle::new(self.name.trim(), self.icon.clone(), color);
        let created = match aisle::add_aisle(&self.db, &new_aisle).await {
            Ok(created) => Some(created),
            Err(e) => {
                self.error = Some(failure("creating aisle", &e));
                None
            }
        };

        self.reset_fields();
        self.is_loading = false;
        created
    }

    fn reset_fields(&mut self) {
        self.name.clear();
        self.icon = DEFAULT_AISLE_ICON.to_string();
        self.color = DEFAULT_AISLE_COLOR.to_string();
    }
}
