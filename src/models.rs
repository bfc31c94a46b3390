//! Domain types that do not map one-to-one onto a table.

use crate::entities::{aisle, medicine};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An aisle together with the ordered identifiers of the medicines shelved in it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aisle {
    /// Unique identifier
    pub id: String,
    /// Aisle name
    pub name: String,
    /// Symbol name
    pub icon: String,
    /// Icon colour as hex digits
    pub color: String,
    /// Medicine identifiers in insertion order
    pub medicines: Vec<String>,
    /// Version read from storage; membership writes are rejected if it is stale
    #[serde(default)]
    pub version: i64,
}

impl Aisle {
    /// Creates an empty aisle with a fresh identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, icon: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
            medicines: Vec::new(),
            version: 0,
        }
    }

    /// Assembles an aisle from its row and its membership list.
    #[must_use]
    pub fn from_parts(model: aisle::Model, medicines: Vec<String>) -> Self {
        Self {
            id: model.id,
            name: model.name,
            icon: model.icon,
            color: model.color,
            medicines,
            version: model.version,
        }
    }

    /// Whether the medicine with this id is shelved here.
    #[must_use]
    pub fn contains(&self, medicine_id: &str) -> bool {
        self.medicines.iter().any(|id| id == medicine_id)
    }
}

/// Ordering applied when fetching medicines page by page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
    /// Storage order (by id)
    #[default]
    None,
    /// Alphabetical by name
    Name,
    /// Ascending stock
    Stock,
}

impl SortOption {
    /// Name of the document field the backend orders by.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::None => "id",
            Self::Name => "name",
            Self::Stock => "stock",
        }
    }
}

/// Advisory stock band of a medicine, derived from its thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StockLevel {
    /// Nothing left
    Empty,
    /// At or below the alert threshold
    Alert,
    /// At or below the warning threshold
    Warning,
    /// Above the warning threshold
    Normal,
}

impl StockLevel {
    /// Classifies a medicine's current stock against its thresholds.
    ///
    /// Thresholds are independent values; when they are out of order the most
    /// severe matching band wins.
    #[must_use]
    pub const fn classify(medicine: &medicine::Model) -> Self {
        if medicine.stock <= 0 {
            Self::Empty
        } else if medicine.stock <= medicine.alert_stock {
            Self::Alert
        } else if medicine.stock <= medicine.warning_stock {
            Self::Warning
        } else {
            Self::Normal
        }
    }

    /// Whether this band needs immediate restocking.
    #[must_use]
    pub const fn is_alert(self) -> bool {
        matches!(self, Self::Empty | Self::Alert)
    }
}
