//! View-models - UI-facing state driven by the core operations.
//!
//! Each view-model owns the lists a screen displays plus an `error` slot and an
//! `is_loading` flag. Failures are logged with their full cause and then collapsed into
//! a short description of the operation that failed, which is what the screen shows.

/// New aisle form
pub mod add_aisle;
/// New medicine form
pub mod add_medicine;
/// Aisle list and membership edits
pub mod aisles;
/// Per-key delayed persistence
pub mod debounce;
/// Medicine list, stock edits and history
pub mod medicine_stock;
/// Authentication state and profile edits
pub mod session;

pub use add_aisle::AddAisleViewModel;
pub use add_medicine::AddMedicineViewModel;
pub use aisles::AislesViewModel;
pub use debounce::StockDebouncer;
pub use medicine_stock::MedicineStockViewModel;
pub use session::{AuthenticationState, SessionStore};

use crate::errors::Error;
use tracing::warn;

/// Logs `error` and returns the message shown for the failed operation.
pub(crate) fn failure(operation: impl Into<String>, error: &Error) -> String {
    let operation = operation.into();
    warn!("Error {}: {}", operation, error);
    operation
}
