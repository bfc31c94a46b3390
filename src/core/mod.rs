/// Aisle CRUD and membership maintenance
pub mod aisle;
/// Icon colour parsing
pub mod color;
/// Append-only medicine history
pub mod history;
/// Medicine CRUD, stock updates and cascading delete
pub mod medicine;
/// Keyset pagination over the medicine collection
pub mod pagination;
/// History entries derived from medicine changes
pub mod reconcile;
/// Stock level summaries
pub mod report;
/// User profile documents
pub mod user;
