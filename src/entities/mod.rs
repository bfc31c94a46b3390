//! Entity module - Contains all SeaORM entity definitions for the database.
//! Each collection of the inventory (medicines, aisles, history, users) maps to one table,
//! plus the aisle membership join table and the auth provider's credential table.

pub mod account;
pub mod aisle;
pub mod aisle_medicine;
pub mod history_entry;
pub mod medicine;
pub mod user;

// Re-export specific types to avoid conflicts
pub use account::{Column as AccountColumn, Entity as Account, Model as AccountModel};
pub use aisle::{Column as AisleColumn, Entity as AisleEntity, Model as AisleModel};
pub use aisle_medicine::{
    Column as AisleMedicineColumn, Entity as AisleMedicine, Model as AisleMedicineModel,
};
pub use history_entry::{
    Column as HistoryEntryColumn, Entity as HistoryEntry, Model as HistoryEntryModel,
};
pub use medicine::{Column as MedicineColumn, Entity as Medicine, Model as MedicineModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
