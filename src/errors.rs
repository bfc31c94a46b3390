//! Unified error type for the inventory core.
//!
//! Repository functions return these structured errors. View-models log them and collapse
//! them into the short per-operation strings shown to the user.

use crate::auth::AuthError;
use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Underlying `SeaORM` failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// A stock or threshold value was negative
    #[error("Invalid stock value: {stock}")]
    InvalidStock {
        /// The rejected value
        stock: i32,
    },

    /// No medicine with this id
    #[error("Medicine not found: {id}")]
    MedicineNotFound {
        /// Medicine id
        id: String,
    },

    /// No aisle with this name
    #[error("Aisle not found: {name}")]
    AisleNotFound {
        /// Aisle name
        name: String,
    },

    /// An aisle with this name already exists
    #[error("Aisle already exists: {name}")]
    DuplicateAisle {
        /// Aisle name
        name: String,
    },

    /// The aisle changed between read and write
    #[error("Aisle {name} was modified concurrently (expected version {expected})")]
    AisleConflict {
        /// Aisle name
        name: String,
        /// Version the caller read
        expected: i64,
    },

    /// No user document for this uid
    #[error("User not found: {uid}")]
    UserNotFound {
        /// User id
        uid: String,
    },

    /// A document did not match the expected schema
    #[error("Failed to decode {entity} document: {message}")]
    Decode {
        /// Kind of document (`"medicine"`, `"aisle"`, ...)
        entity: &'static str,
        /// Decoder message
        message: String,
    },

    /// Input rejected before reaching storage
    #[error("Validation error: {message}")]
    Validation {
        /// What was rejected
        message: String,
    },

    /// Authentication provider failure
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Blob storage failure
    #[error("Storage error: {message}")]
    Storage {
        /// What went wrong
        message: String,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
