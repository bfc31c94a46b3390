//! Authentication provider seam.
//!
//! The session store talks to an [`AuthProvider`] to create accounts, sign in and sign out.
//! Provider failures carry an [`AuthError`] code which [`identify_error`] turns into the
//! fixed messages shown on the login and registration screens.

/// Credential store backed by the application database
pub mod database;

pub use database::DatabaseAuthProvider;

use crate::errors::{Error, Result};
use async_trait::async_trait;
use thiserror::Error;

/// Message used when the provider succeeded but handed back no user identifier.
pub const MISSING_UID_MESSAGE: &str = "An error occured, please try again.";

/// Error codes reported by an auth provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Provider could not be reached
    #[error("network error")]
    Network,
    /// No account for this email
    #[error("user not found")]
    UserNotFound,
    /// Password does not match
    #[error("wrong password")]
    WrongPassword,
    /// Credential rejected without saying which part was wrong
    #[error("invalid credential")]
    InvalidCredential,
    /// Sign-up with an email that already has an account
    #[error("email already in use")]
    EmailAlreadyInUse,
    /// Malformed email address
    #[error("invalid email")]
    InvalidEmail,
    /// Password shorter than six characters
    #[error("weak password")]
    WeakPassword,
    /// Too many failed attempts
    #[error("too many requests")]
    TooManyRequests,
    /// Any other provider code
    #[error("provider error {code}")]
    Other {
        /// Provider-specific code
        code: String,
    },
}

/// Account operations delegated to an authentication backend.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Creates an account and returns the identifier issued for it.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<String>>;

    /// Authenticates and returns the account identifier.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Option<String>>;

    /// Ends the provider-side session.
    async fn sign_out(&self) -> Result<()>;

    /// Human-readable message for an error returned by this provider.
    fn identify_error(&self, error: &Error) -> String {
        identify_error(error)
    }
}

/// Maps an error to the message shown to the user.
#[must_use]
pub fn identify_error(error: &Error) -> String {
    let Error::Auth(code) = error else {
        return format!("Unknown error: {error}");
    };

    match code {
        AuthError::Network => "Internet connection problem.".to_string(),
        AuthError::UserNotFound => "No account matches this email.".to_string(),
        AuthError::WrongPassword | AuthError::InvalidCredential => {
            "Incorrect password.".to_string()
        }
        AuthError::EmailAlreadyInUse => "This email is already in use.".to_string(),
        AuthError::InvalidEmail => "Invalid email format.".to_string(),
        AuthError::WeakPassword => "Password is too weak (minimum 6 characters).".to_string(),
        AuthError::TooManyRequests => "Too many attempts. Please try again later.".to_string(),
        AuthError::Other { code } => format!("An error occurred: {code}"),
    }
}
