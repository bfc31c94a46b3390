//! Database-backed auth provider.
//!
//! Accounts live in the `accounts` table with a bcrypt hash of the password. Repeated
//! wrong passwords for one account are refused once the configured limit is reached,
//! until a successful sign-in resets the counter.

use super::{AuthError, AuthProvider};
use crate::{
    entities::{Account, account},
    errors::Result,
};
use async_trait::async_trait;
use sea_orm::{Set, prelude::*};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 6;

/// Auth provider storing credentials next to the inventory data.
pub struct DatabaseAuthProvider {
    db: DatabaseConnection,
    max_failed_sign_ins: u32,
    hash_cost: u32,
    failed_sign_ins: Mutex<HashMap<String, u32>>,
    current_uid: Mutex<Option<String>>,
}

impl DatabaseAuthProvider {
    /// Creates a provider over `db`.
    #[must_use]
    pub fn new(db: DatabaseConnection, max_failed_sign_ins: u32) -> Self {
        Self {
            db,
            max_failed_sign_ins,
            hash_cost: bcrypt::DEFAULT_COST,
            failed_sign_ins: Mutex::new(HashMap::new()),
            current_uid: Mutex::new(None),
        }
    }

    /// Sets the bcrypt cost used for new passwords.
    #[must_use]
    pub const fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Identifier of the account currently signed in through this provider.
    pub async fn current_uid(&self) -> Option<String> {
        self.current_uid.lock().await.clone()
    }

    async fn find_account(&self, email: &str) -> Result<Option<account::Model>> {
        Account::find()
            .filter(account::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(Into::into)
    }

    async fn record_failure(&self, email: &str) {
        let mut failures = self.failed_sign_ins.lock().await;
        *failures.entry(email.to_string()).or_insert(0) += 1;
    }
}

#[async_trait]
impl AuthProvider for DatabaseAuthProvider {
    #[instrument(skip(self, password))]
    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<String>> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(AuthError::InvalidEmail.into());
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword.into());
        }
        if self.find_account(&email).await?.is_some() {
            return Err(AuthError::EmailAlreadyInUse.into());
        }

        let uid = Uuid::new_v4().to_string();
        let password_hash = hash_password(password, self.hash_cost).await?;
        let account = account::ActiveModel {
            uid: Set(uid.clone()),
            email: Set(email),
            password_hash: Set(password_hash),
            created_at: Set(chrono::Utc::now()),
        };
        account.insert(&self.db).await?;

        *self.current_uid.lock().await = Some(uid.clone());
        info!("Created account {}", uid);
        Ok(Some(uid))
    }

    #[instrument(skip(self, password))]
    async fn sign_in(&self, email: &str, password: &str) -> Result<Option<String>> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(AuthError::InvalidEmail.into());
        }

        let failures = self
            .failed_sign_ins
            .lock()
            .await
            .get(&email)
            .copied()
            .unwrap_or(0);
        if failures >= self.max_failed_sign_ins {
            warn!("Refusing sign-in for {} after {} failures", email, failures);
            return Err(AuthError::TooManyRequests.into());
        }

        let Some(account) = self.find_account(&email).await? else {
            return Err(AuthError::UserNotFound.into());
        };

        if !verify_password(password, &account.password_hash).await? {
            self.record_failure(&email).await;
            return Err(AuthError::WrongPassword.into());
        }

        self.failed_sign_ins.lock().await.remove(&email);
        *self.current_uid.lock().await = Some(account.uid.clone());
        debug!("Signed in {}", account.uid);
        Ok(Some(account.uid))
    }

    async fn sign_out(&self) -> Result<()> {
        self.current_uid.lock().await.take();
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

async fn hash_password(password: &str, cost: u32) -> Result<String> {
    let password = password.to_string();
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| hashing_error(&e))?;
    hashed.map_err(|e| hashing_error(&e))
}

async fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    let verified = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| hashing_error(&e))?;
    verified.map_err(|e| hashing_error(&e))
}

fn hashing_error(error: &dyn std::fmt::Display) -> crate::errors::Error {
    warn!("Password hashing failed: {}", error);
    AuthError::Other {
        code: "hashing-failed".to_string(),
    }
    .into()
}
