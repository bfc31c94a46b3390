//! Shared test utilities for `MediStock`.
//!
//! This module provides common helper functions for setting up test databases,
//! creating test entities with sensible defaults, and fake providers whose
//! failures can be chosen by the test.

use crate::{
    auth::{AuthError, AuthProvider},
    core::{aisle, medicine},
    entities::{history_entry, user},
    errors::{Error, Result},
    models::Aisle,
    storage::BlobStorage,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use tokio::sync::Mutex;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a medicine without storing it.
///
/// # Defaults
/// * stock: 10
/// * `normal_stock`: 25
/// * `warning_stock`: 8
/// * `alert_stock`: 3
/// * icon: "pills", color: "6495ED"
#[must_use]
pub fn test_medicine(id: &str, name: &str, aisle: &str) -> crate::entities::medicine::Model {
    crate::entities::medicine::Model {
        id: id.to_string(),
        name: name.to_string(),
        stock: 10,
        aisle: aisle.to_string(),
        normal_stock: 25,
        warning_stock: 8,
        alert_stock: 3,
        icon: "pills".to_string(),
        color: "6495ED".to_string(),
    }
}

/// Stores a medicine built by [`test_medicine`].
pub async fn create_test_medicine(
    db: &DatabaseConnection,
    id: &str,
    name: &str,
    aisle: &str,
) -> Result<crate::entities::medicine::Model> {
    medicine::add_medicine(db, &test_medicine(id, name, aisle)).await
}

/// Stores an empty aisle with the default icon and colour.
pub async fn create_test_aisle(db: &DatabaseConnection, name: &str) -> Result<Aisle> {
    aisle::add_aisle(db, &Aisle::new(name, "pills.fill", "6495ED")).await
}

/// Builds a history entry without storing it.
#[must_use]
pub fn test_history_entry(
    medicine_id: &str,
    action: &str,
    timestamp: DateTime<Utc>,
) -> history_entry::Model {
    history_entry::Model {
        id: uuid::Uuid::new_v4().to_string(),
        medicine_id: medicine_id.to_string(),
        user: "user@test.app".to_string(),
        action: action.to_string(),
        details: format!("user@test.app {action}"),
        timestamp,
        current_stock: 10,
    }
}

/// Builds a user profile without storing it.
#[must_use]
pub fn test_user(uid: &str) -> user::Model {
    user::Model {
        uid: uid.to_string(),
        email: "user@test.app".to_string(),
        fullname: "New user".to_string(),
        image_url: String::new(),
    }
}

/// Auth provider returning canned results.
#[derive(Debug, Default)]
pub struct FakeAuthProvider {
    /// Uid handed back by sign-up and sign-in
    pub uid: Option<String>,
    /// Error returned by sign-up and sign-in instead of the uid
    pub error: Option<AuthError>,
    /// Error returned by sign-out
    pub sign_out_error: Option<AuthError>,
    /// Emails passed to sign-up and sign-in, in call order
    pub emails: Mutex<Vec<String>>,
}

impl FakeAuthProvider {
    /// Provider that succeeds and issues `uid`.
    #[must_use]
    pub fn issuing(uid: &str) -> Self {
        Self {
            uid: Some(uid.to_string()),
            ..Self::default()
        }
    }

    /// Provider whose sign-up and sign-in fail with `error`.
    #[must_use]
    pub fn failing(error: AuthError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    async fn answer(&self, email: &str) -> Result<Option<String>> {
        self.emails.lock().await.push(email.to_string());
        match &self.error {
            Some(error) => Err(error.clone().into()),
            None => Ok(self.uid.clone()),
        }
    }
}

#[async_trait]
impl AuthProvider for FakeAuthProvider {
    async fn sign_up(&self, email: &str, _password: &str) -> Result<Option<String>> {
        self.answer(email).await
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<Option<String>> {
        self.answer(email).await
    }

    async fn sign_out(&self) -> Result<()> {
        match &self.sign_out_error {
            Some(error) => Err(error.clone().into()),
            None => Ok(()),
        }
    }
}

/// Blob storage keeping track of uploads and deletions in memory.
#[derive(Debug, Default)]
pub struct FakeBlobStorage {
    /// When set, every call fails with this message
    pub error: Option<String>,
    /// URLs handed out, in call order
    pub uploaded: Mutex<Vec<String>>,
    /// URLs deleted, in call order
    pub deleted: Mutex<Vec<String>>,
}

impl FakeBlobStorage {
    /// Storage whose calls all fail.
    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn check(&self) -> Result<()> {
        match &self.error {
            Some(message) => Err(Error::Storage {
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BlobStorage for FakeBlobStorage {
    async fn upload_image(&self, _data: &[u8], folder: &str) -> Result<String> {
        self.check()?;
        let mut uploaded = self.uploaded.lock().await;
        let url = format!("https://blobs.test.app/{folder}/{}.jpg", uploaded.len());
        uploaded.push(url.clone());
        Ok(url)
    }

    async fn delete_image(&self, url: &str) -> Result<()> {
        self.check()?;
        self.deleted.lock().await.push(url.to_string());
        Ok(())
    }
}
