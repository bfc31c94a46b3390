//! Session context: who is signed in and their profile.
//!
//! A [`SessionStore`] is constructed with the auth provider, blob storage and database it
//! talks to and is handed to whatever needs the current user. Its state only moves
//! between `SignedOut` and `SignedIn`; a failed call leaves the state as it was and fills
//! the `error` slot.

use super::failure;
use crate::{
    auth::{AuthProvider, DatabaseAuthProvider, MISSING_UID_MESSAGE},
    config::settings::{AuthSettings, StorageSettings},
    core::user as users,
    entities::user,
    storage::{BlobStorage, LocalBlobStorage},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{info, warn};

/// Whether a user is signed in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthenticationState {
    /// No user
    #[default]
    SignedOut,
    /// A user is signed in and their profile is loaded
    SignedIn,
}

/// Explicit session context shared by the screens.
pub struct SessionStore {
    auth: Arc<dyn AuthProvider>,
    storage: Arc<dyn BlobStorage>,
    db: DatabaseConnection,
    profile_folder: String,
    /// Profile of the signed-in user
    pub session: Option<user::Model>,
    /// Identifier issued by the auth provider
    pub uid: Option<String>,
    /// Current authentication state
    pub state: AuthenticationState,
    /// Message describing the last failure
    pub error: Option<String>,
    /// Whether an operation is running
    pub is_loading: bool,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("uid", &self.uid)
            .field("state", &self.state)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Creates a signed-out session.
    ///
    /// # Arguments
    /// * `auth` - Provider used to create accounts and sign in
    /// * `storage` - Where profile pictures are uploaded
    /// * `db` - Database holding user profiles
    /// * `profile_folder` - Storage folder for profile pictures
    #[must_use]
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        storage: Arc<dyn BlobStorage>,
        db: DatabaseConnection,
        profile_folder: impl Into<String>,
    ) -> Self {
        Self {
            auth,
            storage,
            db,
            profile_folder: profile_folder.into(),
            session: None,
            uid: None,
            state: AuthenticationState::SignedOut,
            error: None,
            is_loading: false,
        }
    }

    /// Creates a signed-out session over the database auth provider and local blob storage.
    #[must_use]
    pub fn from_settings(
        db: DatabaseConnection,
        storage: &StorageSettings,
        auth: &AuthSettings,
    ) -> Self {
        let provider = DatabaseAuthProvider::new(db.clone(), auth.max_failed_sign_ins);
        let blobs = LocalBlobStorage::new(storage.root.clone(), storage.base_url.clone());
        Self::new(
            Arc::new(provider),
            Arc::new(blobs),
            db,
            storage.profile_folder.clone(),
        )
    }

    /// Creates an account, stores its profile and signs in.
    pub async fn sign_up(&mut self, fullname: &str, email: &str, password: &str) {
        self.error = None;
        self.is_loading = true;

        let email = email.trim();
        match self.auth.sign_up(email, password).await {
            Ok(Some(uid)) => {
                let profile = user::Model {
                    uid: uid.clone(),
                    email: email.to_string(),
                    fullname: fullname.to_string(),
                    image_url: String::new(),
                };
                match users::add_user(&self.db, &profile).await {
                    Ok(stored) => self.signed_in(uid, stored),
                    Err(e) => self.error = Some(self.auth.identify_error(&e)),
                }
            }
            Ok(None) => self.error = Some(MISSING_UID_MESSAGE.to_string()),
            Err(e) => {
                warn!("Sign-up failed: {}", e);
                self.error = Some(self.auth.identify_error(&e));
            }
        }

        self.is_loading = false;
    }

    /// Authenticates and loads the user's profile.
    pub async fn sign_in(&mut self, email: &str, password: &str) {
        self.error = None;
        self.is_loading = true;

        match self.auth.sign_in(email.trim(), password).await {
            Ok(Some(uid)) => match users::fetch_user(&self.db, &uid).await {
                Ok(Some(profile)) => self.signed_in(uid, profile),
                Ok(None) => {
                    warn!("No profile stored for {}", uid);
                    self.error = Some("fetching user's personal information".to_string());
                }
                Err(e) => {
                    self.error = Some(failure("fetching user's personal information", &e));
                }
            },
            Ok(None) => self.error = Some(MISSING_UID_MESSAGE.to_string()),
            Err(e) => {
                warn!("Sign-in failed: {}", e);
                self.error = Some(self.auth.identify_error(&e));
            }
        }

        self.is_loading = false;
    }

    /// Signs out and clears the session. Nothing changes if the provider fails.
    pub async fn sign_out(&mut self) {
        self.error = None;

        match self.auth.sign_out().await {
            Ok(()) => {
                self.session = None;
                self.uid = None;
                self.state = AuthenticationState::SignedOut;
                info!("Signed out");
            }
            Err(e) => self.error = Some(failure("signing out", &e)),
        }
    }

    /// Reloads the signed-in user's profile.
    pub async fn refresh_user(&mut self) {
        self.error = None;
        let Some(uid) = self.uid.clone() else {
            self.error = Some("User not logged in".to_string());
            return;
        };
        self.is_loading = true;

        match users::fetch_user(&self.db, &uid).await {
            Ok(Some(profile)) => self.session = Some(profile),
            Ok(None) => self.error = Some("fetching user's personal information".to_string()),
            Err(e) => self.error = Some(failure("fetching user's personal information", &e)),
        }

        self.is_loading = false;
    }

    /// Changes the signed-in user's display name.
    pub async fn update_user(&mut self, fullname: &str) {
        self.error = None;
        let Some(current) = self.signed_in_profile() else {
            self.error = Some("User not logged in".to_string());
            return;
        };
        self.is_loading = true;

        let edited = user::Model {
            fullname: fullname.to_string(),
            ..current
        };
        match users::update_user(&self.db, &edited).await {
            Ok(stored) => self.session = Some(stored),
            Err(e) => self.error = Some(failure("updating user's personal information", &e)),
        }

        self.is_loading = false;
    }

    /// Uploads a new profile picture and points the profile at it.
    ///
    /// The previous picture is deleted only once the new URL has been saved; failing to
    /// delete it is logged and otherwise ignored.
    pub async fn upload_image(&mut self, data: &[u8]) {
        const OPERATION: &str = "uploading new user's profile picture";

        self.error = None;
        let Some(current) = self.signed_in_profile() else {
            self.error = Some("User not logged in".to_string());
            return;
        };
        self.is_loading = true;

        let url = match self.storage.upload_image(data, &self.profile_folder).await {
            Ok(url) => url,
            Err(e) => {
                self.error = Some(failure(OPERATION, &e));
                self.is_loading = false;
                return;
            }
        };

        let previous_url = current.image_url.clone();
        let edited = user::Model {
            image_url: url,
            ..current
        };
        match users::update_user(&self.db, &edited).await {
            Ok(stored) => {
                self.session = Some(stored);
                if !previous_url.is_empty()
                    && let Err(e) = self.storage.delete_image(&previous_url).await
                {
                    warn!("Could not delete previous profile picture {}: {}", previous_url, e);
                }
            }
            Err(e) => self.error = Some(failure(OPERATION, &e)),
        }

        self.is_loading = false;
    }

    fn signed_in(&mut self, uid: String, profile: user::Model) {
        info!("Signed in {}", uid);
        self.uid = Some(uid);
        self.session = Some(profile);
        self.state = AuthenticationState::SignedIn;
    }

    fn signed_in_profile(&self) -> Option<user::Model> {
        self.uid.as_ref()?;
        self.session.clone()
    }
}
