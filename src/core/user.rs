//! User business logic - Profile documents keyed by the auth provider's uid.

use crate::{
    entities::{User, user},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};

/// Retrieves the profile of `uid`, if one was stored.
pub async fn fetch_user(db: &DatabaseConnection, uid: &str) -> Result<Option<user::Model>> {
    User::find_by_id(uid.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Stores the profile of a newly registered user.
///
/// # Errors
/// Returns an error if the uid is empty or the insert fails.
pub async fn add_user(db: &DatabaseConnection, profile: &user::Model) -> Result<user::Model> {
    if profile.uid.is_empty() {
        return Err(Error::Validation {
            message: "User uid cannot be empty".to_string(),
        });
    }

    user::ActiveModel {
        uid: Set(profile.uid.clone()),
        email: Set(profile.email.clone()),
        fullname: Set(profile.fullname.clone()),
        image_url: Set(profile.image_url.clone()),
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Overwrites the stored profile of `profile.uid`.
///
/// # Errors
/// Returns [`Error::UserNotFound`] if no profile exists for this uid.
pub async fn update_user(db: &DatabaseConnection, profile: &user::Model) -> Result<user::Model> {
    let mut stored: user::ActiveModel = fetch_user(db, &profile.uid)
        .await?
        .ok_or_else(|| Error::UserNotFound {
            uid: profile.uid.clone(),
        })?
        .into();

    stored.email = Set(profile.email.clone());
    stored.fullname = Set(profile.fullname.clone());
    stored.image_url = Set(profile.image_url.clone());

    stored.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_add_user_requires_uid() -> Result<()> {
        let db = setup_test_db().await?;
        let result = add_user(&db, &test_user("")).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { message: _ }));
        assert!(fetch_user(&db, "").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_add_fetch_update_user() -> Result<()> {
        let db = setup_test_db().await?;
        let profile = test_user("uid-1");

        add_user(&db, &profile).await?;
        assert_eq!(fetch_user(&db, "uid-1").await?, Some(profile.clone()));

        let edited = user::Model {
            fullname: "Renamed".to_string(),
            image_url: "https://blobs.test.app/profile_images/a.jpg".to_string(),
            ..profile
        };
        update_user(&db, &edited).await?;
        assert_eq!(fetch_user(&db, "uid-1").await?, Some(edited));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_user() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(fetch_user(&db, "ghost").await?.is_none());

        let result = update_user(&db, &test_user("ghost")).await;
        assert!(matches!(result.unwrap_err(), Error::UserNotFound { uid: _ }));
        Ok(())
    }
}
