//! User profiles - `users/{uid}` documents owned by the identity provider's uid.
//!
//! Profiles are created at registration, or lazily the first time a signed-in
//! user's profile is read.

use crate::{
    auth::{IdentityProvider, require_user},
    entities::{User, user},
    errors::{Error, Result},
    store,
};
use sea_orm::{Set, prelude::*};
use tracing::{error, info, instrument};

/// Display name used when the identity provider has none.
pub const DEFAULT_DISPLAY_NAME: &str = "User";

/// Partial profile update; only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// New display name
    pub name: Option<String>,
    /// New contact e-mail
    pub email: Option<String>,
}

async fn create_profile(
    db: &DatabaseConnection,
    uid: &str,
    name: &str,
    email: &str,
) -> Result<user::Model> {
    let now = store::server_timestamp();
    let profile = user::ActiveModel {
        id: Set(uid.to_string()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        is_admin: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let profile = profile.insert(db).await?;
    info!("Created {}", store::user_path(uid));
    Ok(profile)
}

async fn find_profile(db: &DatabaseConnection, uid: &str) -> Result<Option<user::Model>> {
    User::find_by_id(uid.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates an account and its profile.
///
/// The profile name is the local part of the e-mail address. If the profile
/// cannot be written, the new account is deleted again and the error returned.
///
/// # Errors
/// Returns an error if sign-up or the profile write fails.
#[instrument(skip(db, identity, password))]
pub async fn register<I: IdentityProvider>(
    db: &DatabaseConnection,
    identity: &I,
    email: &str,
    password: &str,
) -> Result<user::Model> {
    let user = identity.sign_up(email, password).await?;

    if let Some(existing) = find_profile(db, &user.uid).await? {
        return Ok(existing);
    }

    let name = user.email.split('@').next().unwrap_or(DEFAULT_DISPLAY_NAME);
    match create_profile(db, &user.uid, name, &user.email).await {
        Ok(profile) => Ok(profile),
        Err(e) => {
            error!("Failed to create profile, removing account: {}", e);
            identity.delete_current_user().await?;
            Err(e)
        }
    }
}

/// Reads the current user's profile, creating it if it does not exist yet.
///
/// # Errors
/// Returns an error if nobody is signed in or the store fails.
pub async fn get_user_profile<I: IdentityProvider>(
    db: &DatabaseConnection,
    identity: &I,
) -> Result<user::Model> {
    let user = require_user(identity)?;
    if let Some(profile) = find_profile(db, &user.uid).await? {
        return Ok(profile);
    }

    let name = user.display_name.as_deref().unwrap_or(DEFAULT_DISPLAY_NAME);
    create_profile(db, &user.uid, name, &user.email).await
}

/// Updates the current user's profile and re-stamps `updated_at`.
///
/// # Errors
/// Returns an error if:
/// - Nobody is signed in
/// - A present name is blank
/// - The profile does not exist
/// - The database update fails
pub async fn update_user_profile<I: IdentityProvider>(
    db: &DatabaseConnection,
    identity: &I,
    update: ProfileUpdate,
) -> Result<user::Model> {
    let user = require_user(identity)?;

    if let Some(name) = update.name.as_deref().filter(|name| name.trim().is_empty()) {
        return Err(Error::InvalidInput {
            field: "name",
            value: name.to_string(),
        });
    }

    let mut profile: user::ActiveModel = find_profile(db, &user.uid)
        .await?
        .ok_or_else(|| Error::ProfileNotFound {
            uid: user.uid.clone(),
        })?
        .into();

    if let Some(name) = update.name {
        profile.name = Set(name.trim().to_string());
    }
    if let Some(email) = update.email {
        profile.email = Set(email);
    }
    profile.updated_at = Set(store::server_timestamp());
    profile.update(db).await.map_err(Into::into)
}

/// Whether the current user may use the inventory screens.
///
/// Users without a profile are not admins.
pub async fn is_admin<I: IdentityProvider>(db: &DatabaseConnection, identity: &I) -> Result<bool> {
    let user = require_user(identity)?;
    Ok(find_profile(db, &user.uid)
        .await?
        .is_some_and(|profile| profile.is_admin))
}

/// Grants or revokes admin access for `uid`.
///
/// # Errors
/// Returns [`Error::ProfileNotFound`] if the user has no profile.
#[instrument(skip(db))]
pub async fn set_admin(db: &DatabaseConnection, uid: &str, is_admin: bool) -> Result<user::Model> {
    let mut profile: user::ActiveModel = find_profile(db, uid)
        .await?
        .ok_or_else(|| Error::ProfileNotFound {
            uid: uid.to_string(),
        })?
        .into();

    profile.is_admin = Set(is_admin);
    profile.updated_at = Set(store::server_timestamp());
    profile.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::auth::LocalIdentityProvider;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_register_creates_profile() -> Result<()> {
        let db = setup_test_db().await?;
        let identity = LocalIdentityProvider::new();

        let profile = register(&db, &identity, "juan.delacruz@example.com", "secret1").await?;
        assert_eq!(profile.name, "juan.delacruz");
        assert_eq!(profile.email, "juan.delacruz@example.com");
        assert!(!profile.is_admin);
        assert_eq!(profile.id, identity.current_user().unwrap().uid);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_profile_creates_lazily() -> Result<()> {
        let db = setup_test_db().await?;
        let identity = signed_in_identity().await?;
        let uid = identity.current_user().unwrap().uid;
        assert!(User::find_by_id(uid.clone()).one(&db).await?.is_none());

        let profile = get_user_profile(&db, &identity).await?;
        assert_eq!(profile.id, uid);
        assert_eq!(profile.name, DEFAULT_DISPLAY_NAME);
        assert_eq!(profile.email, "buyer@example.com");

        // Second read returns the stored profile
        let again = get_user_profile(&db, &identity).await?;
        assert_eq!(again, profile);
        Ok(())
    }

    #[tokio::test]
    async fn test_profile_requires_authentication() -> Result<()> {
        let db = setup_test_db().await?;
        let identity = LocalIdentityProvider::new();

        let result = get_user_profile(&db, &identity).await;
        assert!(matches!(result, Err(Error::NotAuthenticated)));

        let result = update_user_profile(&db, &identity, ProfileUpdate::default()).await;
        assert!(matches!(result, Err(Error::NotAuthenticated)));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_profile() -> Result<()> {
        let db = setup_test_db().await?;
        let identity = LocalIdentityProvider::new();
        let original = register(&db, &identity, "buyer@example.com", "secret1").await?;

        let updated = update_user_profile(
            &db,
            &identity,
            ProfileUpdate {
                name: Some("Juan".to_string()),
                email: None,
            },
        )
        .await?;
        assert_eq!(updated.name, "Juan");
        assert_eq!(updated.email, original.email);
        assert!(updated.updated_at >= original.updated_at);

        let result = update_user_profile(
            &db,
            &identity,
            ProfileUpdate {
                name: Some("  ".to_string()),
                email: None,
            },
        )
        .await;
        assert!(matches!(result, Err(Error::InvalidInput { field: "name", .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_profile() -> Result<()> {
        let db = setup_test_db().await?;
        let identity = signed_in_identity().await?;
        let result = update_user_profile(&db, &identity, ProfileUpdate::default()).await;
        assert!(matches!(result, Err(Error::ProfileNotFound { uid: _ })));
        Ok(())
    }

    #[tokio::test]
    async fn test_admin_flag() -> Result<()> {
        let db = setup_test_db().await?;
        let identity = LocalIdentityProvider::new();
        let profile = register(&db, &identity, "admin@example.com", "secret1").await?;
        assert!(!is_admin(&db, &identity).await?);

        set_admin(&db, &profile.id, true).await?;
        assert!(is_admin(&db, &identity).await?);

        let result = set_admin(&db, "missing", true).await;
        assert!(matches!(result, Err(Error::ProfileNotFound { uid: _ })));
        Ok(())
    }
}
