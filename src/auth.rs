//! Identity boundary - who is signed in.
//!
//! The storefront never stores credentials itself. It talks to an
//! [`IdentityProvider`] and uses the returned uid as the ownership key for
//! orders and profiles. [`LocalIdentityProvider`] is an in-process provider for
//! development and tests.

use std::collections::HashMap;

use tokio::sync::{Mutex, watch};
use tracing::{debug, info};

use crate::errors::{Error, Result};

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// A signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Opaque user id
    pub uid: String,
    /// E-mail the user signed in with
    pub email: String,
    /// Optional display name
    pub display_name: Option<String>,
}

/// External identity provider (e-mail/password).
#[allow(async_fn_in_trait)]
pub trait IdentityProvider {
    /// Signs in an existing account and makes it the current user.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser>;

    /// Creates an account and makes it the current user.
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser>;

    /// Clears the current user.
    async fn sign_out(&self) -> Result<()>;

    /// Deletes the current user's account and signs out.
    async fn delete_current_user(&self) -> Result<()>;

    /// The currently signed-in user, if any.
    fn current_user(&self) -> Option<AuthUser>;

    /// Observes changes to the current user.
    fn subscribe(&self) -> watch::Receiver<Option<AuthUser>>;
}

/// Returns the current user or [`Error::NotAuthenticated`].
pub fn require_user<I: IdentityProvider + ?Sized>(identity: &I) -> Result<AuthUser> {
    identity.current_user().ok_or(Error::NotAuthenticated)
}

#[derive(Debug, Clone)]
struct Account {
    uid: String,
    password: String,
}

/// In-process identity provider holding accounts in memory.
#[derive(Debug)]
pub struct LocalIdentityProvider {
    accounts: Mutex<HashMap<String, Account>>,
    current: watch::Sender<Option<AuthUser>>,
}

impl Default for LocalIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalIdentityProvider {
    /// Creates a provider with no accounts and nobody signed in.
    #[must_use]
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self {
            accounts: Mutex::new(HashMap::new()),
            current,
        }
    }

    fn normalize_email(email: &str) -> Result<String> {
        let email = email.trim().to_lowercase();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
            _ => Err(Error::InvalidInput {
                field: "email",
                value: email,
            }),
        }
    }

    fn auth_user(uid: &str, email: &str) -> AuthUser {
        AuthUser {
            uid: uid.to_string(),
            email: email.to_string(),
            display_name: None,
        }
    }
}

impl IdentityProvider for LocalIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser> {
        let email = Self::normalize_email(email)?;
        let accounts = self.accounts.lock().await;
        let account = accounts
            .get(&email)
            .filter(|account| account.password == password)
            .ok_or(Error::InvalidCredentials)?;

        let user = Self::auth_user(&account.uid, &email);
        self.current.send_replace(Some(user.clone()));
        info!(uid = %user.uid, "Signed in");
        Ok(user)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser> {
        let email = Self::normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(Error::WeakPassword {
                min_length: MIN_PASSWORD_LENGTH,
            });
        }

        let mut accounts = self.accounts.lock().await;
        if accounts.contains_key(&email) {
            return Err(Error::EmailInUse { email });
        }

        let uid = crate::store::generate_id();
        accounts.insert(
            email.clone(),
            Account {
                uid: uid.clone(),
                password: password.to_string(),
            },
        );

        let user = Self::auth_user(&uid, &email);
        self.current.send_replace(Some(user.clone()));
        info!(uid = %user.uid, "Account created");
        Ok(user)
    }

    async fn sign_out(&self) -> Result<()> {
        if let Some(user) = self.current.send_replace(None) {
            debug!(uid = %user.uid, "Signed out");
        }
        Ok(())
    }

    async fn delete_current_user(&self) -> Result<()> {
        let user = require_user(self)?;
        self.accounts.lock().await.remove(&user.email);
        self.current.send_replace(None);
        info!(uid = %user.uid, "Account deleted");
        Ok(())
    }

    fn current_user(&self) -> Option<AuthUser> {
        self.current.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<AuthUser>> {
        self.current.subscribe()
    }
}
