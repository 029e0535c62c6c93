//! # Sessions
//!
//! Who is calling, and whether they may mutate the catalog.
//!
//! The admin store never looks at storage keys or email addresses itself. It
//! asks a [`SessionProvider`] for the current [`Session`] and checks its
//! [`Role`]. Two providers exist:
//!
//! - [`StoredSessionProvider`]: the real one. Persists the token, user and
//!   expiry under `auth_token`, `auth_user` and `auth_expiry`, and derives the
//!   role by comparing the user's email with the configured admin email.
//! - [`StaticSession`]: a fixed answer, for tests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::StorefrontConfig;
use crate::error::{Result, StoreError};
use crate::store::{keys, load_json, save_json, KeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Customer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user: User,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

pub trait SessionProvider {
    /// The live session, if any. Expired sessions resolve to `None`.
    fn current(&self) -> Result<Option<Session>>;
}

/// Fail with a permission error unless the current session is an admin's.
pub fn require_admin<P: SessionProvider + ?Sized>(provider: &P) -> Result<Session> {
    match provider.current()? {
        Some(session) if session.is_admin() => Ok(session),
        Some(session) => Err(StoreError::Permission(format!(
            "{} is not an administrator",
            session.user.email
        ))),
        None => Err(StoreError::Permission(
            "sign in as an administrator first".to_string(),
        )),
    }
}

pub struct StoredSessionProvider<S> {
    store: S,
    config: StorefrontConfig,
}

impl<S: KeyValueStore> StoredSessionProvider<S> {
    pub fn new(store: S, config: &StorefrontConfig) -> Self {
        Self {
            store,
            config: config.clone(),
        }
    }

    fn role_for(&self, email: &str) -> Role {
        if self.config.is_admin_email(email) {
            Role::Admin
        } else {
            Role::Customer
        }
    }

    /// Start a session for `email`, replacing any existing one.
    pub fn sign_in(&self, email: &str, name: &str) -> Result<Session> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(StoreError::validation("email", "must be an email address"));
        }
        let name = match name.trim() {
            "" => email.split('@').next().unwrap_or(email).to_string(),
            name => name.to_string(),
        };

        let session = Session {
            token: Uuid::new_v4().to_string(),
            user: User {
                email: email.to_string(),
                name,
            },
            role: self.role_for(email),
            expires_at: Utc::now() + self.config.session_lifetime(),
        };

        save_json(&self.store, keys::AUTH_TOKEN, &session.token)?;
        save_json(&self.store, keys::AUTH_USER, &session.user)?;
        save_json(&self.store, keys::AUTH_EXPIRY, &session.expires_at)?;
        info!(email = %session.user.email, role = ?session.role, "signed in");
        Ok(session)
    }

    pub fn sign_out(&self) -> Result<()> {
        self.store.remove(keys::AUTH_TOKEN)?;
        self.store.remove(keys::AUTH_USER)?;
        self.store.remove(keys::AUTH_EXPIRY)?;
        info!("signed out");
        Ok(())
    }

    pub fn session_at(&self, now: DateTime<Utc>) -> Result<Option<Session>> {
        let token: Option<String> = load_json(&self.store, keys::AUTH_TOKEN)?;
        let user: Option<User> = load_json(&self.store, keys::AUTH_USER)?;
        let expiry: Option<DateTime<Utc>> = load_json(&self.store, keys::AUTH_EXPIRY)?;

        let (Some(token), Some(user), Some(expires_at)) = (token, user, expiry) else {
            return Ok(None);
        };
        let session = Session {
            token,
            role: self.role_for(&user.email),
            user,
            expires_at,
        };
        if session.is_expired_at(now) {
            debug!(email = %session.user.email, "stored session expired");
            return Ok(None);
        }
        Ok(Some(session))
    }
}

impl<S: KeyValueStore> SessionProvider for StoredSessionProvider<S> {
    fn current(&self) -> Result<Option<Session>> {
        self.session_at(Utc::now())
    }
}

/// A provider with a fixed answer.
#[derive(Debug, Clone, Default)]
pub struct StaticSession(pub Option<Session>);

impl StaticSession {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn with_role(role: Role) -> Self {
        let email = match role {
            Role::Admin => "admin@storefront.test",
            Role::Customer => "shopper@storefront.test",
        };
        Self(Some(Session {
            token: "static-token".to_string(),
            user: User {
                email: email.to_string(),
                name: email.split('@').next().unwrap_or_default().to_string(),
            },
            role,
            expires_at: DateTime::<Utc>::MAX_UTC,
        }))
    }

    pub fn admin() -> Self {
        Self::with_role(Role::Admin)
    }

    pub fn customer() -> Self {
        Self::with_role(Role::Customer)
    }
}

impl SessionProvider for StaticSession {
    fn current(&self) -> Result<Option<Session>> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;
    use std::rc::Rc;

    fn provider() -> (Rc<MemBackend>, StoredSessionProvider<Rc<MemBackend>>) {
        let store = Rc::new(MemBackend::new());
        let provider = StoredSessionProvider::new(store.clone(), &StorefrontConfig::default());
        (store, provider)
    }

    #[test]
    fn admin_email_signs_in_as_admin() {
        let (_, sessions) = provider();
        let session = sessions.sign_in("ADMIN@storefront.test", "Ada").unwrap();
        assert_eq!(session.role, Role::Admin);
        assert_eq!(sessions.current().unwrap(), Some(session));
        assert!(require_admin(&sessions).is_ok());
    }

    #[test]
    fn configured_admin_email_decides_the_role() {
        let config = StorefrontConfig {
            admin_email: "owner@shop.test".into(),
            ..StorefrontConfig::default()
        };
        let sessions = StoredSessionProvider::new(Rc::new(MemBackend::new()), &config);
        let owner = sessions.sign_in(" Owner@Shop.test", "").unwrap();
        assert_eq!(owner.role, Role::Admin);
        let old_admin = sessions.sign_in("admin@storefront.test", "").unwrap();
        assert_eq!(old_admin.role, Role::Customer);
    }

    #[test]
    fn other_emails_are_customers() {
        let (_, sessions) = provider();
        let session = sessions.sign_in("shopper@example.com", "").unwrap();
        assert_eq!(session.role, Role::Customer);
        assert_eq!(session.user.name, "shopper");
        assert!(matches!(
            require_admin(&sessions),
            Err(StoreError::Permission(_))
        ));
    }

    #[test]
    fn sign_in_persists_the_three_keys() {
        let (store, sessions) = provider();
        sessions.sign_in("shopper@example.com", "Sam").unwrap();
        assert!(store.raw(keys::AUTH_TOKEN).is_some());
        assert!(store.raw(keys::AUTH_USER).is_some());
        assert!(store.raw(keys::AUTH_EXPIRY).is_some());

        sessions.sign_out().unwrap();
        assert!(store.raw(keys::AUTH_TOKEN).is_none());
        assert_eq!(sessions.current().unwrap(), None);
    }

    #[test]
    fn expired_session_resolves_to_none() {
        let (_, sessions) = provider();
        let session = sessions.sign_in("shopper@example.com", "Sam").unwrap();
        let later = session.expires_at + chrono::Duration::seconds(1);
        assert_eq!(sessions.session_at(later).unwrap(), None);
    }

    #[test]
    fn malformed_email_is_a_validation_error() {
        let (_, sessions) = provider();
        let err = sessions.sign_in("not-an-email", "x").unwrap_err();
        assert!(matches!(err, StoreError::Validation { field: "email", .. }));
    }

    #[test]
    fn anonymous_callers_are_refused() {
        assert!(matches!(
            require_admin(&StaticSession::anonymous()),
            Err(StoreError::Permission(_))
        ));
        assert!(require_admin(&StaticSession::admin()).is_ok());
    }
}
