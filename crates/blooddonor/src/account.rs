//! Accounts and the session pointer.
//!
//! Passwords are stored and compared as plain text. The session is a single
//! `{userId}` record; at most one user is logged in per store.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::admin::AdminList;
use crate::error::{Error, Result};
use crate::storage::{self, normalize, KeyValueStore, StorageKey};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque unique id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub username: String,
    /// Login email; unique after normalization.
    pub email: String,
    /// Plain-text password.
    #[serde(default)]
    pub password: String,
}

/// The session pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Id of the logged-in user.
    pub user_id: String,
}

/// User and session view over a [`KeyValueStore`].
#[derive(Debug)]
pub struct Accounts<'a, S: ?Sized> {
    store: &'a S,
    admin_defaults: &'a [String],
}

impl<'a, S: KeyValueStore + ?Sized> Accounts<'a, S> {
    /// Wrap a store. `admin_defaults` backs [`Accounts::is_admin`] when the
    /// store holds no admin list.
    pub fn new(store: &'a S, admin_defaults: &'a [String]) -> Self {
        Self {
            store,
            admin_defaults,
        }
    }

    /// All users in store order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn users(&self) -> Result<Vec<User>> {
        storage::read_list(self.store, StorageKey::Users)
    }

    /// Create a user and log them in.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateEmail`] if the normalized email is taken,
    /// even by a stored record that does not decode, or a backend error.
    pub fn signup(&self, username: &str, email: &str, password: &str) -> Result<User> {
        let mut raw = storage::read_raw_list(self.store, StorageKey::Users)?;
        let key = normalize(email);
        if raw.iter().any(|item| storage::field_matches(item, "email", &key)) {
            warn!("Signup rejected: {key} already registered");
            return Err(Error::duplicate_email(email));
        }

        let user = User {
            id: storage::new_id(),
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        raw.push(serde_json::to_value(&user)?);
        storage::write_json(self.store, StorageKey::Users, &raw)?;
        self.start_session(&user)?;

        info!("Signed up user {}", user.id);
        Ok(user)
    }

    /// Log in with an email (normalized) and an exact password.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCredentials`] if no user matches; the session
    /// is left untouched in that case.
    pub fn login(&self, email: &str, password: &str) -> Result<User> {
        let key = normalize(email);
        let user = self
            .users()?
            .into_iter()
            .find(|u| normalize(&u.email) == key && u.password == password)
            .ok_or(Error::InvalidCredentials)?;

        self.start_session(&user)?;
        info!("Logged in user {}", user.id);
        Ok(user)
    }

    /// The logged-in user, if any.
    ///
    /// A session pointing at a user that no longer exists reads as logged out.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn current_user(&self) -> Result<Option<User>> {
        let Some(session) = self.session()? else {
            return Ok(None);
        };
        Ok(self.users()?.into_iter().find(|u| u.id == session.user_id))
    }

    /// The raw session pointer.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn session(&self) -> Result<Option<Session>> {
        storage::read_json(self.store, StorageKey::Session, None)
    }

    /// Clear the session. Logging out twice is fine.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn logout(&self) -> Result<()> {
        self.store.remove_item(StorageKey::Session.as_str())?;
        info!("Logged out");
        Ok(())
    }

    /// The admin list this view checks against.
    pub fn admins(&self) -> AdminList<'a, S> {
        AdminList::new(self.store, self.admin_defaults)
    }

    /// Whether the logged-in user's email is on the admin list.
    ///
    /// Client-side and advisory: anyone who can edit the store can grant
    /// themselves admin.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn is_admin(&self) -> Result<bool> {
        match self.current_user()? {
            Some(user) => self.admins().contains(&user.email),
            None => Ok(false),
        }
    }

    fn start_session(&self, user: &User) -> Result<()> {
        let session = Session {
            user_id: user.id.clone(),
        };
        storage::write_json(self.store, StorageKey::Session, &session)
    }
}
