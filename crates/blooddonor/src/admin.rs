//! Admin email list.
//!
//! The list is read-only to the application. When the store has never been
//! given one, the configured defaults apply.

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;
use crate::storage::{self, normalize, KeyValueStore, StorageKey};

/// Read-only view of the admin email set.
#[derive(Debug)]
pub struct AdminList<'a, S: ?Sized> {
    store: &'a S,
    defaults: &'a [String],
}

impl<'a, S: KeyValueStore + ?Sized> AdminList<'a, S> {
    /// Wrap a store with the list to use when none is stored.
    pub fn new(store: &'a S, defaults: &'a [String]) -> Self {
        Self { store, defaults }
    }

    /// Normalized admin emails.
    ///
    /// An absent or unparseable stored value falls back to the defaults. A
    /// stored value that parses but is not a list reads as empty, which means
    /// nobody is an admin until it is repaired.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn emails(&self) -> Result<Vec<String>> {
        let fallback = Value::Array(self.defaults.iter().cloned().map(Value::String).collect());
        let Value::Array(items) = storage::read_json(self.store, StorageKey::AdminEmails, fallback)?
        else {
            warn!("{}: stored value is not a list", StorageKey::AdminEmails);
            return Ok(Vec::new());
        };

        Ok(items
            .iter()
            .filter_map(Value::as_str)
            .map(normalize)
            .collect())
    }

    /// Whether `email` is an admin, compared after normalization.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn contains(&self, email: &str) -> Result<bool> {
        let wanted = normalize(email);
        let found = self.emails()?.contains(&wanted);
        debug!("admin check for {wanted}: {found}");
        Ok(found)
    }
}
