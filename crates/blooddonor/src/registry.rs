//! The `LocalStore` façade.
//!
//! Owns one [`KeyValueStore`] and hands out borrowed collection views. Every
//! mutation reads the full collection, changes it, and writes it back.

use tracing::info;

use crate::account::Accounts;
use crate::admin::AdminList;
use crate::camp::CampRequests;
use crate::config::Config;
use crate::donor::DonorDirectory;
use crate::error::Result;
use crate::storage::{KeyValueStore, MemoryStore, SqliteStore};

/// Typed access to every registry collection in one store.
#[derive(Debug)]
pub struct LocalStore<S> {
    store: S,
    admin_defaults: Vec<String>,
}

impl LocalStore<SqliteStore> {
    /// Open the configured on-disk registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(config: &Config) -> Result<Self> {
        let store = SqliteStore::open(config.database_path())?;
        info!("Using registry at {}", store.path().display());
        Ok(Self::new(store, config.admin.default_emails.clone()))
    }
}

impl LocalStore<MemoryStore> {
    /// A throwaway registry with the built-in admin defaults.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new(), Config::default().admin.default_emails)
    }
}

impl<S: KeyValueStore> LocalStore<S> {
    /// Wrap a store. `admin_defaults` applies while the store holds no
    /// admin list.
    pub fn new(store: S, admin_defaults: Vec<String>) -> Self {
        Self {
            store,
            admin_defaults,
        }
    }

    /// The underlying key-value store.
    pub fn backend(&self) -> &S {
        &self.store
    }

    /// Donor directory.
    pub fn donors(&self) -> DonorDirectory<'_, S> {
        DonorDirectory::new(&self.store)
    }

    /// Users and session.
    pub fn accounts(&self) -> Accounts<'_, S> {
        Accounts::new(&self.store, &self.admin_defaults)
    }

    /// Camp requests.
    pub fn camps(&self) -> CampRequests<'_, S> {
        CampRequests::new(&self.store)
    }

    /// Admin email list.
    pub fn admins(&self) -> AdminList<'_, S> {
        AdminList::new(&self.store, &self.admin_defaults)
    }

    /// Whether the logged-in user is an admin.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn is_admin(&self) -> Result<bool> {
        self.accounts().is_admin()
    }
}
