//! Storage layer for blooddonor.
//!
//! Every collection lives as one JSON document under a fixed string key in a
//! [`KeyValueStore`]. Writes replace the whole value; there are no partial
//! updates and no transactions, so concurrent writers get last-write-wins.
//!
//! Reads are soft: an absent key or a value that fails to parse yields the
//! caller's fallback instead of an error. Backend failures (the database
//! itself going away) still propagate.

pub mod memory;
pub mod migrations;
pub mod schema;
pub mod sqlite;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Result;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// A persistent string-to-string mapping.
///
/// Methods take `&self`; implementations provide their own interior
/// mutability so several collection views can share one store.
pub trait KeyValueStore {
    /// Fetch the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, fully replacing any prior content.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove_item(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }
}

/// The fixed keys the registry stores its collections under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Donor list.
    Donors,
    /// User list.
    Users,
    /// Session pointer.
    Session,
    /// Camp request list.
    CampRequests,
    /// Admin email list.
    AdminEmails,
}

impl StorageKey {
    /// All keys, in layout order.
    pub const ALL: [Self; 5] = [
        Self::Donors,
        Self::Users,
        Self::Session,
        Self::CampRequests,
        Self::AdminEmails,
    ];

    /// The raw key string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Donors => "bd_donors",
            Self::Users => "bd_users",
            Self::Session => "bd_session",
            Self::CampRequests => "bd_camp_requests",
            Self::AdminEmails => "bd_admin_emails",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored value could not be decoded.
#[derive(Debug, thiserror::Error)]
#[error("malformed stored value: {0}")]
pub struct ParseError(#[from] serde_json::Error);

/// Decode a raw stored value.
///
/// # Errors
///
/// Returns a [`ParseError`] when `raw` is not valid JSON for `T`.
pub fn parse<T: DeserializeOwned>(raw: &str) -> std::result::Result<T, ParseError> {
    Ok(serde_json::from_str(raw)?)
}

/// Fallback combinator for soft reads.
pub trait OrFallback<T> {
    /// Return the parsed value, or `fallback` after logging the failure.
    fn or_fallback(self, key: StorageKey, fallback: T) -> T;
}

impl<T> OrFallback<T> for std::result::Result<T, ParseError> {
    fn or_fallback(self, key: StorageKey, fallback: T) -> T {
        self.unwrap_or_else(|err| {
            warn!("{key}: {err}; using fallback");
            fallback
        })
    }
}

/// Read and decode the value under `key`, or `fallback` if it is absent,
/// empty, or malformed.
///
/// # Errors
///
/// Returns an error only if the backend itself fails.
pub fn read_json<T, S>(store: &S, key: StorageKey, fallback: T) -> Result<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get_item(key.as_str())? {
        Some(raw) if !raw.is_empty() => Ok(parse(&raw).or_fallback(key, fallback)),
        _ => {
            debug!("{key}: absent, using fallback");
            Ok(fallback)
        }
    }
}

/// Read the raw elements of the list stored under `key`.
///
/// A value that is not a JSON array reads as an empty list. Elements are
/// returned untouched, so writers can put back records they could not
/// decode.
///
/// # Errors
///
/// Returns an error only if the backend itself fails.
pub fn read_raw_list<S>(store: &S, key: StorageKey) -> Result<Vec<Value>>
where
    S: KeyValueStore + ?Sized,
{
    match read_json(store, key, Value::Array(Vec::new()))? {
        Value::Array(items) => Ok(items),
        _ => {
            warn!("{key}: stored value is not a list; treating as empty");
            Ok(Vec::new())
        }
    }
}

/// Decode the elements of `raw` that fit `T`, paired with their index.
///
/// Elements that do not decode are left out of the view but stay in `raw`.
pub fn decode_entries<T: DeserializeOwned>(key: StorageKey, raw: &[Value]) -> Vec<(usize, T)> {
    let entries: Vec<(usize, T)> = raw
        .iter()
        .enumerate()
        .filter_map(|(ix, item)| T::deserialize(item).ok().map(|value| (ix, value)))
        .collect();

    if entries.len() < raw.len() {
        warn!(
            "{key}: {} of {} record(s) are unreadable",
            raw.len() - entries.len(),
            raw.len()
        );
    }
    entries
}

/// Read a list stored under `key`.
///
/// A value that is not a JSON array reads as an empty list. Elements that do
/// not decode as `T` are skipped, so one damaged record does not hide the
/// rest of the collection.
///
/// # Errors
///
/// Returns an error only if the backend itself fails.
pub fn read_list<T, S>(store: &S, key: StorageKey) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = read_raw_list(store, key)?;
    let list: Vec<T> = decode_entries(key, &raw)
        .into_iter()
        .map(|(_, value)| value)
        .collect();
    debug!("{key}: read {} record(s)", list.len());
    Ok(list)
}

/// Whether the string field `field` of a raw record equals `wanted` after
/// normalization. `wanted` must already be normalized.
#[must_use]
pub fn field_matches(item: &Value, field: &str, wanted: &str) -> bool {
    item.get(field)
        .and_then(Value::as_str)
        .is_some_and(|value| normalize(value) == wanted)
}

/// Serialize `value` and store it under `key`, replacing prior content.
///
/// # Errors
///
/// Returns an error if serialization or the backend write fails.
pub fn write_json<T, S>(store: &S, key: StorageKey, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    debug!("{key}: writing {} bytes", raw.len());
    store.set_item(key.as_str(), &raw)
}

/// Generate a fresh opaque record id.
#[must_use]
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Trim and lowercase a value for comparison. Stored values keep their
/// original casing; only comparisons go through this.
#[must_use]
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}
