//! Blood camp requests and their approval workflow.
//!
//! A request starts `pending` and is decided once as `approved` or
//! `declined`. [`Decision`] has no pending variant, so a decided request can
//! never go back to pending.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::storage::{self, KeyValueStore, StorageKey};

/// Lifecycle state of a camp request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampStatus {
    /// Waiting for an admin.
    Pending,
    /// Approved by an admin.
    Approved,
    /// Declined by an admin.
    Declined,
}

impl CampStatus {
    /// Whether an admin has decided this request.
    #[must_use]
    pub fn is_decided(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for CampStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Declined => "declined",
        })
    }
}

/// An admin's verdict on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Approve the camp.
    Approved,
    /// Decline the camp.
    Declined,
}

impl From<Decision> for CampStatus {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Approved => Self::Approved,
            Decision::Declined => Self::Declined,
        }
    }
}

/// A request to hold a blood donation camp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampRequest {
    /// Opaque unique id.
    pub id: String,
    /// Name of the event.
    #[serde(default)]
    pub event_name: String,
    /// Proposed date, as entered.
    #[serde(default)]
    pub date: String,
    /// City the camp would be held in.
    #[serde(default)]
    pub city: String,
    /// Email of the submitting user, if they were logged in.
    #[serde(default)]
    pub requested_by: Option<String>,
    /// Lifecycle state.
    pub status: CampStatus,
    /// When the request was submitted.
    pub created_at: DateTime<Utc>,
    /// When an admin decided it.
    #[serde(default)]
    pub decided_at: Option<DateTime<Utc>>,
    /// Email of the deciding admin.
    #[serde(default)]
    pub decided_by: Option<String>,
    /// Free-text note attached to the decision.
    #[serde(default)]
    pub note: String,
}

/// Input for a new camp request. Callers validate non-empty fields first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampSubmission {
    /// Name of the event.
    pub event_name: String,
    /// Proposed date.
    pub date: String,
    /// City.
    pub city: String,
    /// Email of the submitting user, if logged in.
    pub requested_by: Option<String>,
}

/// Camp request view over a [`KeyValueStore`].
#[derive(Debug)]
pub struct CampRequests<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> CampRequests<'a, S> {
    /// Wrap a store.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// All requests in submission order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn list(&self) -> Result<Vec<CampRequest>> {
        storage::read_list(self.store, StorageKey::CampRequests)
    }

    /// Requests still waiting for a decision.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn pending(&self) -> Result<Vec<CampRequest>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|r| !r.status.is_decided())
            .collect())
    }

    /// Requests that have been approved or declined.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn history(&self) -> Result<Vec<CampRequest>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|r| r.status.is_decided())
            .collect())
    }

    /// Record a new pending request. Stored requests are kept as they are,
    /// including ones that do not decode.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn submit(&self, submission: CampSubmission) -> Result<CampRequest> {
        let mut raw = storage::read_raw_list(self.store, StorageKey::CampRequests)?;
        let request = CampRequest {
            id: storage::new_id(),
            event_name: submission.event_name,
            date: submission.date,
            city: submission.city,
            requested_by: submission.requested_by,
            status: CampStatus::Pending,
            created_at: Utc::now(),
            decided_at: None,
            decided_by: None,
            note: String::new(),
        };
        raw.push(serde_json::to_value(&request)?);
        storage::write_json(self.store, StorageKey::CampRequests, &raw)?;

        info!("Camp request {} submitted", request.id);
        Ok(request)
    }

    /// Apply an admin decision to the request with `id`.
    ///
    /// Returns `Ok(None)` when no request has that id. Deciding an
    /// already-decided request overwrites the earlier decision; it is logged
    /// but not refused.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn decide(
        &self,
        id: &str,
        decision: Decision,
        decided_by: Option<&str>,
        note: Option<&str>,
    ) -> Result<Option<CampRequest>> {
        let mut raw = storage::read_raw_list(self.store, StorageKey::CampRequests)?;
        let found = storage::decode_entries::<CampRequest>(StorageKey::CampRequests, &raw)
            .into_iter()
            .find(|(_, r)| r.id == id);
        let Some((ix, mut request)) = found else {
            warn!("Camp request {id} not found");
            return Ok(None);
        };

        if request.status.is_decided() {
            warn!(
                "Camp request {id} was already {}; overwriting decision",
                request.status
            );
        }
        request.status = decision.into();
        request.decided_at = Some(Utc::now());
        request.decided_by = decided_by.map(str::to_string);
        request.note = note.unwrap_or_default().to_string();
        raw[ix] = serde_json::to_value(&request)?;

        storage::write_json(self.store, StorageKey::CampRequests, &raw)?;
        info!("Camp request {id} {}", request.status);
        Ok(Some(request))
    }
}
