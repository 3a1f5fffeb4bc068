//! Camp organizing page.

use crate::account::Accounts;
use crate::camp::{CampRequest, CampRequests, CampSubmission};
use crate::error::Result;
use crate::storage::KeyValueStore;

use super::require_fields;

/// Raw camp request form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizeForm {
    /// Event name.
    pub event_name: String,
    /// Proposed date.
    pub date: String,
    /// City.
    pub city: String,
}

/// Submits camp requests for admin approval.
#[derive(Debug)]
pub struct OrganizePage<'a, S: ?Sized> {
    accounts: Accounts<'a, S>,
    camps: CampRequests<'a, S>,
}

impl<'a, S: KeyValueStore + ?Sized> OrganizePage<'a, S> {
    /// Build the page. Accounts are only read, to stamp the requester.
    pub fn new(accounts: Accounts<'a, S>, camps: CampRequests<'a, S>) -> Self {
        Self { accounts, camps }
    }

    /// Validate and submit a camp request, attributed to the logged-in user
    /// when there is one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingFields`](crate::Error::MissingFields) for
    /// blank input, or a backend error.
    pub fn submit(&self, form: &OrganizeForm) -> Result<CampRequest> {
        require_fields(&[
            ("event name", form.event_name.as_str()),
            ("date", form.date.as_str()),
            ("city", form.city.as_str()),
        ])?;

        let requested_by = self.accounts.current_user()?.map(|u| u.email);
        self.camps.submit(CampSubmission {
            event_name: form.event_name.trim().to_string(),
            date: form.date.trim().to_string(),
            city: form.city.trim().to_string(),
            requested_by,
        })
    }
}
