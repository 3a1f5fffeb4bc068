//! Admin page: approve or decline camp requests.

use tracing::warn;

use crate::account::Accounts;
use crate::camp::{CampRequest, CampRequests, Decision};
use crate::error::{Error, Result};
use crate::storage::KeyValueStore;

/// Signed-in admin's view of the camp request queue.
///
/// Only obtainable through [`AdminPage::enter`], which checks the session.
#[derive(Debug)]
pub struct AdminPage<'a, S: ?Sized> {
    camps: CampRequests<'a, S>,
    admin_email: String,
}

impl<'a, S: KeyValueStore + ?Sized> AdminPage<'a, S> {
    /// Open the page if the logged-in user is an admin.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthorized`] for anyone else, or a backend error.
    pub fn enter(accounts: &Accounts<'a, S>, camps: CampRequests<'a, S>) -> Result<Self> {
        let user = accounts.current_user()?;
        let admin_email = match user {
            Some(user) if accounts.admins().contains(&user.email)? => user.email,
            _ => {
                warn!("Admin page refused for non-admin session");
                return Err(Error::NotAuthorized);
            }
        };
        Ok(Self { camps, admin_email })
    }

    /// Email decisions are stamped with.
    #[must_use]
    pub fn admin_email(&self) -> &str {
        &self.admin_email
    }

    /// Requests awaiting a decision.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn pending(&self) -> Result<Vec<CampRequest>> {
        self.camps.pending()
    }

    /// Decided requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn history(&self) -> Result<Vec<CampRequest>> {
        self.camps.history()
    }

    /// Approve a request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CampRequestNotFound`] for an unknown id, or a backend
    /// error.
    pub fn approve(&self, id: &str, note: Option<&str>) -> Result<CampRequest> {
        self.decide(id, Decision::Approved, note)
    }

    /// Decline a request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CampRequestNotFound`] for an unknown id, or a backend
    /// error.
    pub fn decline(&self, id: &str, note: Option<&str>) -> Result<CampRequest> {
        self.decide(id, Decision::Declined, note)
    }

    fn decide(&self, id: &str, decision: Decision, note: Option<&str>) -> Result<CampRequest> {
        self.camps
            .decide(id, decision, Some(&self.admin_email), note)?
            .ok_or_else(|| Error::camp_request_not_found(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camp::{CampStatus, CampSubmission};
    use crate::storage::MemoryStore;

    fn defaults() -> Vec<String> {
        vec!["admin@example.com".to_string()]
    }

    fn submit(store: &MemoryStore, name: &str) -> CampRequest {
        CampRequests::new(store)
            .submit(CampSubmission {
                event_name: name.to_string(),
                date: "2024-05-01".to_string(),
                city: "Pune".to_string(),
                requested_by: None,
            })
            .unwrap()
    }

    #[test]
    fn test_enter_requires_admin() {
        let store = MemoryStore::new();
        let defaults = defaults();
        let accounts = Accounts::new(&store, &defaults);

        assert!(matches!(
            AdminPage::enter(&accounts, CampRequests::new(&store)),
            Err(Error::NotAuthorized)
        ));

        accounts.signup("user", "user@x.org", "pw").unwrap();
        assert!(matches!(
            AdminPage::enter(&accounts, CampRequests::new(&store)),
            Err(Error::NotAuthorized)
        ));
    }

    #[test]
    fn test_approve_and_decline() {
        let store = MemoryStore::new();
        let defaults = defaults();
        let accounts = Accounts::new(&store, &defaults);
        accounts.signup("boss", "Admin@Example.com", "pw").unwrap();
        let a = submit(&store, "A");
        let b = submit(&store, "B");

        let page = AdminPage::enter(&accounts, CampRequests::new(&store)).unwrap();
        assert_eq!(page.admin_email(), "Admin@Example.com");
        assert_eq!(page.pending().unwrap().len(), 2);

        let approved = page.approve(&a.id, None).unwrap();
        assert_eq!(approved.status, CampStatus::Approved);
        assert_eq!(approved.decided_by.as_deref(), Some("Admin@Example.com"));

        let declined = page.decline(&b.id, Some("no venue")).unwrap();
        assert_eq!(declined.status, CampStatus::Declined);
        assert_eq!(declined.note, "no venue");

        assert!(page.pending().unwrap().is_empty());
        assert_eq!(page.history().unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_request() {
        let store = MemoryStore::new();
        let defaults = defaults();
        let accounts = Accounts::new(&store, &defaults);
        accounts.signup("boss", "admin@example.com", "pw").unwrap();
        let page = AdminPage::enter(&accounts, CampRequests::new(&store)).unwrap();

        assert!(matches!(
            page.approve("nope", None),
            Err(Error::CampRequestNotFound { .. })
        ));
    }
}
