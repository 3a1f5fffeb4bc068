//! Donor search page.

use crate::config::MailConfig;
use crate::donor::{Donor, DonorDirectory};
use crate::error::Result;
use crate::mail::MailLink;
use crate::storage::KeyValueStore;

/// Matches for one search plus a link to email all of them.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    /// Matching donors, in store order.
    pub donors: Vec<Donor>,
    /// Blind-copy mail link to every match; `None` when nothing matched.
    pub mail_link: Option<MailLink>,
}

/// Searches donors by blood group and city.
#[derive(Debug)]
pub struct SearchPage<'a, S: ?Sized> {
    donors: DonorDirectory<'a, S>,
    mail: &'a MailConfig,
}

impl<'a, S: KeyValueStore + ?Sized> SearchPage<'a, S> {
    /// Build the page over the donor directory.
    pub fn new(donors: DonorDirectory<'a, S>, mail: &'a MailConfig) -> Self {
        Self { donors, mail }
    }

    /// Run a search. Blank input simply matches nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn search(&self, blood_group: &str, city: &str) -> Result<SearchResults> {
        let donors = self.donors.find_by_group_and_city(blood_group, city)?;
        let mail_link = (!donors.is_empty()).then(|| MailLink {
            to: Vec::new(),
            bcc: donors.iter().map(|d| d.email.clone()).collect(),
            subject: self.mail.search_subject.clone(),
            body: self.mail.search_body.clone(),
        });
        Ok(SearchResults { donors, mail_link })
    }
}
