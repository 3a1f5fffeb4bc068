//! Blood request page: email every matching donor at once.

use tracing::info;

use crate::donor::{BloodGroup, DonorDirectory};
use crate::error::{Error, Result};
use crate::mail::MailLink;
use crate::storage::KeyValueStore;

use super::require_fields;

/// Raw blood request form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BloodRequestForm {
    /// Requester's name.
    pub name: String,
    /// Needed blood group.
    pub blood_group: String,
    /// Requester's email; donors reply here.
    pub email: String,
    /// Requester's contact number.
    pub contact: String,
    /// City the blood is needed in.
    pub city: String,
}

/// Builds urgent-request mail links.
#[derive(Debug)]
pub struct RequestPage<'a, S: ?Sized> {
    donors: DonorDirectory<'a, S>,
}

impl<'a, S: KeyValueStore + ?Sized> RequestPage<'a, S> {
    /// Build the page over the donor directory.
    pub fn new(donors: DonorDirectory<'a, S>) -> Self {
        Self { donors }
    }

    /// Validate the request and build a link addressed to the requester with
    /// every matching donor in blind copy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingFields`] for blank input,
    /// [`Error::NoDonorsFound`] when nobody matches, or a backend error.
    pub fn submit(&self, form: &BloodRequestForm) -> Result<MailLink> {
        require_fields(&[
            ("name", form.name.as_str()),
            ("blood group", form.blood_group.as_str()),
            ("email", form.email.as_str()),
            ("contact", form.contact.as_str()),
            ("city", form.city.as_str()),
        ])?;
        let group: BloodGroup = form.blood_group.parse()?;
        let name = form.name.trim();
        let email = form.email.trim();
        let contact = form.contact.trim();
        let city = form.city.trim();

        let matches = self.donors.find_by_group_and_city(group.as_str(), city)?;
        if matches.is_empty() {
            return Err(Error::NoDonorsFound);
        }
        info!("Blood request for {group} in {city} reaches {} donor(s)", matches.len());

        Ok(MailLink {
            to: vec![email.to_string()],
            bcc: matches.into_iter().map(|d| d.email).collect(),
            subject: format!("Urgent blood request: {group} in {city}"),
            body: format!(
                "Hello,\n\nThis is {name} ({contact}). We urgently need {group} blood in {city}. \
                 If you are available to donate, please reply to {email}.\n\nThank you!"
            ),
        })
    }
}
