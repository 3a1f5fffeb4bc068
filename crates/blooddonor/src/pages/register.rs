//! Donor registration page.

use tracing::info;

use crate::donor::{BloodGroup, Donor, DonorDirectory, DonorRegistration};
use crate::error::Result;
use crate::storage::KeyValueStore;

use super::require_fields;

/// Raw registration form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    /// Donor name.
    pub name: String,
    /// Blood group label, e.g. `B+`.
    pub blood_group: String,
    /// Email.
    pub email: String,
    /// Contact number.
    pub contact: String,
    /// City.
    pub city: String,
}

/// Registers donors.
#[derive(Debug)]
pub struct RegisterPage<'a, S: ?Sized> {
    donors: DonorDirectory<'a, S>,
}

impl<'a, S: KeyValueStore + ?Sized> RegisterPage<'a, S> {
    /// Build the page over the donor directory.
    pub fn new(donors: DonorDirectory<'a, S>) -> Self {
        Self { donors }
    }

    /// Validate and store a registration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingFields`](crate::Error::MissingFields) for
    /// blank input, [`Error::InvalidBloodGroup`](crate::Error::InvalidBloodGroup)
    /// for an unknown group, or a backend error.
    pub fn submit(&self, form: &RegisterForm) -> Result<Donor> {
        require_fields(&[
            ("name", form.name.as_str()),
            ("blood group", form.blood_group.as_str()),
            ("email", form.email.as_str()),
            ("contact", form.contact.as_str()),
            ("city", form.city.as_str()),
        ])?;
        let blood_group: BloodGroup = form.blood_group.parse()?;

        let donor = self.donors.upsert(DonorRegistration {
            name: form.name.clone(),
            blood_group,
            email: form.email.clone(),
            contact: form.contact.clone(),
            city: form.city.clone(),
        })?;
        info!("Registration page stored donor {}", donor.id);
        Ok(donor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::storage::MemoryStore;

    fn form() -> RegisterForm {
        RegisterForm {
            name: "Asha".to_string(),
            blood_group: "b+".to_string(),
            email: "asha@x.org".to_string(),
            contact: "555".to_string(),
            city: "Pune".to_string(),
        }
    }

    #[test]
    fn test_submit_registers() {
        let store = MemoryStore::new();
        let page = RegisterPage::new(DonorDirectory::new(&store));

        let donor = page.submit(&form()).unwrap();
        assert_eq!(donor.blood_group, BloodGroup::BPos);
        assert_eq!(DonorDirectory::new(&store).list().unwrap(), vec![donor]);
    }

    #[test]
    fn test_submit_requires_all_fields() {
        let store = MemoryStore::new();
        let page = RegisterPage::new(DonorDirectory::new(&store));
        let mut input = form();
        input.contact = "   ".to_string();

        assert!(matches!(
            page.submit(&input),
            Err(Error::MissingFields { .. })
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_submit_rejects_unknown_group() {
        let store = MemoryStore::new();
        let page = RegisterPage::new(DonorDirectory::new(&store));
        let mut input = form();
        input.blood_group = "Z".to_string();

        assert!(matches!(
            page.submit(&input),
            Err(Error::InvalidBloodGroup(_))
        ));
    }
}
