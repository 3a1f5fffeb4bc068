//! Donor directory.
//!
//! Donors are keyed by normalized email: registering an address that is
//! already present updates that record in place instead of adding a second
//! one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::storage::{self, normalize, KeyValueStore, StorageKey};

/// One of the eight ABO/Rh blood groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BloodGroup {
    /// A positive.
    APos,
    /// A negative.
    ANeg,
    /// B positive.
    BPos,
    /// B negative.
    BNeg,
    /// AB positive.
    AbPos,
    /// AB negative.
    AbNeg,
    /// O positive.
    OPos,
    /// O negative.
    ONeg,
}

impl BloodGroup {
    /// All groups in menu order.
    pub const ALL: [Self; 8] = [
        Self::APos,
        Self::ANeg,
        Self::BPos,
        Self::BNeg,
        Self::AbPos,
        Self::AbNeg,
        Self::OPos,
        Self::ONeg,
    ];

    /// The conventional label, e.g. `AB-`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::APos => "A+",
            Self::ANeg => "A-",
            Self::BPos => "B+",
            Self::BNeg => "B-",
            Self::AbPos => "AB+",
            Self::AbNeg => "AB-",
            Self::OPos => "O+",
            Self::ONeg => "O-",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for BloodGroup {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|group| group.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| Error::InvalidBloodGroup(s.to_string()))
    }
}

impl Serialize for BloodGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BloodGroup {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A registered donor as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donor {
    /// Opaque unique id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Blood group.
    pub blood_group: BloodGroup,
    /// Contact email; unique after normalization.
    #[serde(default)]
    pub email: String,
    /// Phone number or other contact detail.
    #[serde(default)]
    pub contact: String,
    /// City the donor lives in.
    #[serde(default)]
    pub city: String,
    /// Fields this crate does not know about, kept so a rewrite does not drop them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Donor {
    /// Stored field names owned by [`Donor`]; everything else lands in `extra`.
    const FIELDS: [&'static str; 6] = ["id", "name", "bloodGroup", "email", "contact", "city"];
}

/// Input for registering or updating a donor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonorRegistration {
    /// Display name.
    pub name: String,
    /// Blood group.
    pub blood_group: BloodGroup,
    /// Contact email; decides whether this is an insert or an update.
    pub email: String,
    /// Phone number or other contact detail.
    pub contact: String,
    /// City.
    pub city: String,
}

impl DonorRegistration {
    fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            blood_group: self.blood_group,
            email: self.email.trim().to_string(),
            contact: self.contact.trim().to_string(),
            city: self.city.trim().to_string(),
        }
    }

    /// Overwrite a stored record, keeping its id and every field this crate
    /// does not own. A record without a string id gets a fresh one.
    fn merge_into(self, stored: &Value) -> Donor {
        let mut extra = stored.as_object().cloned().unwrap_or_default();
        let id = match extra.get("id") {
            Some(Value::String(id)) => id.clone(),
            _ => storage::new_id(),
        };
        for field in Donor::FIELDS {
            extra.remove(field);
        }

        let mut donor = self.into_donor(id);
        donor.extra = extra;
        donor
    }

    fn into_donor(self, id: String) -> Donor {
        Donor {
            id,
            name: self.name,
            blood_group: self.blood_group,
            email: self.email,
            contact: self.contact,
            city: self.city,
            extra: Map::new(),
        }
    }
}

/// Donor collection view over a [`KeyValueStore`].
#[derive(Debug)]
pub struct DonorDirectory<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> DonorDirectory<'a, S> {
    /// Wrap a store.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// All donors in store order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails. Malformed data reads as empty.
    pub fn list(&self) -> Result<Vec<Donor>> {
        storage::read_list(self.store, StorageKey::Donors)
    }

    /// Register a donor, or update the existing record with the same
    /// normalized email.
    ///
    /// An update keeps the record's id, its position and any unknown stored
    /// fields; the five registration fields are overwritten. Other records
    /// are written back exactly as stored, including ones that do not decode.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn upsert(&self, registration: DonorRegistration) -> Result<Donor> {
        let registration = registration.trimmed();
        let mut raw = storage::read_raw_list(self.store, StorageKey::Donors)?;
        let key = normalize(&registration.email);

        let donor = match raw
            .iter()
            .position(|item| storage::field_matches(item, "email", &key))
        {
            Some(ix) => {
                let donor = registration.merge_into(&raw[ix]);
                raw[ix] = serde_json::to_value(&donor)?;
                info!("Updated donor {}", donor.id);
                donor
            }
            None => {
                let donor = registration.into_donor(storage::new_id());
                raw.push(serde_json::to_value(&donor)?);
                info!("Registered donor {}", donor.id);
                donor
            }
        };

        storage::write_json(self.store, StorageKey::Donors, &raw)?;
        Ok(donor)
    }

    /// Donors whose blood group and city both match, ignoring case and
    /// surrounding whitespace. No match is an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn find_by_group_and_city(&self, group: &str, city: &str) -> Result<Vec<Donor>> {
        let group = normalize(group);
        let city = normalize(city);

        let matches: Vec<Donor> = self
            .list()?
            .into_iter()
            .filter(|d| normalize(d.blood_group.as_str()) == group && normalize(&d.city) == city)
            .collect();

        debug!("{} donor(s) match {group} in {city}", matches.len());
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn registration(email: &str, group: BloodGroup, city: &str) -> DonorRegistration {
        DonorRegistration {
            name: "Asha".to_string(),
            blood_group: group,
            email: email.to_string(),
            contact: "555-0100".to_string(),
            city: city.to_string(),
        }
    }

    #[test]
    fn test_blood_group_parse_is_lenient() {
        assert_eq!(" ab+ ".parse::<BloodGroup>().unwrap(), BloodGroup::AbPos);
        assert_eq!("O-".parse::<BloodGroup>().unwrap(), BloodGroup::ONeg);
        assert!("C+".parse::<BloodGroup>().is_err());
        assert!("".parse::<BloodGroup>().is_err());
    }

    #[test]
    fn test_blood_group_labels() {
        let labels: Vec<_> = BloodGroup::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(labels, ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"]);
    }

    #[test]
    fn test_empty_directory() {
        let store = MemoryStore::new();
        assert!(DonorDirectory::new(&store).list().unwrap().is_empty());
    }

    #[test]
    fn test_upsert_appends_new_donors() {
        let store = MemoryStore::new();
        let donors = DonorDirectory::new(&store);

        let a = donors
            .upsert(registration("a@x.org", BloodGroup::APos, "Pune"))
            .unwrap();
        let b = donors
            .upsert(registration("b@x.org", BloodGroup::BPos, "Delhi"))
            .unwrap();

        assert_ne!(a.id, b.id);
        let list = donors.list().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].email, "a@x.org");
        assert_eq!(list[1].email, "b@x.org");
    }

    #[test]
    fn test_upsert_same_email_updates_in_place() {
        let store = MemoryStore::new();
        let donors = DonorDirectory::new(&store);

        let first = donors
            .upsert(registration("Asha@X.org", BloodGroup::APos, "Pune"))
            .unwrap();
        donors
            .upsert(registration("other@x.org", BloodGroup::OPos, "Pune"))
            .unwrap();

        let mut again = registration("  asha@x.ORG ", BloodGroup::ANeg, "Mumbai");
        again.name = "Asha K".to_string();
        let updated = donors.upsert(again).unwrap();

        let list = donors.list().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0], updated);
        assert_eq!(updated.id, first.id);
        assert_eq!(updated.name, "Asha K");
        assert_eq!(updated.blood_group, BloodGroup::ANeg);
        assert_eq!(updated.city, "Mumbai");
        assert_eq!(updated.email, "asha@x.ORG");
    }

    #[test]
    fn test_upsert_preserves_unknown_fields() {
        let store = MemoryStore::new();
        store
            .set_item(
                "bd_donors",
                r#"[{"id":"d1","name":"Old","bloodGroup":"B+","email":"a@x.org","contact":"1","city":"Pune","verified":true}]"#,
            )
            .unwrap();

        let donors = DonorDirectory::new(&store);
        let updated = donors
            .upsert(registration("A@x.org", BloodGroup::BNeg, "Pune"))
            .unwrap();

        assert_eq!(updated.id, "d1");
        assert_eq!(updated.extra.get("verified"), Some(&Value::Bool(true)));
        let raw = store.get_item("bd_donors").unwrap().unwrap();
        assert!(raw.contains("\"verified\":true"));
    }

    fn stored(store: &MemoryStore) -> Vec<Value> {
        serde_json::from_str(&store.get_item("bd_donors").unwrap().unwrap()).unwrap()
    }

    #[test]
    fn test_upsert_keeps_unreadable_records() {
        let store = MemoryStore::new();
        store
            .set_item(
                "bd_donors",
                r#"[{"id":"d1","name":"Old","bloodGroup":"A+ve","email":"old@x.org","contact":"1","city":"Pune"},{"name":"NoId","bloodGroup":"O+","email":"noid@x.org"}]"#,
            )
            .unwrap();
        let donors = DonorDirectory::new(&store);
        assert!(donors.list().unwrap().is_empty());

        donors
            .upsert(registration("new@x.org", BloodGroup::OPos, "Pune"))
            .unwrap();

        let raw = stored(&store);
        assert_eq!(raw.len(), 3);
        assert_eq!(raw[0]["id"], "d1");
        assert_eq!(raw[0]["bloodGroup"], "A+ve");
        assert_eq!(raw[1]["email"], "noid@x.org");
        assert!(raw[1].get("id").is_none());
        assert_eq!(raw[2]["email"], "new@x.org");
    }

    #[test]
    fn test_upsert_repairs_unreadable_record_with_same_email() {
        let store = MemoryStore::new();
        store
            .set_item(
                "bd_donors",
                r#"[{"name":"NoId","bloodGroup":"?","email":"Asha@x.org","since":2019}]"#,
            )
            .unwrap();
        let donors = DonorDirectory::new(&store);

        let donor = donors
            .upsert(registration("asha@x.org", BloodGroup::BNeg, "Pune"))
            .unwrap();

        assert!(!donor.id.is_empty());
        assert_eq!(donor.extra.get("since"), Some(&Value::from(2019)));
        assert_eq!(donors.list().unwrap(), vec![donor]);
    }

    #[test]
    fn test_upsert_leaves_other_records_as_stored() {
        let store = MemoryStore::new();
        store
            .set_item(
                "bd_donors",
                r#"[{"id":"d1","name":"Old","bloodGroup":"ab+","email":"old@x.org","contact":"1","city":"pune "}]"#,
            )
            .unwrap();
        let donors = DonorDirectory::new(&store);
        assert_eq!(donors.list().unwrap()[0].blood_group, BloodGroup::AbPos);

        donors
            .upsert(registration("new@x.org", BloodGroup::AbPos, "Pune"))
            .unwrap();

        let raw = stored(&store);
        assert_eq!(raw[0]["bloodGroup"], "ab+");
        assert_eq!(raw[0]["city"], "pune ");
        assert_eq!(raw[1]["bloodGroup"], "AB+");
        assert_eq!(donors.find_by_group_and_city("AB+", "pune").unwrap().len(), 2);
    }

    #[test]
    fn test_upsert_trims_input() {
        let store = MemoryStore::new();
        let donor = DonorDirectory::new(&store)
            .upsert(DonorRegistration {
                name: "  Ravi ".to_string(),
                blood_group: BloodGroup::OPos,
                email: " ravi@x.org ".to_string(),
                contact: " 42 ".to_string(),
                city: " Pune ".to_string(),
            })
            .unwrap();

        assert_eq!(donor.name, "Ravi");
        assert_eq!(donor.email, "ravi@x.org");
        assert_eq!(donor.contact, "42");
        assert_eq!(donor.city, "Pune");
    }

    #[test]
    fn test_find_by_group_and_city_ignores_case_and_space() {
        let store = MemoryStore::new();
        let donors = DonorDirectory::new(&store);
        donors
            .upsert(registration("a@x.org", BloodGroup::AbNeg, "New Delhi"))
            .unwrap();
        donors
            .upsert(registration("b@x.org", BloodGroup::AbNeg, "Pune"))
            .unwrap();
        donors
            .upsert(registration("c@x.org", BloodGroup::APos, "new delhi"))
            .unwrap();

        let found = donors.find_by_group_and_city(" ab- ", "NEW DELHI  ").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].email, "a@x.org");
    }

    #[test]
    fn test_find_with_no_match_is_empty() {
        let store = MemoryStore::new();
        let donors = DonorDirectory::new(&store);
        donors
            .upsert(registration("a@x.org", BloodGroup::APos, "Pune"))
            .unwrap();

        assert!(donors.find_by_group_and_city("O-", "Pune").unwrap().is_empty());
        assert!(donors.find_by_group_and_city("", "").unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_store_reads_empty_and_recovers() {
        let store = MemoryStore::new();
        store.set_item("bd_donors", "garbage").unwrap();
        let donors = DonorDirectory::new(&store);

        assert!(donors.list().unwrap().is_empty());
        donors
            .upsert(registration("a@x.org", BloodGroup::APos, "Pune"))
            .unwrap();
        assert_eq!(donors.list().unwrap().len(), 1);
    }

    #[test]
    fn test_stored_layout_uses_camel_case() {
        let store = MemoryStore::new();
        DonorDirectory::new(&store)
            .upsert(registration("a@x.org", BloodGroup::OPos, "Pune"))
            .unwrap();

        let raw = store.get_item("bd_donors").unwrap().unwrap();
        assert!(raw.contains("\"bloodGroup\":\"O+\""));
    }
}
