//! Page controllers.
//!
//! Each page is its own struct built from only the collection views it
//! needs, so a page that never touches accounts cannot reach them. The
//! controllers do the input checks the core leaves to callers (required
//! fields, trimming, blood group parsing) and return typed outcomes for the
//! front end to render.

mod admin;
mod auth;
mod organize;
mod register;
mod request;
mod search;

pub use admin::AdminPage;
pub use auth::{AuthPage, SignupForm};
pub use organize::{OrganizeForm, OrganizePage};
pub use register::{RegisterForm, RegisterPage};
pub use request::{BloodRequestForm, RequestPage};
pub use search::{SearchPage, SearchResults};

use crate::error::{Error, Result};

/// Fail with [`Error::MissingFields`] naming every blank field.
fn require_fields(fields: &[(&'static str, &str)]) -> Result<()> {
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::missing_fields(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_fields_lists_blanks() {
        let err = require_fields(&[("name", "Asha"), ("email", "  "), ("city", "")]).unwrap_err();
        match err {
            Error::MissingFields { fields } => assert_eq!(fields, vec!["email", "city"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_require_fields_ok() {
        assert!(require_fields(&[("name", "Asha")]).is_ok());
        assert!(require_fields(&[]).is_ok());
    }
}
