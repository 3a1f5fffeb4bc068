//! Login, signup and profile.

use crate::account::{Accounts, User};
use crate::error::Result;
use crate::storage::KeyValueStore;

use super::require_fields;

/// Raw signup form input. The password is taken verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    /// Display name.
    pub username: String,
    /// Login email.
    pub email: String,
    /// Password.
    pub password: String,
}

/// Account pages.
#[derive(Debug)]
pub struct AuthPage<'a, S: ?Sized> {
    accounts: Accounts<'a, S>,
}

impl<'a, S: KeyValueStore + ?Sized> AuthPage<'a, S> {
    /// Build the page over the account view.
    pub fn new(accounts: Accounts<'a, S>) -> Self {
        Self { accounts }
    }

    /// Sign up and log in.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingFields`](crate::Error::MissingFields),
    /// [`Error::DuplicateEmail`](crate::Error::DuplicateEmail), or a backend
    /// error.
    pub fn signup(&self, form: &SignupForm) -> Result<User> {
        require_fields(&[
            ("username", form.username.as_str()),
            ("email", form.email.as_str()),
            ("password", form.password.as_str()),
        ])?;
        self.accounts
            .signup(form.username.trim(), form.email.trim(), &form.password)
    }

    /// Log in.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCredentials`](crate::Error::InvalidCredentials)
    /// or a backend error.
    pub fn login(&self, email: &str, password: &str) -> Result<User> {
        self.accounts.login(email.trim(), password)
    }

    /// Log out.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn logout(&self) -> Result<()> {
        self.accounts.logout()
    }

    /// The logged-in user, for the profile panel.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn profile(&self) -> Result<Option<User>> {
        self.accounts.current_user()
    }

    /// Whether the admin link should be shown.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn shows_admin_link(&self) -> Result<bool> {
        self.accounts.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::storage::MemoryStore;

    fn signup_form() -> SignupForm {
        SignupForm {
            username: " ravi ".to_string(),
            email: " ravi@x.org ".to_string(),
            password: " pw ".to_string(),
        }
    }

    #[test]
    fn test_signup_trims_all_but_password() {
        let store = MemoryStore::new();
        let defaults: Vec<String> = Vec::new();
        let page = AuthPage::new(Accounts::new(&store, &defaults));

        let user = page.signup(&signup_form()).unwrap();
        assert_eq!(user.username, "ravi");
        assert_eq!(user.email, "ravi@x.org");
        assert_eq!(user.password, " pw ");
        assert_eq!(page.profile().unwrap(), Some(user));
    }

    #[test]
    fn test_signup_requires_fields() {
        let store = MemoryStore::new();
        let defaults: Vec<String> = Vec::new();
        let page = AuthPage::new(Accounts::new(&store, &defaults));
        let mut form = signup_form();
        form.password.clear();

        assert!(matches!(
            page.signup(&form),
            Err(Error::MissingFields { .. })
        ));
    }

    #[test]
    fn test_login_logout_cycle() {
        let store = MemoryStore::new();
        let defaults = vec!["ravi@x.org".to_string()];
        let page = AuthPage::new(Accounts::new(&store, &defaults));
        page.signup(&signup_form()).unwrap();
        assert!(page.shows_admin_link().unwrap());

        page.logout().unwrap();
        assert!(page.profile().unwrap().is_none());
        assert!(!page.shows_admin_link().unwrap());

        assert!(matches!(
            page.login("ravi@x.org", "pw"),
            Err(Error::InvalidCredentials)
        ));
        assert!(page.login("  RAVI@x.org", " pw ").is_ok());
    }
}
