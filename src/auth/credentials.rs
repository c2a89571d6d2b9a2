//! Login credentials type.

use std::fmt;

/// Login credentials for the remote API.
///
/// Holds the account login and password passed to the login call when a
/// connection is constructed.
///
/// # Security
///
/// The password is never exposed in `Debug` output to prevent accidental
/// logging.
///
/// # Example
///
/// ```
/// use sape::Credentials;
///
/// let credentials = Credentials::new("alice", "secret");
/// assert_eq!(credentials.login(), "alice");
/// ```
#[derive(Clone)]
pub struct Credentials {
    login: String,
    password: String,
}

impl Credentials {
    /// Create new credentials.
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }

    /// Returns the account login.
    pub fn login(&self) -> &str {
        &self.login
    }

    /// Returns the password.
    ///
    /// Only the login call reads this; nothing else in the crate touches
    /// or logs it.
    pub(crate) fn password(&self) -> &str {
        &self.password
    }
}

// Intentionally hide the password in Debug output
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
