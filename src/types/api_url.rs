//! Endpoint URL type.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::{Error, InvalidInputError};

/// A validated API endpoint URL.
///
/// The endpoint is the complete POST target for every remote call, host
/// and handler path in one value. The production endpoint uses plain
/// http, so both http and https are accepted.
///
/// # Example
///
/// ```
/// use sape::ApiUrl;
///
/// let endpoint = ApiUrl::new("http://api.sape.ru/xmlrpc/").unwrap();
/// assert_eq!(endpoint.host(), Some("api.sape.ru"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ApiUrl(Url);

impl ApiUrl {
    /// The production endpoint.
    pub const DEFAULT: &'static str = "http://api.sape.ru/xmlrpc/";

    /// Create a new endpoint URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is relative, has no host, or uses a
    /// scheme other than http or https.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref();
        let url = Url::parse(s).map_err(|e| InvalidInputError::Endpoint {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        Self::validate(&url, s)?;
        Ok(Self(url))
    }

    /// Returns the endpoint as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the underlying parsed URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// Returns the host portion of the endpoint.
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        let reject = |reason: &str| {
            Err(InvalidInputError::Endpoint {
                value: original.to_string(),
                reason: reason.to_string(),
            }
            .into())
        };

        if url.cannot_be_a_base() {
            return reject("must be an absolute URL");
        }
        if url.scheme() != "http" && url.scheme() != "https" {
            return reject("must use http or https");
        }
        if url.host_str().is_none() {
            return reject("must have a host");
        }

        Ok(())
    }
}

impl Default for ApiUrl {
    /// The production endpoint, [`ApiUrl::DEFAULT`].
    fn default() -> Self {
        Self::new(Self::DEFAULT).expect("default endpoint is valid")
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ApiUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
