//! Site handles and the site status vocabulary.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};
use crate::types::PropertyMap;
use crate::xmlrpc::Value;

use super::Sape;
use super::page::Page;

/// Indexing status of a site, as reported in site descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteStatus {
    /// `NEW`.
    New,
    /// `IND`.
    Ind,
    /// `OK`.
    Ok,
    /// `IND_NOW`.
    IndNow,
    /// The empty status some descriptors carry.
    Unset,
}

impl SiteStatus {
    /// The wire spelling of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            SiteStatus::New => "NEW",
            SiteStatus::Ind => "IND",
            SiteStatus::Ok => "OK",
            SiteStatus::IndNow => "IND_NOW",
            SiteStatus::Unset => "",
        }
    }
}

impl fmt::Display for SiteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SiteStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(SiteStatus::New),
            "IND" => Ok(SiteStatus::Ind),
            "OK" => Ok(SiteStatus::Ok),
            "IND_NOW" => Ok(SiteStatus::IndNow),
            "" => Ok(SiteStatus::Unset),
            other => Err(InvalidInputError::SiteStatus {
                value: other.to_string(),
            }
            .into()),
        }
    }
}

/// One site of the account, wrapped from a `sape.get_sites` descriptor.
///
/// Shares the uniform handle shape: a connection reference plus the
/// property mapping supplied at construction. No remote call happens at
/// construction time.
#[derive(Debug)]
pub struct Site<'a> {
    // Retained for the collection accessors once they are wired up.
    #[allow(dead_code)]
    api: &'a Sape,
    properties: PropertyMap,
}

impl<'a> Site<'a> {
    /// Wrap a site descriptor. Descriptors normally come from
    /// [`User::get_sites`](super::User::get_sites).
    pub fn new(api: &'a Sape, properties: PropertyMap) -> Self {
        Self { api, properties }
    }

    /// The remote-assigned site identifier.
    pub fn id(&self) -> Result<i64, Error> {
        self.properties.get_i64("id")
    }

    /// The site URL.
    pub fn url(&self) -> Result<&str, Error> {
        self.properties.get_str("url")
    }

    /// The site's indexing status.
    pub fn status(&self) -> Result<SiteStatus, Error> {
        self.properties.get_str("status")?.parse()
    }

    /// Look up any descriptor field by name.
    pub fn property(&self, name: &str) -> Result<&Value, Error> {
        self.properties.get(name)
    }

    /// The full descriptor.
    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    /// Push changed site parameters to the remote side.
    ///
    /// Declared by the API surface but not wired to a remote method; the
    /// method name is not part of the documented surface this crate
    /// tracks, so this always returns [`Error::NotImplemented`] without
    /// touching the network.
    pub async fn update(&self) -> Result<(), Error> {
        Err(Error::NotImplemented {
            operation: "Site::update",
        })
    }

    /// The site's regions.
    ///
    /// Always returns [`Error::NotImplemented`]; see [`Site::update`].
    pub async fn regions(&self) -> Result<Value, Error> {
        Err(Error::NotImplemented {
            operation: "Site::regions",
        })
    }

    /// The site's pages.
    ///
    /// Always returns [`Error::NotImplemented`]; see [`Site::update`].
    pub async fn pages(&self) -> Result<Vec<Page<'a>>, Error> {
        Err(Error::NotImplemented {
            operation: "Site::pages",
        })
    }

    /// The site's links.
    ///
    /// Always returns [`Error::NotImplemented`]; see [`Site::update`].
    pub async fn links(&self) -> Result<Value, Error> {
        Err(Error::NotImplemented {
            operation: "Site::links",
        })
    }
}
