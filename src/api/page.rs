//! Page handles.

use crate::error::Error;
use crate::types::PropertyMap;
use crate::xmlrpc::Value;

use super::Sape;

/// One page of a site.
///
/// Shares the uniform handle shape: a connection reference plus the
/// page's property mapping. Pages are not yet reachable through a typed
/// listing ([`Site::pages`] is unwired), so descriptors come from a raw
/// [`Sape::call`].
///
/// [`Site::pages`]: super::Site::pages
#[derive(Debug)]
pub struct Page<'a> {
    // Retained for the page operations once they are wired up.
    #[allow(dead_code)]
    api: &'a Sape,
    properties: PropertyMap,
}

impl<'a> Page<'a> {
    /// Wrap a page descriptor.
    pub fn new(api: &'a Sape, properties: PropertyMap) -> Self {
        Self { api, properties }
    }

    /// The remote-assigned page identifier.
    pub fn id(&self) -> Result<i64, Error> {
        self.properties.get_i64("id")
    }

    /// Look up any descriptor field by name.
    pub fn property(&self, name: &str) -> Result<&Value, Error> {
        self.properties.get(name)
    }

    /// The full descriptor.
    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    /// Activate the page.
    ///
    /// Declared by the API surface but not wired to a remote method, so
    /// this always returns [`Error::NotImplemented`] without touching
    /// the network.
    pub async fn activate(&self) -> Result<(), Error> {
        Err(Error::NotImplemented {
            operation: "Page::activate",
        })
    }

    /// Exclude the page.
    ///
    /// Always returns [`Error::NotImplemented`]; see [`Page::activate`].
    pub async fn exclude(&self) -> Result<(), Error> {
        Err(Error::NotImplemented {
            operation: "Page::exclude",
        })
    }

    /// Purge the page.
    ///
    /// Always returns [`Error::NotImplemented`]; see [`Page::activate`].
    pub async fn purge(&self) -> Result<(), Error> {
        Err(Error::NotImplemented {
            operation: "Page::purge",
        })
    }
}
