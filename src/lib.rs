//! sape - Client bindings for the SAPE.ru XML-RPC API.
//!
//! SAPE exposes its link-exchange platform over XML-RPC with
//! cookie-based session affinity: the first response of a session
//! carries a `Set-Cookie` header, and every later call must replay it.
//! This crate wraps that surface with a session-persisting transport and
//! thin typed handles over the remote entities. All authenticated
//! operations flow through a [`Sape`] connection.
//!
//! # Example
//!
//! ```no_run
//! use sape::{Credentials, Sape};
//!
//! # async fn example() -> Result<(), sape::Error> {
//! let sape = Sape::login(Credentials::new("login", "password")).await?;
//!
//! let user = sape.user().await?;
//! let balance = user.balance().await?;
//! println!("balance: {} nominal, {} real", balance.nominal, balance.real);
//!
//! for site in user.get_sites().await? {
//!     println!("{}: {} [{}]", site.id()?, site.url()?, site.status()?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! Failures are split along the taxonomy in [`Error`]: wire-level
//! trouble is [`Error::Transport`] and tears down the HTTP client, a
//! status other than 200 is [`Error::Protocol`], and an application
//! error reported by the remote side is [`Error::Fault`] and leaves the
//! session alone. Nothing is retried.

pub mod api;
pub mod auth;
pub mod error;
pub mod types;
pub mod xmlrpc;

// Re-export primary types at crate root for convenience
pub use api::{Balance, Page, Sape, Site, SiteStatus, User};
pub use auth::Credentials;
pub use error::Error;
pub use types::{ApiUrl, PropertyMap};
pub use xmlrpc::Value;

/// Result type alias using the crate's [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
