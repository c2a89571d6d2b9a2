//! Authentication primitives.

mod credentials;

pub use credentials::Credentials;
