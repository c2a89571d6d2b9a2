//! XML-RPC wire protocol: the value model, the codec, and the session
//! transport.
//!
//! The remote API speaks XML-RPC over HTTP with cookie-based session
//! affinity, and this module implements exactly that surface. The codec
//! covers the standard value types plus the `<i8>` and `<nil/>`
//! extensions the API relies on.

mod client;
mod request;
mod response;
mod transport;
mod value;

pub use client::XmlRpcClient;
pub use transport::CookieTransport;
pub use value::Value;
