//! The XML-RPC call client.

use tracing::{debug, instrument, trace};

use crate::error::Error;
use crate::types::ApiUrl;

use super::request::write_method_call;
use super::response::parse_method_response;
use super::transport::CookieTransport;
use super::value::Value;

/// An XML-RPC client for one endpoint, with session affinity.
///
/// Composes the codec with a [`CookieTransport`]: a call serializes its
/// parameters, runs one exchange, and deserializes the result. A remote
/// fault comes back as [`Error::Fault`] and leaves the transport alone;
/// a body that fails to deserialize resets the transport, since the
/// exchange can no longer be trusted, and comes back as a transport
/// error.
#[derive(Debug)]
pub struct XmlRpcClient {
    transport: CookieTransport,
}

impl XmlRpcClient {
    /// Create a client for the given endpoint.
    pub fn new(endpoint: ApiUrl) -> Self {
        Self {
            transport: CookieTransport::new(endpoint),
        }
    }

    /// Returns the endpoint this client calls.
    pub fn endpoint(&self) -> &ApiUrl {
        self.transport.endpoint()
    }

    /// Returns the session cookie the transport currently holds.
    pub fn session_cookie(&self) -> Option<String> {
        self.transport.session_cookie()
    }

    /// Call one remote method with positional parameters.
    ///
    /// # Errors
    ///
    /// Every [`Error`] variant except the property lookup failures can
    /// come out of a call; see the crate-level documentation for the
    /// taxonomy.
    #[instrument(skip(self, params), fields(endpoint = %self.transport.endpoint()))]
    pub async fn call(&self, method: &str, params: &[Value]) -> Result<Value, Error> {
        debug!(method, params = params.len(), "XML-RPC call");
        trace!(?params, "Call parameters");

        let body = write_method_call(method, params);
        let bytes = self.transport.exchange(body).await?;

        match parse_method_response(&bytes) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(fault)) => {
                debug!(code = fault.code, "Remote fault");
                Err(Error::Fault(fault))
            }
            Err(parse) => {
                // An undecodable body leaves the exchange in an unknown
                // state; tear the client down like any wire failure.
                self.transport.reset();
                Err(parse.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let client = XmlRpcClient::new(ApiUrl::default());
        assert_eq!(client.endpoint().as_str(), ApiUrl::DEFAULT);
        assert!(client.session_cookie().is_none());
    }
}
