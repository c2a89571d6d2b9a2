//! The session-persisting transport.

use std::fmt;
use std::sync::RwLock;

use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, COOKIE, HeaderValue, SET_COOKIE};
use tracing::{debug, instrument, trace};

use crate::error::{Error, ProtocolError};
use crate::types::ApiUrl;

/// A request/response transport that layers cookie-based session affinity
/// over plain HTTP exchanges.
///
/// The transport POSTs pre-serialized request bodies to one fixed
/// endpoint. The first 200 response carrying a `Set-Cookie` header
/// establishes the session cookie; from then on every request replays the
/// stored value verbatim as its `Cookie` header, and a newer `Set-Cookie`
/// replaces it. The cookie is never cleared implicitly, only overwritten.
///
/// A wire-level failure tears down the HTTP client, and with it any
/// pooled connection, before the error propagates; the next exchange runs
/// on a fresh client. The stored cookie survives the teardown.
///
/// Overlapping exchanges through one transport are not coordinated
/// beyond the internal cookie cell: they race on the wire and the last
/// response wins the cookie. That matches the one-session-per-value model
/// of the remote side.
pub struct CookieTransport {
    endpoint: ApiUrl,
    http: RwLock<reqwest::Client>,
    cookie: RwLock<Option<HeaderValue>>,
}

impl CookieTransport {
    /// Create a transport for the given endpoint, with no session cookie
    /// yet.
    pub fn new(endpoint: ApiUrl) -> Self {
        Self {
            endpoint,
            http: RwLock::new(build_http_client()),
            cookie: RwLock::new(None),
        }
    }

    /// Returns the endpoint this transport exchanges against.
    pub fn endpoint(&self) -> &ApiUrl {
        &self.endpoint
    }

    /// Returns the stored session cookie, if one has been established.
    pub fn session_cookie(&self) -> Option<String> {
        let cookie = self.cookie.read().unwrap();
        cookie
            .as_ref()
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    }

    /// Perform one exchange: POST the request body, enforce the status
    /// gate, and persist the session cookie.
    ///
    /// # Errors
    ///
    /// A wire-level failure resets the HTTP client and surfaces as
    /// [`Error::Transport`]. Any status other than 200 surfaces as
    /// [`Error::Protocol`] carrying the endpoint, status, canonical
    /// reason, and response headers; its body is drained and discarded.
    /// Redirects are not followed, so they land here too.
    #[instrument(skip(self, body), fields(endpoint = %self.endpoint))]
    pub async fn exchange(&self, body: String) -> Result<Vec<u8>, Error> {
        // Clone out of the cells so no lock is held across an await.
        let http = self.http.read().unwrap().clone();
        let cookie = self.cookie.read().unwrap().clone();

        trace!(
            request_bytes = body.len(),
            has_cookie = cookie.is_some(),
            "Sending request"
        );

        let mut request = http
            .post(self.endpoint.as_url().clone())
            .header(CONTENT_TYPE, "text/xml")
            .body(body);
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                self.reset();
                return Err(err.into());
            }
        };

        let status = response.status();
        debug!(status = status.as_u16(), "Response received");

        if status != StatusCode::OK {
            let error = ProtocolError {
                endpoint: self.endpoint.as_str().to_string(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                headers: response.headers().clone(),
            };
            // Drain whatever body came with the error status so the
            // connection is not left half-read.
            let _ = response.bytes().await;
            return Err(Error::Protocol(error));
        }

        if let Some(set_cookie) = response.headers().get(SET_COOKIE) {
            trace!("Session cookie updated");
            *self.cookie.write().unwrap() = Some(set_cookie.clone());
        }

        match response.bytes().await {
            Ok(bytes) => Ok(bytes.to_vec()),
            Err(err) => {
                self.reset();
                Err(err.into())
            }
        }
    }

    /// Discard the HTTP client, closing any pooled connection; the next
    /// exchange builds a fresh one. The stored cookie is not touched.
    pub(crate) fn reset(&self) {
        debug!("Resetting HTTP client");
        *self.http.write().unwrap() = build_http_client();
    }
}

fn build_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!("sape/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("failed to build HTTP client")
}

// Intentionally hide the session cookie in Debug output
impl fmt::Debug for CookieTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieTransport")
            .field("endpoint", &self.endpoint)
            .field("cookie", &"[REDACTED]")
            .finish()
    }
}
