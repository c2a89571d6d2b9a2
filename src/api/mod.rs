//! The API surface: the authenticated connection and the handles it
//! hands out.

mod methods;
mod page;
mod site;
mod user;

pub use page::Page;
pub use site::{Site, SiteStatus};
pub use user::{Balance, User};

use tracing::{debug, info, instrument};

use crate::auth::Credentials;
use crate::error::Error;
use crate::types::{ApiUrl, PropertyMap};
use crate::xmlrpc::{Value, XmlRpcClient};

use methods::{GET_USER, LOGIN};

/// An authenticated connection to the SAPE API.
///
/// Constructing a connection performs the one login call of the session;
/// the session cookie the server hands back rides along on every later
/// call through the same value. Handles ([`User`], [`Site`], [`Page`])
/// borrow the connection they came from, so the connection must outlive
/// them; the borrow checker enforces what the remote API only documents.
///
/// `Sape` is deliberately not `Clone`: one value means one
/// session-cookie state. Share it behind an `Arc` when several tasks
/// need it, keeping in mind that overlapping calls are not coordinated
/// and the last response to arrive wins any cookie replacement.
///
/// # Example
///
/// ```no_run
/// use sape::{Credentials, Sape};
///
/// # async fn example() -> Result<(), sape::Error> {
/// let sape = Sape::login(Credentials::new("login", "password")).await?;
/// println!("account id: {}", sape.user_id());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Sape {
    client: XmlRpcClient,
    user_id: i64,
}

impl Sape {
    /// Authenticate against the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the login call fails or does not return the
    /// account identifier.
    pub async fn login(credentials: Credentials) -> Result<Self, Error> {
        Self::login_with_endpoint(ApiUrl::default(), credentials).await
    }

    /// Authenticate against a specific endpoint.
    ///
    /// Issues exactly one `sape.login` call with the login, the
    /// password, and a trailing false flag; the integer it returns
    /// becomes [`user_id`].
    ///
    /// [`user_id`]: Sape::user_id
    #[instrument(
        skip(endpoint, credentials),
        fields(endpoint = %endpoint, login = %credentials.login())
    )]
    pub async fn login_with_endpoint(
        endpoint: ApiUrl,
        credentials: Credentials,
    ) -> Result<Self, Error> {
        info!("Creating SAPE session");

        let client = XmlRpcClient::new(endpoint);
        let result = client
            .call(
                LOGIN,
                &[
                    credentials.login().into(),
                    credentials.password().into(),
                    false.into(),
                ],
            )
            .await?;

        let user_id = result.as_i64().ok_or(Error::UnexpectedResponse {
            method: LOGIN,
            expected: "an integer account identifier",
        })?;

        debug!(user_id, "Session established");

        Ok(Self { client, user_id })
    }

    /// The account identifier returned by the login call.
    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    /// The endpoint this connection calls.
    pub fn endpoint(&self) -> &ApiUrl {
        self.client.endpoint()
    }

    /// The session cookie the transport currently holds, once the server
    /// has set one.
    pub fn session_cookie(&self) -> Option<String> {
        self.client.session_cookie()
    }

    /// Fetch the account handle for the authenticated user.
    ///
    /// Issues one `sape.get_user` call and wraps the returned property
    /// mapping. Nothing is prefetched at login: account data is loaded
    /// when this is called, and each call fetches afresh, so callers
    /// normally retain the returned handle.
    #[instrument(skip(self), fields(user_id = self.user_id))]
    pub async fn user(&self) -> Result<User<'_>, Error> {
        debug!("Fetching account properties");

        let result = self.call(GET_USER, &[]).await?;
        let Value::Struct(properties) = result else {
            return Err(Error::UnexpectedResponse {
                method: GET_USER,
                expected: "a struct of account properties",
            });
        };

        Ok(User::new(self, self.user_id, PropertyMap::new(properties)))
    }

    /// Call a raw API method.
    ///
    /// The escape hatch for the parts of the remote surface the typed
    /// handles do not wrap; `method` is the full remote name with its
    /// `sape.` prefix. The call shares this connection's session cookie.
    pub async fn call(&self, method: &str, params: &[Value]) -> Result<Value, Error> {
        self.client.call(method, params).await
    }
}
