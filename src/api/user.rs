//! The account handle.

use tracing::{debug, instrument};

use crate::error::Error;
use crate::types::PropertyMap;
use crate::xmlrpc::Value;

use super::Sape;
use super::methods::{GET_BALANCE, GET_BALANCE_LOCKS, GET_BALANCE_REAL, GET_BILLS, GET_SITES};
use super::site::Site;

/// The two balances of an account, fetched together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Balance {
    /// Nominal balance, from `sape.get_balance`.
    pub nominal: f64,
    /// Real balance, from `sape.get_balance_real`.
    pub real: f64,
}

/// The authenticated account, as returned by [`Sape::user`].
///
/// Holds the numeric identifier from login and the property mapping
/// fetched by `sape.get_user`. The handle borrows the connection it came
/// from; its remote operations go through that connection and share its
/// session cookie.
#[derive(Debug)]
pub struct User<'a> {
    api: &'a Sape,
    id: i64,
    properties: PropertyMap,
}

impl<'a> User<'a> {
    pub(crate) fn new(api: &'a Sape, id: i64, properties: PropertyMap) -> Self {
        Self {
            api,
            id,
            properties,
        }
    }

    /// The account identifier returned by the login call.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The account login, from the property mapping.
    pub fn login(&self) -> Result<&str, Error> {
        self.properties.get_str("login")
    }

    /// The account email, from the property mapping.
    pub fn email(&self) -> Result<&str, Error> {
        self.properties.get_str("email")
    }

    /// Look up any account property by name.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::MissingProperty`] naming `name` when the
    /// mapping does not contain it.
    pub fn property(&self, name: &str) -> Result<&Value, Error> {
        self.properties.get(name)
    }

    /// The full property mapping fetched at construction.
    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    /// Fetch both account balances.
    ///
    /// Issues `sape.get_balance` then `sape.get_balance_real` and
    /// returns the pair.
    #[instrument(skip(self), fields(user_id = self.id))]
    pub async fn balance(&self) -> Result<Balance, Error> {
        debug!("Fetching balances");

        let nominal = self.api.call(GET_BALANCE, &[]).await?;
        let real = self.api.call(GET_BALANCE_REAL, &[]).await?;

        Ok(Balance {
            nominal: nominal.as_f64().ok_or(Error::UnexpectedResponse {
                method: GET_BALANCE,
                expected: "a numeric balance",
            })?,
            real: real.as_f64().ok_or(Error::UnexpectedResponse {
                method: GET_BALANCE_REAL,
                expected: "a numeric balance",
            })?,
        })
    }

    /// Fetch the balance locks, raw.
    #[instrument(skip(self), fields(user_id = self.id))]
    pub async fn balance_locks(&self) -> Result<Value, Error> {
        debug!("Fetching balance locks");
        self.api.call(GET_BALANCE_LOCKS, &[]).await
    }

    /// Fetch bills for a period, raw.
    ///
    /// The remote call always takes four positional parameters; absent
    /// options are sent as the API's explicit sentinels, `<nil/>` for
    /// `month` and `day` and boolean false for `user_id`.
    #[instrument(skip(self, user_id), fields(user_id = self.id))]
    pub async fn get_bills(
        &self,
        year: i32,
        month: Option<i32>,
        day: Option<i32>,
        user_id: Option<i32>,
    ) -> Result<Value, Error> {
        debug!("Fetching bills");

        let params = [
            Value::Int(year),
            month.map_or(Value::Nil, Value::Int),
            day.map_or(Value::Nil, Value::Int),
            user_id.map_or(Value::Bool(false), Value::Int),
        ];
        self.api.call(GET_BILLS, &params).await
    }

    /// Fetch the account's sites, one handle per descriptor.
    #[instrument(skip(self), fields(user_id = self.id))]
    pub async fn get_sites(&self) -> Result<Vec<Site<'a>>, Error> {
        debug!("Fetching sites");

        let result = self.api.call(GET_SITES, &[]).await?;
        let Value::Array(descriptors) = result else {
            return Err(Error::UnexpectedResponse {
                method: GET_SITES,
                expected: "an array of site descriptors",
            });
        };

        descriptors
            .into_iter()
            .map(|descriptor| {
                let Value::Struct(properties) = descriptor else {
                    return Err(Error::UnexpectedResponse {
                        method: GET_SITES,
                        expected: "struct site descriptors",
                    });
                };
                Ok(Site::new(self.api, PropertyMap::new(properties)))
            })
            .collect()
    }
}
