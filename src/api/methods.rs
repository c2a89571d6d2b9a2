//! Remote method names.

/// `sape.login`
pub(crate) const LOGIN: &str = "sape.login";

/// `sape.get_user`
pub(crate) const GET_USER: &str = "sape.get_user";

/// `sape.get_balance`
pub(crate) const GET_BALANCE: &str = "sape.get_balance";

/// `sape.get_balance_real`
pub(crate) const GET_BALANCE_REAL: &str = "sape.get_balance_real";

/// `sape.get_balance_locks`
pub(crate) const GET_BALANCE_LOCKS: &str = "sape.get_balance_locks";

/// `sape.get_bills`
pub(crate) const GET_BILLS: &str = "sape.get_bills";

/// `sape.get_sites`
pub(crate) const GET_SITES: &str = "sape.get_sites";
