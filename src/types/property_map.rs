//! Property mappings returned by the remote side.

use std::collections::BTreeMap;

use crate::error::Error;
use crate::xmlrpc::Value;

/// A property mapping fetched from the remote side.
///
/// The remote API describes its entities as open-ended structs of
/// properties rather than fixed records. Handles expose typed accessors
/// for the fields this crate knows about; everything else stays reachable
/// by name through [`get`]. Looking up a name the mapping does not
/// contain is an error that cites the name, so a typo fails loudly
/// instead of silently reading nothing.
///
/// [`get`]: PropertyMap::get
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use sape::{PropertyMap, Value};
///
/// let mut fields = BTreeMap::new();
/// fields.insert("login".to_string(), Value::from("alice"));
/// let properties = PropertyMap::new(fields);
///
/// assert_eq!(properties.get_str("login").unwrap(), "alice");
/// assert!(properties.get("missing").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyMap(BTreeMap<String, Value>);

impl PropertyMap {
    /// Create a property mapping from raw struct members.
    pub fn new(properties: BTreeMap<String, Value>) -> Self {
        Self(properties)
    }

    /// Look up a property by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingProperty`] naming `name` when the mapping
    /// does not contain it.
    pub fn get(&self, name: &str) -> Result<&Value, Error> {
        self.0.get(name).ok_or_else(|| Error::MissingProperty {
            name: name.to_string(),
        })
    }

    /// Look up a property by name, returning `None` when absent.
    pub fn get_opt(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Look up a string property.
    pub fn get_str(&self, name: &str) -> Result<&str, Error> {
        self.get(name)?.as_str().ok_or_else(|| Error::PropertyType {
            name: name.to_string(),
            expected: "a string",
        })
    }

    /// Look up an integer property (either integer width).
    pub fn get_i64(&self, name: &str) -> Result<i64, Error> {
        self.get(name)?.as_i64().ok_or_else(|| Error::PropertyType {
            name: name.to_string(),
            expected: "an integer",
        })
    }

    /// Look up a numeric property (double or either integer width).
    pub fn get_f64(&self, name: &str) -> Result<f64, Error> {
        self.get(name)?.as_f64().ok_or_else(|| Error::PropertyType {
            name: name.to_string(),
            expected: "a number",
        })
    }

    /// Returns true if the mapping contains `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Number of properties in the mapping.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the mapping has no properties.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the properties in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl From<BTreeMap<String, Value>> for PropertyMap {
    fn from(properties: BTreeMap<String, Value>) -> Self {
        Self::new(properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PropertyMap {
        let mut fields = BTreeMap::new();
        fields.insert("login".to_string(), Value::from("alice"));
        fields.insert("id".to_string(), Value::Int(42));
        fields.insert("big_id".to_string(), Value::Int64(5_000_000_000));
        fields.insert("balance".to_string(), Value::Double(100.5));
        PropertyMap::new(fields)
    }

    #[test]
    fn get_returns_the_stored_value() {
        let properties = sample();
        assert_eq!(properties.get("login").unwrap(), &Value::from("alice"));
        assert!(properties.contains("login"));
        assert_eq!(properties.get_opt("nope"), None);
    }

    #[test]
    fn missing_property_error_cites_the_name() {
        let err = sample().get("missing").unwrap_err();
        assert!(matches!(err, Error::MissingProperty { ref name } if name == "missing"));
        assert!(err.to_string().contains("\"missing\""));
    }

    #[test]
    fn typed_accessors_check_the_value_type() {
        let properties = sample();
        assert_eq!(properties.get_str("login").unwrap(), "alice");
        let err = properties.get_str("id").unwrap_err();
        assert!(matches!(err, Error::PropertyType { ref name, .. } if name == "id"));
    }

    #[test]
    fn integer_accessor_takes_both_widths() {
        let properties = sample();
        assert_eq!(properties.get_i64("id").unwrap(), 42);
        assert_eq!(properties.get_i64("big_id").unwrap(), 5_000_000_000);
    }

    #[test]
    fn numeric_accessor_takes_doubles_and_integers() {
        let properties = sample();
        assert_eq!(properties.get_f64("balance").unwrap(), 100.5);
        assert_eq!(properties.get_f64("id").unwrap(), 42.0);
    }

    #[test]
    fn iterates_in_name_order() {
        let properties = sample();
        let names: Vec<&str> = properties.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["balance", "big_id", "id", "login"]);
    }
}
