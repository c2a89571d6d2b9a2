//! The XML-RPC value model.

use std::collections::BTreeMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::NaiveDateTime;

/// The timestamp format of `<dateTime.iso8601>` scalars, e.g.
/// `20130717T14:08:55`.
pub(crate) const DATETIME_FORMAT: &str = "%Y%m%dT%H:%M:%S";

/// One XML-RPC value.
///
/// Covers the scalar types of the XML-RPC specification plus structs,
/// arrays, and the widely deployed `<i8>` (64-bit integer) and `<nil/>`
/// extensions. The remote API sends nils for absent call options, so the
/// extensions are part of the wire contract here, not an add-on.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `<int>` or `<i4>`: a 32-bit integer.
    Int(i32),
    /// `<i8>`: a 64-bit integer (extension).
    Int64(i64),
    /// `<boolean>`: encoded as `1` or `0`.
    Bool(bool),
    /// `<string>`, or a `<value>` holding bare character data.
    String(String),
    /// `<double>`.
    Double(f64),
    /// `<dateTime.iso8601>`.
    DateTime(NaiveDateTime),
    /// `<base64>`: raw bytes.
    Base64(Vec<u8>),
    /// `<struct>`: named members.
    Struct(BTreeMap<String, Value>),
    /// `<array>`: a sequence of values.
    Array(Vec<Value>),
    /// `<nil/>` (extension).
    Nil,
}

impl Value {
    /// Returns the integer if this is an `Int`.
    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }

    /// Returns the integer if this is an `Int` or `Int64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int(i) => Some(i64::from(i)),
            Value::Int64(i) => Some(i),
            _ => None,
        }
    }

    /// Returns the boolean if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the string if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number if this is a `Double`, `Int`, or `Int64`.
    ///
    /// The remote side reports money amounts as doubles but rounds some
    /// of them to integers; accepting all three keeps numeric accessors
    /// total over what actually arrives.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Double(d) => Some(d),
            Value::Int(i) => Some(f64::from(i)),
            Value::Int64(i) => Some(i as f64),
            _ => None,
        }
    }

    /// Returns the timestamp if this is a `DateTime`.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match *self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Returns the raw bytes if this is a `Base64`.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Base64(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Returns the members if this is a `Struct`.
    pub fn as_struct(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Struct(members) => Some(members),
            _ => None,
        }
    }

    /// Returns the elements if this is an `Array`.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns true if this is `Nil`.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Serialize this value as a `<value>` element.
    pub(crate) fn write_xml(&self, out: &mut String) {
        out.push_str("<value>");
        match self {
            Value::Int(i) => {
                out.push_str("<int>");
                out.push_str(&i.to_string());
                out.push_str("</int>");
            }
            Value::Int64(i) => {
                out.push_str("<i8>");
                out.push_str(&i.to_string());
                out.push_str("</i8>");
            }
            Value::Bool(b) => {
                out.push_str("<boolean>");
                out.push_str(if *b { "1" } else { "0" });
                out.push_str("</boolean>");
            }
            Value::String(s) => {
                out.push_str("<string>");
                escape_into(out, s);
                out.push_str("</string>");
            }
            Value::Double(d) => {
                out.push_str("<double>");
                out.push_str(&d.to_string());
                out.push_str("</double>");
            }
            Value::DateTime(dt) => {
                out.push_str("<dateTime.iso8601>");
                out.push_str(&dt.format(DATETIME_FORMAT).to_string());
                out.push_str("</dateTime.iso8601>");
            }
            Value::Base64(bytes) => {
                out.push_str("<base64>");
                out.push_str(&BASE64.encode(bytes));
                out.push_str("</base64>");
            }
            Value::Struct(members) => {
                out.push_str("<struct>");
                for (name, value) in members {
                    out.push_str("<member><name>");
                    escape_into(out, name);
                    out.push_str("</name>");
                    value.write_xml(out);
                    out.push_str("</member>");
                }
                out.push_str("</struct>");
            }
            Value::Array(items) => {
                out.push_str("<array><data>");
                for item in items {
                    item.write_xml(out);
                }
                out.push_str("</data></array>");
            }
            Value::Nil => out.push_str("<nil/>"),
        }
        out.push_str("</value>");
    }
}

/// Append `s` to `out`, escaping the XML text metacharacters.
pub(crate) fn escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(v: BTreeMap<String, Value>) -> Self {
        Value::Struct(v)
    }
}
