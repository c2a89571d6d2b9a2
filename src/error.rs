//! Error types for the sape library.
//!
//! This module provides a unified error type with explicit variants for
//! transport, protocol, remote-fault, and property lookup failures.

use std::fmt;

use reqwest::header::HeaderMap;
use thiserror::Error;

/// The unified error type for sape operations.
///
/// This error type covers all possible failure modes in the library,
/// with explicit variants to allow callers to handle specific cases.
/// The library performs no recovery of its own: every error is raised
/// immediately, or re-raised after the transport tears down its HTTP
/// client.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout, malformed response).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Protocol errors (an HTTP status other than 200).
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A fault reported by the remote side in a successful HTTP exchange.
    #[error("remote fault: {0}")]
    Fault(#[from] Fault),

    /// A structurally valid response whose shape does not match the call.
    #[error("unexpected response to {method}: expected {expected}")]
    UnexpectedResponse {
        /// The remote method that was called.
        method: &'static str,
        /// What the call contract expected to find.
        expected: &'static str,
    },

    /// A property mapping lookup for a name the mapping does not contain.
    #[error(r#"no property named "{name}""#)]
    MissingProperty {
        /// The requested property name.
        name: String,
    },

    /// A property exists in the mapping but has the wrong type.
    #[error(r#"property "{name}" is not {expected}"#)]
    PropertyType {
        /// The requested property name.
        name: String,
        /// The type the accessor expected.
        expected: &'static str,
    },

    /// An operation the API surface declares without a known remote
    /// method behind it.
    #[error("not implemented: {operation}")]
    NotImplemented {
        /// The declared-but-unwired operation.
        operation: &'static str,
    },

    /// Input validation errors (endpoint URL, status values).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

/// Transport-level errors.
///
/// Any of these tears down the HTTP client before it propagates, so the
/// next exchange starts on a fresh connection. None of them is retried.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection {
        /// Description from the HTTP stack.
        message: String,
    },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http {
        /// Description from the HTTP stack.
        message: String,
    },

    /// The response body could not be deserialized as XML-RPC.
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] ParseError),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Transport(TransportError::MalformedResponse(err))
    }
}

/// Protocol-level error for a response with a status other than 200.
///
/// The response body has already been drained and discarded by the time
/// this error is constructed; what remains is the status line and the
/// headers.
#[derive(Debug)]
pub struct ProtocolError {
    /// The endpoint the request was sent to (host and handler in one URL).
    pub endpoint: String,
    /// HTTP status code.
    pub status: u16,
    /// Canonical reason phrase for the status (empty for unknown codes).
    pub reason: String,
    /// The response headers.
    pub headers: HeaderMap,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if !self.reason.is_empty() {
            write!(f, " {}", self.reason)?;
        }
        write!(f, " at {}", self.endpoint)
    }
}

impl std::error::Error for ProtocolError {}

/// A fault reported by the remote XML-RPC layer.
///
/// Faults arrive in a clean 200 exchange; they describe an application
/// error on the remote side, not a transport problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("fault {code}: {message}")]
pub struct Fault {
    /// The remote fault code.
    pub code: i32,
    /// The remote fault description.
    pub message: String,
}

/// Errors from deserializing an XML-RPC response body.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The body is not well-formed XML.
    #[error("XML syntax error: {0}")]
    Xml(#[from] xml::reader::Error),

    /// A different element or event than the response grammar allows.
    #[error("unexpected {found}, expected {expected}")]
    Unexpected {
        /// What the grammar allows at this point.
        expected: String,
        /// What the document contained instead.
        found: String,
    },

    /// Values nested more deeply than the parser follows.
    #[error("value nesting deeper than {limit} levels")]
    NestingTooDeep {
        /// The nesting level at which parsing stopped.
        limit: usize,
    },

    /// A `<value>` wrapping an unrecognized type element.
    #[error("unknown value type <{0}>")]
    UnknownType(String),

    /// A scalar whose text does not parse as its declared type.
    #[error("invalid {kind} value {value:?}")]
    InvalidScalar {
        /// The declared scalar type.
        kind: &'static str,
        /// The offending text.
        value: String,
    },

    /// A `<fault>` whose struct lacks `faultCode` or `faultString`.
    #[error("malformed fault response")]
    MalformedFault,
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid endpoint URL.
    #[error("invalid endpoint URL '{value}': {reason}")]
    Endpoint {
        /// The rejected URL.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Unknown site status value.
    #[error("unknown site status '{value}'")]
    SiteStatus {
        /// The rejected status string.
        value: String,
    },
}
