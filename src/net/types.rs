//! Wire-level types for the request gateway.
//!
//! DESIGN
//! ======
//! The gateway only sees method, absolute URL, header list and an optional
//! text body going out, and status plus text body coming back. Transports
//! convert to and from their own HTTP types at the edge.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// ERROR
// =============================================================================

/// Failure outcome of a gateway request.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GatewayError {
    /// No response was obtained at all.
    #[error("network unreachable: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The request body could not be serialized.
    #[error("request encode failed: {0}")]
    Encode(String),

    /// A success response body could not be decoded.
    #[error("response decode failed: {0}")]
    Decode(String),
}

impl GatewayError {
    /// HTTP status for server-reported failures.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// A transport could not complete the exchange.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

// =============================================================================
// USER RECORD
// =============================================================================

/// Server-issued user record, kept as the exact JSON object received.
///
/// Only `id`, `email` and `is_admin` are interpreted; every other field is
/// carried through untouched when persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRecord(Map<String, Value>);

impl UserRecord {
    /// Wrap a JSON value; anything but an object is rejected.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    /// Parse serialized text; malformed input or a non-object yields `None`.
    #[must_use]
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    /// # Errors
    ///
    /// Returns an error if the record cannot be serialized.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }

    #[must_use]
    pub fn id(&self) -> Option<&Value> {
        self.0.get("id")
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.0.get("email").and_then(Value::as_str)
    }

    /// True only when `is_admin` is literally `true`.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self.0.get("is_admin"), Some(Value::Bool(true)))
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for UserRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

// =============================================================================
// REQUEST
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied request settings, merged over the gateway defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl RequestOptions {
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self { method, ..Self::default() }
    }

    #[must_use]
    pub fn get() -> Self {
        Self::new(Method::Get)
    }

    #[must_use]
    pub fn post() -> Self {
        Self::new(Method::Post)
    }

    #[must_use]
    pub fn put() -> Self {
        Self::new(Method::Put)
    }

    #[must_use]
    pub fn patch() -> Self {
        Self::new(Method::Patch)
    }

    #[must_use]
    pub fn delete() -> Self {
        Self::new(Method::Delete)
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON request body.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Encode`] if `value` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self, GatewayError> {
        let body = serde_json::to_string(value).map_err(|e| GatewayError::Encode(e.to_string()))?;
        Ok(self.body(body))
    }
}

/// Fully resolved request handed to a transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl OutboundRequest {
    /// Header value by case-insensitive name.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

// =============================================================================
// RESPONSE
// =============================================================================

/// Status and raw text body as received from the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }
}

/// Successful request outcome.
///
/// `NoContent` (HTTP 204) is distinct from `Json(Value::Null)`, so callers can
/// tell "deleted successfully" from "found nothing".
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
    NoContent,
    Json(Value),
}

impl ResponseBody {
    #[must_use]
    pub fn is_no_content(&self) -> bool {
        matches!(self, Self::NoContent)
    }

    #[must_use]
    pub fn into_json(self) -> Option<Value> {
        match self {
            Self::NoContent => None,
            Self::Json(value) => Some(value),
        }
    }
}
