//! Wire envelope encoding and decoding.
//!
//! One JSON envelope per message:
//! ```text
//! -> {"id": "<uuid>", "method": "select", "params": ["person"]}
//! <- {"id": "<uuid>", "result": [...]}
//! <- {"error": {"code": -32000, "message": "..."}}
//! ```
//!
//! An inbound frame is an error envelope iff it carries a non-null `error`
//! field; everything else must parse as a success envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ErrorContext, Result};
use crate::protocol::next_request_id;

/// Outbound request envelope.
///
/// Immutable once built: the id is minted at construction and never reused.
/// `params` is always serialized, as `[]` when empty, never as null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Correlation identifier, unique per request.
    pub id: String,
    /// Wire method name (e.g. "select", "signin").
    pub method: String,
    /// Positional parameters, in call order.
    #[serde(default)]
    pub params: Vec<Value>,
}

impl Request {
    /// Build a request with a fresh id.
    ///
    /// # Example
    ///
    /// ```
    /// use fathom_client::protocol::Request;
    ///
    /// let req = Request::new("select", vec![serde_json::json!("person")]);
    /// let wire = serde_json::to_value(&req).unwrap();
    /// assert_eq!(wire["method"], "select");
    /// assert_eq!(wire["params"][0], "person");
    /// ```
    pub fn new(method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            id: next_request_id(),
            method: method.into(),
            params,
        }
    }

    /// Build a request with no parameters.
    pub fn empty(method: impl Into<String>) -> Self {
        Self::new(method, Vec::new())
    }
}

/// Server-reported error payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireError {
    /// Machine-readable error code.
    pub code: i64,
    /// Human-readable message, passed through verbatim.
    pub message: String,
}

/// Inbound response envelope.
///
/// Error envelopes carry no request id; correlation relies on the strict
/// one-outstanding-request pairing of [`Client::call`](crate::Client::call).
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Successful reply: the request id echo and the result payload.
    Success {
        /// Echo of the originating request id.
        id: String,
        /// Result payload, any JSON value including null.
        result: Value,
    },
    /// Server-reported failure.
    Error(WireError),
}

#[derive(Deserialize)]
struct RawSuccess {
    id: String,
    result: Value,
}

impl Response {
    /// Parse one inbound frame.
    ///
    /// A frame with a non-null `error` field is an error envelope; anything
    /// else must carry `id` and `result` or the parse fails.
    pub fn from_value(mut frame: Value) -> Result<Self> {
        if let Some(err) = frame.get_mut("error") {
            if !err.is_null() {
                let err: WireError = serde_json::from_value(err.take())?;
                return Ok(Response::Error(err));
            }
        }
        let raw: RawSuccess = serde_json::from_value(frame)?;
        Ok(Response::Success {
            id: raw.id,
            result: raw.result,
        })
    }

    /// The request id this response echoes, if it is a success.
    pub fn id(&self) -> Option<&str> {
        match self {
            Response::Success { id, .. } => Some(id),
            Response::Error(_) => None,
        }
    }

    /// Unwrap into the result payload, classifying errors by call context.
    pub fn into_result(self, context: ErrorContext) -> Result<Value> {
        match self {
            Response::Success { result, .. } => Ok(result),
            Response::Error(err) => Err(context.classify(err.code, err.message)),
        }
    }
}
