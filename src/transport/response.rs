//! Response normalization.
//!
//! [`normalize`] checks a response status against the set an operation
//! accepts and yields either the parsed body or a [`RemoteError`]
//! carrying the status and the body the management API sent back.

use bytes::Bytes;
use http::StatusCode;
use serde_json::Value;

use super::RawResponse;
use crate::error::{EdgeError, RemoteError};

/// Parse a response body leniently: empty is `Null`, non-JSON text is kept
/// as a JSON string.
#[must_use]
pub fn parse_body(body: &Bytes) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

pub fn normalize(response: &RawResponse, accepted: &[StatusCode]) -> Result<Value, EdgeError> {
    let result = parse_body(&response.body);
    if accepted.contains(&response.status) {
        Ok(result)
    } else {
        Err(RemoteError {
            status: response.status,
            result,
        }
        .into())
    }
}
