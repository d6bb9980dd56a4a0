//! Value types shared by the encoder, the normalizer and the method facade.

use base64::{engine::general_purpose, Engine as _};
use serde_json::Value;

use crate::error::CoreError;

// ==============================================================================
// Outcome
// ==============================================================================

/// Normalized result of one RPC call.
///
/// `Failure` carries the node's `error` object as-is; it is a regular value,
/// not an error, so callers can inspect codes and messages.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Value),
    Failure(Value),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn payload(&self) -> &Value {
        match self {
            Outcome::Success(value) | Outcome::Failure(value) => value,
        }
    }

    pub fn into_payload(self) -> Value {
        match self {
            Outcome::Success(value) | Outcome::Failure(value) => value,
        }
    }

    pub fn into_result(self) -> Result<Value, Value> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(err) => Err(err),
        }
    }

    /// Replace a success payload with its `field` member. Failures pass
    /// through untouched.
    pub(crate) fn unwrap_field(self, method: &str, field: &str) -> Result<Self, CoreError> {
        match self {
            Outcome::Success(Value::Object(mut fields)) => fields
                .remove(field)
                .map(Outcome::Success)
                .ok_or_else(|| {
                    CoreError::MalformedResponse(format!(
                        "`{method}` result has no `{field}` field"
                    ))
                }),
            Outcome::Success(other) => Err(CoreError::MalformedResponse(format!(
                "`{method}` result is not an object: {other}"
            ))),
            failure @ Outcome::Failure(_) => Ok(failure),
        }
    }
}

// ==============================================================================
// Payload
// ==============================================================================

/// Transaction or query data as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Bytes(Vec<u8>),
}

impl Payload {
    /// Parse a hex string (optionally `0x`-prefixed) into raw bytes.
    pub fn from_hex(input: &str) -> Result<Self, CoreError> {
        let trimmed = input.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        hex::decode(digits)
            .map(Payload::Bytes)
            .map_err(|e| CoreError::InvalidArgument(format!("invalid hex payload `{input}`: {e}")))
    }

    /// Wire form for `broadcast_tx_*`.
    ///
    /// Tendermint's JSON endpoint expects byte transactions as the base64 of
    /// their lowercase hex text, not base64 of the raw bytes. Text is sent
    /// verbatim.
    pub fn tx_param(&self) -> String {
        match self {
            Payload::Text(text) => text.clone(),
            Payload::Bytes(bytes) => general_purpose::STANDARD.encode(hex::encode(bytes)),
        }
    }

    /// Wire form for `abci_query` data: lowercase hex without `0x`.
    pub fn query_hex(&self) -> String {
        match self {
            Payload::Text(text) => hex::encode(text.as_bytes()),
            Payload::Bytes(bytes) => hex::encode(bytes),
        }
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_owned())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Payload::Bytes(bytes)
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Payload::Bytes(bytes.to_vec())
    }
}

/// Untyped input (scripts, JSON documents): a string is text, an array of
/// byte-sized integers is bytes. Everything else is rejected before any
/// request is built.
impl TryFrom<Value> for Payload {
    type Error = CoreError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(text) => Ok(Payload::Text(text)),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_u64()
                        .and_then(|n| u8::try_from(n).ok())
                        .ok_or_else(|| {
                            CoreError::InvalidArgument(format!(
                                "payload byte array holds non-byte element {item}"
                            ))
                        })
                })
                .collect::<Result<Vec<u8>, _>>()
                .map(Payload::Bytes),
            other => Err(CoreError::InvalidArgument(format!(
                "payload must be a string or a byte array, got {other}"
            ))),
        }
    }
}

// ==============================================================================
// Broadcast Mode
// ==============================================================================

/// How long the node holds the reply to a transaction submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastMode {
    /// Wait until the transaction is committed in a block.
    Commit,
    /// Wait for the mempool `CheckTx` result.
    Sync,
    /// Return immediately.
    Async,
}

impl BroadcastMode {
    pub fn method(self) -> &'static str {
        match self {
            BroadcastMode::Commit => "broadcast_tx_commit",
            BroadcastMode::Sync => "broadcast_tx_sync",
            BroadcastMode::Async => "broadcast_tx_async",
        }
    }
}
