use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;

use crate::error::CoreError;

use super::types::Outcome;

pub const JSONRPC_VERSION: &str = "2.0";

/// One JSON-RPC 2.0 request body. Field order matches the wire layout
/// `{"jsonrpc","method","params","id"}`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub method: String,
    pub params: Vec<Value>,
    pub id: String,
}

/// Builds request envelopes, stamping each with the next id from a
/// per-instance counter. Ids start at `"0"` and are never reused.
#[derive(Debug, Default)]
pub struct RequestEncoder {
    next_id: AtomicU64,
}

impl RequestEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encode(&self, method: &str, params: Option<Vec<Value>>) -> JsonRpcRequest {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION,
            method: method.to_owned(),
            params: params.unwrap_or_default(),
            id: id.to_string(),
        }
    }
}

/// Turn a decoded response object into an [`Outcome`].
///
/// A non-null `error` wins over `result`. A response carrying neither is a
/// protocol violation and surfaces as [`CoreError::MalformedResponse`].
pub fn normalize(raw: Value) -> Result<Outcome, CoreError> {
    let mut fields = match raw {
        Value::Object(fields) => fields,
        other => {
            return Err(CoreError::MalformedResponse(format!(
                "expected a JSON object, got {other}"
            )));
        }
    };

    match fields.remove("error") {
        None | Some(Value::Null) => {}
        Some(err) => return Ok(Outcome::Failure(err)),
    }

    fields.remove("result").map(Outcome::Success).ok_or_else(|| {
        CoreError::MalformedResponse("response has neither `result` nor `error`".to_owned())
    })
}
