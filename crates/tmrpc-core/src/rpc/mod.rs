//! Tendermint JSON-RPC client layer.
//!
//! Defines the [`Transport`] trait and provides an HTTP implementation
//! ([`HttpTransport`]), the request encoder and result normalizer
//! (`protocol`), and the per-method facade ([`RpcClient`]) plus a test mock
//! (`mock::MockTransport`).

mod client;
pub mod endpoint;
mod http_adapter;
#[cfg(test)]
pub mod mock;
pub mod protocol;
pub mod types;

pub use client::{ClientConfig, RpcClient, DEFAULT_HEIGHT};
pub use endpoint::Endpoint;
pub use http_adapter::{HttpTransport, DEFAULT_TIMEOUT, USER_AGENT};
pub use protocol::{normalize, JsonRpcRequest, RequestEncoder};
pub use types::{BroadcastMode, Outcome, Payload};

use async_trait::async_trait;

use crate::error::CoreError;

/// Delivers one encoded JSON-RPC envelope to a node and returns the decoded
/// response object, untouched.
///
/// Implementations own the connection session. They must not interpret the
/// `result`/`error` fields; that is [`normalize`]'s job.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &JsonRpcRequest) -> Result<serde_json::Value, CoreError>;
}
