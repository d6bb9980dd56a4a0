use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;
use tracing::{debug, trace};

use crate::error::{CoreError, RpcError};

use super::endpoint::Endpoint;
use super::protocol::JsonRpcRequest;
use super::Transport;

/// Client identifier sent with every request.
pub const USER_AGENT: &str = "tmrpc/0.2";

/// Per-request deadline covering connect, send and body read.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

// ==============================================================================
// HttpTransport — JSON-RPC over HTTP POST to a single Tendermint endpoint
// ==============================================================================

/// Keeps one pooled `reqwest` session for the lifetime of the client; the
/// pool is released when the transport is dropped.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Endpoint,
    url: String,
}

impl HttpTransport {
    pub fn new(endpoint: Endpoint, timeout: Duration) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .tcp_nodelay(true)
            .build()
            .map_err(RpcError::Transport)?;

        Ok(Self {
            client,
            url: endpoint.url(),
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &JsonRpcRequest) -> Result<serde_json::Value, CoreError> {
        let response = self
            .client
            .post(&self.url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(RpcError::Transport)?;
        // Tendermint reports JSON-RPC errors with non-2xx statuses, so the
        // status is logged but the body is always decoded.
        let status = response.status();

        let body = response.text().await.map_err(RpcError::Transport)?;
        debug!(
            rpc.id = %request.id,
            rpc.method = %request.method,
            %status,
            body_len = body.len(),
            "rpc response"
        );
        trace!(rpc.id = %request.id, rpc.method = %request.method, body = %body, "rpc response body");

        let decoded = serde_json::from_str(&body)
            .map_err(|e| RpcError::InvalidBody(format!("{e}; status={status}; body={body}")))?;
        Ok(decoded)
    }
}
