use std::time::Duration;

use serde_json::{json, Value};
use tracing::debug;

use crate::error::CoreError;

use super::endpoint::Endpoint;
use super::http_adapter::{HttpTransport, DEFAULT_TIMEOUT};
use super::protocol::{normalize, RequestEncoder};
use super::types::{BroadcastMode, Outcome, Payload};
use super::Transport;

/// Height used by `validators`, `get_block` and `app_query` when the caller
/// has no preference.
pub const DEFAULT_HEIGHT: i64 = 1;

/// The node pages validators; the client always asks for the first page.
const VALIDATORS_PAGE: u32 = 1;
const VALIDATORS_PER_PAGE: u32 = 30;

/// Connection settings for [`RpcClient::with_config`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: Endpoint,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Tendermint JSON-RPC client.
///
/// Each method performs exactly one request/response round trip and returns
/// the node's answer as an [`Outcome`]. Request ids come from a counter owned
/// by this instance: `"0"`, `"1"`, ... in dispatch order.
pub struct RpcClient<T = HttpTransport> {
    transport: T,
    encoder: RequestEncoder,
}

impl RpcClient<HttpTransport> {
    /// Create a client for `endpoint` with the default 3 second timeout.
    pub fn new(endpoint: Endpoint) -> Result<Self, CoreError> {
        Self::with_config(ClientConfig {
            endpoint,
            ..ClientConfig::default()
        })
    }

    pub fn with_config(config: ClientConfig) -> Result<Self, CoreError> {
        let transport = HttpTransport::new(config.endpoint, config.timeout)?;
        Ok(Self::with_transport(transport))
    }

    pub fn endpoint(&self) -> &Endpoint {
        self.transport.endpoint()
    }
}

impl<T: Transport> RpcClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            encoder: RequestEncoder::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Encode, send and normalize a single call to `method`.
    pub async fn dispatch(&self, method: &str, params: Vec<Value>) -> Result<Outcome, CoreError> {
        let request = self.encoder.encode(method, Some(params));
        debug!(
            rpc.id = %request.id,
            rpc.method = method,
            rpc.params = request.params.len(),
            "rpc call"
        );
        let raw = self.transport.send(&request).await?;
        normalize(raw)
    }

    /// Connectivity probe: true only when `status` succeeds and reports a
    /// non-empty `node_info`. Never returns an error.
    pub async fn can_connect(&self) -> bool {
        match self.status().await {
            Ok(Outcome::Success(status)) => {
                let reachable = has_node_identity(&status);
                if !reachable {
                    debug!("status response carries no node_info");
                }
                reachable
            }
            Ok(Outcome::Failure(err)) => {
                debug!(error = %err, "status returned a JSON-RPC error");
                false
            }
            Err(err) => {
                debug!(error = %err, "connectivity probe failed");
                false
            }
        }
    }

    // ==========================================================================
    // Info API
    // ==========================================================================

    pub async fn status(&self) -> Result<Outcome, CoreError> {
        self.dispatch("status", Vec::new()).await
    }

    pub async fn net_info(&self) -> Result<Outcome, CoreError> {
        self.dispatch("net_info", Vec::new()).await
    }

    pub async fn genesis(&self) -> Result<Outcome, CoreError> {
        self.dispatch("genesis", Vec::new()).await
    }

    /// Unconfirmed transactions; the node caps the list (30 by default).
    pub async fn unconfirmed_txs(&self) -> Result<Outcome, CoreError> {
        self.dispatch("unconfirmed_txs", Vec::new()).await
    }

    pub async fn num_unconfirmed_txs(&self) -> Result<Outcome, CoreError> {
        self.dispatch("num_unconfirmed_txs", Vec::new()).await
    }

    /// Validator set at `height`, first page of 30. The node sorts by voting
    /// power descending, then address ascending.
    pub async fn validators(&self, height: i64) -> Result<Outcome, CoreError> {
        let params = vec![
            json!(height.to_string()),
            json!(VALIDATORS_PAGE.to_string()),
            json!(VALIDATORS_PER_PAGE.to_string()),
        ];
        self.dispatch("validators", params).await
    }

    /// Block at `height`; any height `<= 0` asks for the latest block.
    pub async fn get_block(&self, height: i64) -> Result<Outcome, CoreError> {
        let params = if height <= 0 {
            Vec::new()
        } else {
            vec![json!(height.to_string())]
        };
        self.dispatch("block", params).await
    }

    // ==========================================================================
    // ABCI API
    // ==========================================================================

    /// Application info, unwrapped from the `response` envelope on success.
    pub async fn app_info(&self) -> Result<Outcome, CoreError> {
        self.dispatch("abci_info", Vec::new())
            .await?
            .unwrap_field("abci_info", "response")
    }

    /// Query the application at `path`. `data` is sent as lowercase hex; a
    /// successful result is unwrapped from its `response` envelope.
    pub async fn app_query(
        &self,
        path: &str,
        data: &Payload,
        height: i64,
        proof: bool,
    ) -> Result<Outcome, CoreError> {
        let params = vec![
            json!(path),
            json!(data.query_hex()),
            json!(height.to_string()),
            json!(proof),
        ];
        self.dispatch("abci_query", params)
            .await?
            .unwrap_field("abci_query", "response")
    }

    // ==========================================================================
    // Transaction API
    // ==========================================================================

    pub async fn send_tx(&self, mode: BroadcastMode, tx: &Payload) -> Result<Outcome, CoreError> {
        self.dispatch(mode.method(), vec![json!(tx.tx_param())]).await
    }

    /// Submit and wait until the transaction is committed in a block.
    pub async fn send_tx_commit(&self, tx: &Payload) -> Result<Outcome, CoreError> {
        self.send_tx(BroadcastMode::Commit, tx).await
    }

    /// Submit and wait for the mempool check.
    pub async fn send_tx_sync(&self, tx: &Payload) -> Result<Outcome, CoreError> {
        self.send_tx(BroadcastMode::Sync, tx).await
    }

    /// Submit without waiting.
    pub async fn send_tx_async(&self, tx: &Payload) -> Result<Outcome, CoreError> {
        self.send_tx(BroadcastMode::Async, tx).await
    }
}

fn has_node_identity(status: &Value) -> bool {
    match status.get("node_info") {
        None | Some(Value::Null) => false,
        Some(Value::Object(fields)) => !fields.is_empty(),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Bool(_) | Value::Number(_)) => false,
    }
}
