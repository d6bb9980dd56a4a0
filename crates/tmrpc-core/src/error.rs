#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("RPC communication failure: {0}")]
    Rpc(#[from] RpcError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("malformed JSON-RPC response: {0}")]
    MalformedResponse(String),
}

/// Failures below the JSON-RPC layer: the request never produced a
/// decodable response object.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("response body is not JSON: {0}")]
    InvalidBody(String),
}

impl CoreError {
    /// True for connection-level failures (network, timeout, non-JSON body).
    pub fn is_transport(&self) -> bool {
        matches!(self, CoreError::Rpc(_))
    }

    /// True when the request hit the per-request deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, CoreError::Rpc(RpcError::Transport(e)) if e.is_timeout())
    }
}
