use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{CoreError, RpcError};

use super::protocol::JsonRpcRequest;
use super::Transport;

/// What the mock answers to the next request.
#[derive(Debug, Clone)]
pub enum Reply {
    Json(Value),
    /// Simulates a connection that never yields a decodable body.
    Unreachable,
}

/// A mock transport for testing. Records every envelope it is handed and
/// replays canned replies in order; once the queue is drained it answers
/// `{"result": {}}`.
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    sent: Mutex<Vec<JsonRpcRequest>>,
}

impl MockTransport {
    pub fn builder() -> MockTransportBuilder {
        MockTransportBuilder {
            replies: VecDeque::new(),
        }
    }

    /// Envelopes sent so far, in dispatch order.
    pub fn sent(&self) -> Vec<JsonRpcRequest> {
        self.sent.lock().expect("mock lock poisoned").clone()
    }

    pub fn last_sent(&self) -> JsonRpcRequest {
        self.sent()
            .pop()
            .expect("at least one request must have been sent")
    }
}

pub struct MockTransportBuilder {
    replies: VecDeque<Reply>,
}

impl MockTransportBuilder {
    pub fn with_result(self, result: Value) -> Self {
        self.with_response(json!({"jsonrpc": "2.0", "id": "", "result": result}))
    }

    pub fn with_error(self, error: Value) -> Self {
        self.with_response(json!({"jsonrpc": "2.0", "id": "", "error": error}))
    }

    pub fn with_response(mut self, raw: Value) -> Self {
        self.replies.push_back(Reply::Json(raw));
        self
    }

    pub fn with_unreachable(mut self) -> Self {
        self.replies.push_back(Reply::Unreachable);
        self
    }

    pub fn build(self) -> MockTransport {
        MockTransport {
            replies: Mutex::new(self.replies),
            sent: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &JsonRpcRequest) -> Result<Value, CoreError> {
        self.sent
            .lock()
            .expect("mock lock poisoned")
            .push(request.clone());
        let reply = self.replies.lock().expect("mock lock poisoned").pop_front();
        match reply {
            Some(Reply::Json(raw)) => Ok(raw),
            Some(Reply::Unreachable) => {
                Err(RpcError::InvalidBody("mock endpoint unreachable".to_owned()).into())
            }
            None => Ok(json!({"result": {}})),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::protocol::RequestEncoder;

    #[tokio::test]
    async fn replays_replies_in_order_then_defaults() {
        let mock = MockTransport::builder()
            .with_result(json!({"n": 1}))
            .with_error(json!({"code": -1}))
            .build();
        let encoder = RequestEncoder::new();

        let first = mock.send(&encoder.encode("a", None)).await.unwrap();
        let second = mock.send(&encoder.encode("b", None)).await.unwrap();
        let third = mock.send(&encoder.encode("c", None)).await.unwrap();

        assert_eq!(first["result"], json!({"n": 1}));
        assert_eq!(second["error"], json!({"code": -1}));
        assert_eq!(third, json!({"result": {}}));

        let methods: Vec<String> = mock.sent().into_iter().map(|r| r.method).collect();
        assert_eq!(methods, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn unreachable_reply_is_transport_error() {
        let mock = MockTransport::builder().with_unreachable().build();
        let err = mock
            .send(&RequestEncoder::new().encode("status", None))
            .await
            .expect_err("must fail");
        assert!(err.is_transport());
    }
}
