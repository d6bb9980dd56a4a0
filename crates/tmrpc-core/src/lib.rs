pub mod error;
pub mod rpc;

pub use error::{CoreError, RpcError};
pub use rpc::{BroadcastMode, ClientConfig, Endpoint, Outcome, Payload, RpcClient};
