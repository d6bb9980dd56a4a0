use clap::{Args, Parser, Subcommand, ValueEnum};

use tmrpc_core::rpc::endpoint::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SCHEME};
use tmrpc_core::rpc::DEFAULT_HEIGHT;
use tmrpc_core::BroadcastMode;

/// tmrpc — query and submit transactions to a Tendermint node over JSON-RPC.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// URL scheme of the node's RPC endpoint.
    #[arg(long, default_value = DEFAULT_SCHEME, env = "TMRPC_SCHEME")]
    pub scheme: String,

    /// Node host name or IP address.
    #[arg(long, default_value = DEFAULT_HOST, env = "TMRPC_HOST")]
    pub host: String,

    /// Node RPC port.
    #[arg(long, default_value_t = DEFAULT_PORT, env = "TMRPC_PORT")]
    pub port: u16,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 3, env = "TMRPC_TIMEOUT_SECS")]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Node status.
    Status,
    /// Network information (peers, listeners).
    NetInfo,
    /// Genesis document.
    Genesis,
    /// Unconfirmed transactions in the mempool.
    UnconfirmedTxs,
    /// Count of unconfirmed transactions.
    NumUnconfirmedTxs,
    /// Validator set at a height.
    Validators {
        #[arg(long, default_value_t = DEFAULT_HEIGHT, allow_negative_numbers = true)]
        height: i64,
    },
    /// Block at a height; 0 or less selects the latest block.
    Block {
        #[arg(long, default_value_t = DEFAULT_HEIGHT, allow_negative_numbers = true)]
        height: i64,
    },
    /// ABCI application info.
    AppInfo,
    /// Query the ABCI application.
    AppQuery {
        /// Query path understood by the application.
        #[arg(long)]
        path: String,

        #[arg(long, default_value_t = DEFAULT_HEIGHT, allow_negative_numbers = true)]
        height: i64,

        /// Ask the node for a Merkle proof.
        #[arg(long)]
        proof: bool,

        #[command(flatten)]
        data: PayloadArg,
    },
    /// Submit a transaction.
    Broadcast {
        #[arg(long, value_enum, default_value_t = Mode::Sync)]
        mode: Mode,

        #[command(flatten)]
        tx: PayloadArg,
    },
    /// Check that the node answers `status` with its identity.
    Probe,
}

/// Positional data argument shared by `app-query` and `broadcast`.
#[derive(Args)]
pub struct PayloadArg {
    /// Treat the value as hex-encoded bytes instead of text.
    #[arg(long)]
    pub hex: bool,

    pub value: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Mode {
    Commit,
    Sync,
    Async,
}

impl From<Mode> for BroadcastMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Commit => BroadcastMode::Commit,
            Mode::Sync => BroadcastMode::Sync,
            Mode::Async => BroadcastMode::Async,
        }
    }
}
