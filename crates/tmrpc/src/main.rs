mod cli;

use std::time::Duration;

use clap::Parser;
use eyre::{eyre, WrapErr};

use tmrpc_core::{ClientConfig, Endpoint, Outcome, Payload, RpcClient};

use cli::{Command, PayloadArg};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    // stdout carries the JSON output, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let endpoint =
        Endpoint::new(&args.scheme, &args.host, args.port).context("build node endpoint")?;
    let url = endpoint.url();
    let rpc = RpcClient::with_config(ClientConfig {
        endpoint,
        timeout: Duration::from_secs(args.timeout_secs),
    })
    .context("create RPC client")?;
    tracing::debug!(%url, "rpc client ready");

    let outcome = match args.command {
        Command::Probe => {
            let reachable = rpc.can_connect().await;
            println!("{reachable}");
            if !reachable {
                return Err(eyre!("node at `{url}` is not reachable"));
            }
            return Ok(());
        }
        Command::Status => rpc.status().await,
        Command::NetInfo => rpc.net_info().await,
        Command::Genesis => rpc.genesis().await,
        Command::UnconfirmedTxs => rpc.unconfirmed_txs().await,
        Command::NumUnconfirmedTxs => rpc.num_unconfirmed_txs().await,
        Command::Validators { height } => rpc.validators(height).await,
        Command::Block { height } => rpc.get_block(height).await,
        Command::AppInfo => rpc.app_info().await,
        Command::AppQuery {
            path,
            height,
            proof,
            data,
        } => {
            let data = payload_from_arg(data)?;
            rpc.app_query(&path, &data, height, proof).await
        }
        Command::Broadcast { mode, tx } => {
            let tx = payload_from_arg(tx)?;
            rpc.send_tx(mode.into(), &tx).await
        }
    };

    let outcome = outcome.map_err(|err| {
        let message = format_rpc_error(&url, &err.to_string(), err.is_timeout());
        eyre!(message).wrap_err("while calling the Tendermint RPC endpoint")
    })?;

    match outcome {
        Outcome::Success(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Outcome::Failure(error) => {
            println!("{}", serde_json::to_string_pretty(&error)?);
            Err(eyre!("node returned a JSON-RPC error"))
        }
    }
}

fn payload_from_arg(arg: PayloadArg) -> eyre::Result<Payload> {
    if arg.hex {
        Payload::from_hex(&arg.value).context("decode hex payload")
    } else {
        Ok(Payload::Text(arg.value))
    }
}

fn format_rpc_error(url: &str, source_error: &str, timed_out: bool) -> String {
    let mut lines = vec![
        format!("request to `{url}` failed"),
        format!("RPC error: {source_error}"),
    ];

    // reqwest renders timeouts as a generic send failure, so the kind is
    // passed in rather than read from the message.
    if timed_out {
        lines.push("hint: the node did not answer in time; raise --timeout-secs or check that it is not stalled".into());
    } else if source_error.contains("dns error") {
        lines.push(
            "hint: hostname resolution failed; verify --host and your DNS/network".into(),
        );
    } else if source_error.contains("Connection refused")
        || source_error.contains("error sending request for url")
    {
        lines.push(
            "hint: nothing answered; verify the node is running and --port matches its RPC laddr"
                .into(),
        );
    } else if source_error.contains("not JSON") {
        lines.push(
            "hint: the endpoint is not a Tendermint JSON-RPC server; check --scheme, --host and --port"
                .into(),
        );
    }

    lines.join("\n")
}
