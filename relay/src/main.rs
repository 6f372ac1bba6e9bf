use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use choice_relay::config::{load_keypair, RelayArgs, RelayConfig};
use choice_relay::rpc::RpcSettlement;
use choice_relay::server::{serve, AppState};
use choice_relay::Settlement;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = RelayArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&args.log))
        .init();

    let config = RelayConfig::from_args(&args).context("invalid relay configuration")?;
    let signing_key = load_keypair(&args.keypair)?;
    let settlement = Arc::new(RpcSettlement::new(args.rpc_url.clone(), signing_key));

    tracing::info!(
        listen = %args.listen,
        relayer = %settlement.relayer(),
        chain_id = config.network_id,
        target = %config.target,
        ledger = %config.ledger_session,
        ceiling = config.ceiling,
        choices = config.approved_choices.len(),
        "starting relay"
    );

    let listener = tokio::net::TcpListener::bind(args.listen)
        .await
        .with_context(|| format!("cannot bind {}", args.listen))?;
    serve(listener, AppState::new(config, settlement), async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutting down");
    })
    .await?;
    Ok(())
}
