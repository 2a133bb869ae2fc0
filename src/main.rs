use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use udplb::backend::{parse_backend_list, BackendSet};
use udplb::config::Args;
use udplb::socket::{bind_listener, resolve_addr};
use udplb::{Forwarder, ForwarderConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    info!("listen {} and forward to {}", args.local, args.forward);

    let addrs = parse_backend_list(&args.forward);
    let backends = BackendSet::connect(&addrs[..])
        .await
        .context("backend setup failed")?;

    let local = resolve_addr(&args.local)
        .await
        .context("invalid listen address")?;
    let socket = bind_listener(local, args.recv_buffer).context("listen failed")?;

    let handle = Forwarder::new(ForwarderConfig::default(), backends)
        .spawn(socket)
        .context("failed to start forwarder")?;

    let shutdown = handle.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, stopping.");
            shutdown.cancel();
        }
    });

    handle.wait().await;
    Ok(())
}
