use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;
use psort_server::config::ServiceConfig;

#[derive(Debug, Parser)]
#[command(about = "HTTP service that sorts batches of integer arrays")]
struct Args {
    /// YAML config file; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override `listen_addr` from the config.
    #[arg(long)]
    listen: Option<SocketAddr>,

    /// Send a sample request to `/process-single` once listening.
    #[arg(long)]
    self_test: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => {
            tracing::info!(config = %path.display(), "loading config");
            ServiceConfig::load(path).await?
        }
        None => ServiceConfig::default(),
    };
    if let Some(listen) = args.listen {
        cfg.listen_addr = listen;
    }
    cfg.self_test |= args.self_test;

    tracing::info!(
        listen_addr = %cfg.listen_addr,
        max_body_bytes = cfg.max_body_bytes,
        self_test = cfg.self_test,
        "starting"
    );

    psort_server::server::run(cfg).await
}
