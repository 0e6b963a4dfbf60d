use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use dl_relay::config::Cli;
use dl_relay::log::EventLog;
use dl_relay::registry::ClientRegistry;
use dl_relay::server::{self, Shared};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cli.log_level.clone())),
        )
        .init();

    let event_log = EventLog::open(&cli.log_file)?;
    event_log.append("SERVER_START", &format!("bind={}", cli.bind));

    let shared = Arc::new(Shared {
        registry: ClientRegistry::new(),
        max_send_queue: cli.max_send_queue,
        event_log,
    });

    info!(bind = %cli.bind, max_send_queue = cli.max_send_queue, "starting relay");
    server::run(&cli.bind, shared).await?;
    Ok(())
}
