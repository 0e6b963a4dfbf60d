//! Relay CLI (§6 ambient supplement, §10), mirroring `guard-service::Cli`'s
//! `#[derive(Parser)]` shape — adapted to a single-mode daemon, so there is
//! no `#[command(subcommand)]` the way `guard-service` has `Init`/`Run`.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Darklock Relay server", long_about = None)]
pub struct Cli {
    /// Address to bind the TCP listener on.
    #[arg(long, default_value = "0.0.0.0:7878")]
    pub bind: String,

    /// Log verbosity, passed through to `tracing_subscriber`'s env filter
    /// as a default when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Bound on each Connection's outbound Send Worker queue (§9 Bounded
    /// queues recommendation).
    #[arg(long, default_value_t = 1024)]
    pub max_send_queue: usize,

    /// Path to the append-only human-readable event log (§6).
    #[arg(long, default_value = "hingechat.log")]
    pub log_file: String,
}
