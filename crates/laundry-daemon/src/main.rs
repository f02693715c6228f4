//! Laundry Daemon - back office service
//!
//! The laundry daemon provides:
//! - REST API for notes (abonos, payment, delivery) and shop orders
//! - Server-sent event stream mirroring every accepted write
//! - Dashboard stats pushed after each mutation

use clap::Parser;
use laundry_daemon::error::{DaemonError, DaemonResult};
use laundry_daemon::{DaemonConfig, Server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Laundry Daemon CLI
#[derive(Parser)]
#[command(name = "laundryd")]
#[command(about = "Laundry Daemon - notes, abonos and live order updates", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "LAUNDRY_CONFIG")]
    config: Option<String>,

    /// Listen address, overrides the config file
    #[arg(short, long, env = "LAUNDRY_LISTEN_ADDR")]
    listen: Option<String>,

    /// Log level, overrides the config file
    #[arg(long, env = "LAUNDRY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "LAUNDRY_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> DaemonResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = DaemonConfig::load(cli.config.as_deref())
        .map_err(|e| DaemonError::Config(e.to_string()))?;

    // Override with CLI args
    if let Some(listen) = &cli.listen {
        config.server.listen_addr = listen
            .parse()
            .map_err(|e| DaemonError::Config(format!("Invalid listen address: {}", e)))?;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    config.logging.json |= cli.json;

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        listen = %config.server.listen_addr,
        auth = config.auth.enabled(),
        "Starting laundry daemon"
    );

    // Create and run server
    let server = Server::new(config)?;
    server.run().await
}
