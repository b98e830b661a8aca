//! SnippetBox server.
//!
//! ```text
//!   Client ──▶ axum fallback ──▶ Dispatcher ──▶ PatternTable
//!                                    │              │
//!                                    │      Matched / Redirect / NotFound
//!                                    ▼
//!                            Handler(ResponseContext, Request, AppContext)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use snippetbox::config::{self, AppConfig, ConfigError};
use snippetbox::lifecycle::{self, Shutdown};
use snippetbox::observability::logging;

#[derive(Parser)]
#[command(name = "snippetbox")]
#[command(about = "SnippetBox HTTP server", long_about = None)]
struct Cli {
    /// HTTP network address, host:port or :port [default: :4000]
    #[arg(long)]
    addr: Option<String>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(addr) = cli.addr {
        config.listener.bind_address = addr;
    }
    config::validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init(&config.observability.log_level);
    tracing::info!("snippetbox v{} starting", env!("CARGO_PKG_VERSION"));

    let bind_address = config.listener.socket_address();
    let server = lifecycle::assemble(config)?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Starting server");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        lifecycle::signals::wait_for_termination().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
