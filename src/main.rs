//! Mirror redirector.
//!
//! Answers every request with a `302 Found` pointing at a mirror that has
//! the requested path.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────────┐
//!                        │                 MIRROR REDIRECT                   │
//!                        │                                                   │
//!   Client Request       │  ┌──────────┐   ┌─────────────┐   ┌───────────┐  │
//!   ─────────────────────┼─▶│   http   │──▶│   mirrors   │──▶│   race    │──┼──▶ HEAD probes
//!                        │  │  server  │   │ list fetch  │   │ dispatch  │  │    (one per mirror)
//!                        │  └──────────┘   └─────────────┘   └─────┬─────┘  │
//!                        │                                         │        │
//!   302 / 404            │  ┌──────────┐                    ┌──────▼─────┐  │
//!   ◀────────────────────┼──│ response │◀───────────────────│ collector  │  │
//!                        │  └──────────┘                    │ + deadline │  │
//!                        │                                  └────────────┘  │
//!                        │  ┌────────────────────────────────────────────┐  │
//!                        │  │ config · observability · lifecycle          │  │
//!                        │  └────────────────────────────────────────────┘  │
//!                        └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use mirror_redirect::config::load_config;
use mirror_redirect::http::HttpServer;
use mirror_redirect::lifecycle::{signals, Shutdown};
use mirror_redirect::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "mirror-redirect")]
#[command(about = "Redirect requests to the first mirror that has the file", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Configuration errors are fatal before anything is served.
    let config = load_config(&cli.config)?;

    logging::init(&config.observability);

    tracing::info!("mirror-redirect v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        path = %cli.config.display(),
        bind_address = %config.listener.bind_address,
        mirror_list = %config.mirrors.list_url,
        race_timeout_secs = config.race.timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?);
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    let server = HttpServer::new(config)?;
    let server_shutdown = shutdown.subscribe();

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signals::forward_signals(&signal_shutdown).await;
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
