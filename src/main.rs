//! Bookstore product page.
//!
//! Front-end of a four-service demo application used to exercise service mesh
//! traffic management.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────┐
//!                         │               PRODUCT PAGE               │
//!   Browser / API client  │  ┌────────┐   ┌──────────┐               │
//!   ──────────────────────┼─▶│  http  │──▶│aggregator│──┬──▶ details │
//!                         │  │ server │   │          │  │           │
//!                         │  └────────┘   └──────────┘  ├──▶ reviews ─┼──▶ ratings
//!                         │       │            │        │  (retry 1x) │
//!                         │       ▼            ▼        └──▶ ratings  │
//!                         │    views       metrics                    │
//!                         └──────────────────────────────────────────┘
//! ```

use std::error::Error;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use productpage::config::load_config;
use productpage::lifecycle::{signals, Shutdown};
use productpage::observability::logging;
use productpage::HttpServer;

#[derive(Parser)]
#[command(name = "productpage")]
#[command(about = "Bookstore product page front-end", long_about = None)]
struct Cli {
    /// Port to listen on
    port: u16,

    /// Optional TOML configuration file; environment variables override it
    #[arg(short, long, env = "PRODUCTPAGE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    logging::init(&config.observability);

    tracing::info!("productpage v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        details = %config.services.details.base_url(config.services.domain.as_deref()),
        reviews = %config.services.reviews.base_url(config.services.domain.as_deref()),
        ratings = %config.services.ratings.base_url(config.services.domain.as_deref()),
        flood_factor = config.flood_factor,
        downstream_timeout_secs = config.timeouts.downstream_secs,
        "Configuration loaded"
    );

    let listener = bind(cli.port).await?;

    let server = HttpServer::new(config)?;
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Bind on all interfaces, preferring a dual-stack IPv6 socket.
async fn bind(port: u16) -> std::io::Result<TcpListener> {
    let v6 = SocketAddr::from((Ipv6Addr::UNSPECIFIED, port));
    match TcpListener::bind(v6).await {
        Ok(listener) => Ok(listener),
        Err(e) => {
            tracing::warn!(error = %e, "IPv6 bind failed, falling back to IPv4");
            TcpListener::bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port))).await
        }
    }
}
