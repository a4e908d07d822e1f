//! Cart offer service.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │              CART OFFER SERVICE              │
//!                         │                                              │
//!   POST /api/v1/offer    │  ┌────────┐     ┌──────────────────────┐     │
//!   ──────────────────────┼─▶│  http  │────▶│  offers::registry    │     │
//!                         │  │ server │     │  (append-only, COW)  │     │
//!   POST /api/v1/cart/    │  │        │     └──────────▲───────────┘     │
//!        apply_offer      │  │        │                │ first match     │
//!   ──────────────────────┼─▶│        │────▶┌──────────┴───────────┐     │
//!                         │  └────────┘     │   offers::matcher    │     │
//!                         │                 └──────────┬───────────┘     │
//!                         │                            │ resolve         │
//!                         │                 ┌──────────▼───────────┐     │    segment
//!                         │                 │  segment::resolver   │─────┼──▶ service
//!                         │                 │  local rule │ http   │     │   (optional)
//!                         │                 └──────────────────────┘     │
//!                         │                                              │
//!                         │  config · observability · resilience ·       │
//!                         │  lifecycle · admin                           │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use cart_offers::config::load_or_default;
use cart_offers::lifecycle::signals::trigger_on_signal;
use cart_offers::observability::{logging, metrics};
use cart_offers::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "cart-offers", version, about = "Restaurant cart offer service")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "CART_OFFERS_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_or_default(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability);
    tracing::info!("cart-offers v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        segment_mode = ?config.segment.mode,
        strict_offer_types = config.offers.strict_offer_types,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    trigger_on_signal(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
