//! inmo-gateway
//!
//! ```text
//!     Browser / back office
//!         │  /api/proxy?service=..   /api/catalogs/..
//!         ▼
//!  ┌──────────────────────────────────────────────┐
//!  │ http (CORS, request id, timeout, trace)      │
//!  │   → routing (service table, target URL)      │
//!  │   → upstream (pooled reqwest client)         │
//!  │   → catalog (paging, cache, fallback)        │
//!  │                                              │
//!  │ config (TOML + .env + env, ArcSwap reload)   │
//!  │ admin (status, services, reload, cache)      │
//!  │ observability (tracing, prometheus)          │
//!  └──────────────────────────────────────────────┘
//!         │
//!         ▼
//!     auth · caja · inmobiliaria · archivos · atencion · planes · ventas · config
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use inmo_gateway::config::watcher::ConfigWatcher;
use inmo_gateway::config::ConfigSource;
use inmo_gateway::observability::{logging, metrics};
use inmo_gateway::{GatewayServer, Shutdown};

#[derive(Parser)]
#[command(name = "inmo-gateway")]
#[command(about = "Reverse-proxy gateway for the back office microservices", long_about = None)]
struct Args {
    /// Optional TOML configuration file.
    #[arg(short, long, env = "GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    /// File with service URLs (KEY=value lines).
    #[arg(short, long, env = "GATEWAY_ENV_FILE", default_value = ".env")]
    env_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let source = ConfigSource::new(args.config, Some(args.env_file));
    let config = source.load()?;

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "inmo-gateway starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        services = config.services.endpoints.len(),
        lookups = config.services.lookups.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    // The watcher must outlive the server; dropping it stops the events.
    let (_watcher, config_updates) = if config.reload.watch_files {
        let (watcher, updates) = ConfigWatcher::new(source.clone());
        (Some(watcher.run()?), updates)
    } else {
        let (_tx, updates) = mpsc::unbounded_channel();
        (None, updates)
    };

    let server = GatewayServer::new(config, source)?;
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
