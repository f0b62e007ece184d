//! Printer Relay
//!
//! A desktop-resident HTTPS relay that lets a browser page talk to a 3D
//! printer's plain-HTTP API.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌────────────────────────────────────────────────────┐
//!                        │                   PRINTER RELAY                     │
//!                        │                                                     │
//!   Browser (HTTPS)      │  ┌──────────┐   ┌──────────┐   ┌────────────────┐  │
//!   ─────────────────────┼─▶│   net    │──▶│  http    │──▶│ health/status/ │  │
//!                        │  │  (TLS)   │   │ CORS, id │   │    upload      │  │
//!                        │  └──────────┘   └──────────┘   └───────┬────────┘  │
//!                        │                                         │           │
//!                        │                                         ▼           │
//!   JSON / forwarded     │  ┌──────────┐                   ┌────────────────┐  │
//!   ◀────────────────────┼──│ response │◀──────────────────│ printer client │◀─┼──── Printer API
//!                        │  │ mapping  │                   │   (reqwest)    │  │     (HTTP)
//!                        │  └──────────┘                   └────────────────┘  │
//!                        │                                                     │
//!                        │   config · observability · lifecycle               │
//!                        └────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use printer_relay::config::loader::load_or_default;
use printer_relay::config::validation::validate_config;
use printer_relay::config::ConfigError;
use printer_relay::lifecycle::{prepare, wait_for_signal, Shutdown};
use printer_relay::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "printer-relay")]
#[command(about = "Local HTTPS relay for 3D printer REST APIs", version)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(long)]
    bind: Option<String>,

    /// Override `tls.cert_path`.
    #[arg(long)]
    cert: Option<String>,

    /// Override `tls.key_path`.
    #[arg(long)]
    key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_or_default(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(cert) = cli.cert {
        config.tls.cert_path = cert;
    }
    if let Some(key) = cli.key {
        config.tls.key_path = key;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability);

    tracing::info!("printer-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        status_timeout_ms = config.printer.status_timeout_ms,
        max_upload_bytes = config.limits.max_upload_bytes,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Validation guarantees the address parses.
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let (server, listener) = prepare(config).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let signal_task = shutdown.trigger_on(wait_for_signal());

    server.run(listener, server_shutdown).await?;
    signal_task.abort();

    tracing::info!("Shutdown complete");
    Ok(())
}
