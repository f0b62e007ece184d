//! Startup orchestration.
//!
//! Order: TLS material → relay (printer client, router) → listener. Any
//! failure is returned to `main` and aborts the process.

use std::net::{SocketAddr, TcpListener};

use thiserror::Error;

use crate::config::RelayConfig;
use crate::http::RelayServer;
use crate::net::{load_tls_config, TlsError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error("failed to build printer client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Build the relay and bind its listener.
pub async fn prepare(config: RelayConfig) -> Result<(RelayServer, TcpListener), StartupError> {
    let addr: SocketAddr = config
        .listener
        .bind_address
        .parse()
        .map_err(|_| StartupError::BindAddress(config.listener.bind_address.clone()))?;

    let tls = load_tls_config(&config.tls).await?;
    let server = RelayServer::new(config, tls)?;

    let listener = TcpListener::bind(addr).map_err(|source| StartupError::Bind { addr, source })?;
    tracing::info!(address = %addr, "Listener bound");

    Ok((server, listener))
}
