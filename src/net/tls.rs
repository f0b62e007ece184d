//! TLS configuration and certificate loading.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;

use crate::config::TlsConfig;

/// Errors raised while preparing the HTTPS listener. All of them abort startup.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("failed to read {kind} file {path:?}: {source}")]
    Read {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no PEM certificate found in {0:?}")]
    NoCertificate(PathBuf),

    #[error("no PEM private key found in {0:?}")]
    NoPrivateKey(PathBuf),

    #[error("invalid PEM in {path:?}: {source}")]
    Pem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("rustls rejected certificate/key pair: {0}")]
    Rustls(#[source] std::io::Error),
}

/// Load TLS configuration from the configured certificate and key files.
pub async fn load_tls_config(config: &TlsConfig) -> Result<RustlsConfig, TlsError> {
    let cert_path = Path::new(&config.cert_path);
    let key_path = Path::new(&config.key_path);

    let cert = read_pem("certificate", cert_path).await?;
    let key = read_pem("private key", key_path).await?;

    check_certificate(cert_path, &cert)?;
    check_private_key(key_path, &key)?;

    let tls = RustlsConfig::from_pem(cert, key)
        .await
        .map_err(TlsError::Rustls)?;

    tracing::info!(
        cert_path = %cert_path.display(),
        key_path = %key_path.display(),
        "TLS certificate loaded"
    );
    Ok(tls)
}

async fn read_pem(kind: &'static str, path: &Path) -> Result<Vec<u8>, TlsError> {
    tokio::fs::read(path).await.map_err(|source| TlsError::Read {
        kind,
        path: path.to_path_buf(),
        source,
    })
}

fn check_certificate(path: &Path, pem: &[u8]) -> Result<(), TlsError> {
    let mut reader = Cursor::new(pem);
    let mut certs = rustls_pemfile::certs(&mut reader);
    match certs.next() {
        Some(Ok(_)) => Ok(()),
        Some(Err(source)) => Err(TlsError::Pem {
            path: path.to_path_buf(),
            source,
        }),
        None => Err(TlsError::NoCertificate(path.to_path_buf())),
    }
}

fn check_private_key(path: &Path, pem: &[u8]) -> Result<(), TlsError> {
    let mut reader = Cursor::new(pem);
    match rustls_pemfile::private_key(&mut reader) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(TlsError::NoPrivateKey(path.to_path_buf())),
        Err(source) => Err(TlsError::Pem {
            path: path.to_path_buf(),
            source,
        }),
    }
}
