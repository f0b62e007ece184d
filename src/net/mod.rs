//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Startup
//!     → tls.rs (read cert/key PEM once, build rustls config)
//!     → axum-server TLS acceptor
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - TLS is mandatory; there is no plaintext listener
//! - Certificate material is read once and shared by every connection

pub mod tls;

pub use tls::{load_tls_config, TlsError};
