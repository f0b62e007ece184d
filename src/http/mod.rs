//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TLS connection (axum-server)
//!     → server.rs (router, middleware stack)
//!     → request.rs (request ID, `printerUrl` query, multipart file)
//!     → middleware/cors.rs (OPTIONS short-circuit, CORS headers)
//!     → health.rs / status.rs / upload.rs
//!     → response.rs (RelayError → status code + body)
//!     → Send to client
//! ```

pub mod health;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;
pub mod status;
pub mod upload;

pub use request::{PrinterQuery, X_REQUEST_ID};
pub use response::RelayError;
pub use server::{build_router, AppState, RelayServer};
