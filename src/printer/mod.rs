//! Printer API client subsystem.
//!
//! # Data Flow
//! ```text
//! handler (status / upload)
//!     → types.rs (PrinterTarget from `printerUrl`, UploadedArtifact from multipart)
//!     → client.rs (one outbound call per step)
//!     → Result<PrinterReply, PrinterError>
//!     → handler branches on the result
//! ```
//!
//! # Design Decisions
//! - One client shared by all handlers; no per-printer state is kept
//! - Only the status probe carries a deadline; uploads and print-start may run as long as the printer takes
//! - Calls are never retried

pub mod client;
pub mod types;

pub use client::PrinterClient;
pub use types::{PrinterError, PrinterReply, PrinterTarget, UploadedArtifact};
