//! Per-request printer data and outbound call results.

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderValue, StatusCode};
use thiserror::Error;

const SERVER_INFO_PATH: &str = "/server/info";
const FILE_UPLOAD_PATH: &str = "/server/files/upload";
const PRINT_START_PATH: &str = "/printer/print/start";

/// Base URL of the printer API, as supplied by the caller.
///
/// Only presence is checked. Anything reqwest cannot parse surfaces later as
/// a transport failure of the outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterTarget {
    base: String,
}

impl PrinterTarget {
    /// Build a target from the raw `printerUrl` query value. Empty counts as missing.
    pub fn from_query(raw: Option<&str>) -> Option<Self> {
        let raw = raw?;
        if raw.is_empty() {
            return None;
        }
        Some(Self {
            base: raw.trim_end_matches('/').to_string(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn server_info_url(&self) -> String {
        format!("{}{}", self.base, SERVER_INFO_PATH)
    }

    pub fn upload_url(&self) -> String {
        format!("{}{}", self.base, FILE_UPLOAD_PATH)
    }

    /// Print-start endpoint with the filename percent-encoded into the query.
    pub fn print_start_url(&self, filename: &str) -> String {
        format!(
            "{}{}?filename={}",
            self.base,
            PRINT_START_PATH,
            urlencoding::encode(filename)
        )
    }
}

impl std::fmt::Display for PrinterTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.base)
    }
}

/// A GCode file received from the caller, held in memory for one request.
#[derive(Debug, Clone)]
pub struct UploadedArtifact {
    pub filename: String,
    pub bytes: Bytes,
}

impl UploadedArtifact {
    pub fn new(filename: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A fully-read response from the printer.
#[derive(Debug, Clone)]
pub struct PrinterReply {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl PrinterReply {
    /// Body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Why a printer call did not produce a usable reply.
#[derive(Debug, Error)]
pub enum PrinterError {
    /// The printer answered with a non-2xx status.
    #[error("printer returned HTTP {status}")]
    Status { status: StatusCode, body: Bytes },

    /// No complete response arrived before the deadline.
    #[error("printer did not respond within {} ms", .0.as_millis())]
    Timeout(Duration),

    /// DNS, connect, TLS, or body read failure.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

impl PrinterError {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PrinterError::Status { .. } => "http_error",
            PrinterError::Timeout(_) => "timeout",
            PrinterError::Transport(_) => "transport",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_empty_target_is_none() {
        assert_eq!(PrinterTarget::from_query(None), None);
        assert_eq!(PrinterTarget::from_query(Some("")), None);
    }

    #[test]
    fn blank_target_is_kept_verbatim() {
        let target = PrinterTarget::from_query(Some("  ")).unwrap();
        assert_eq!(target.base(), "  ");
    }

    #[test]
    fn endpoint_urls_trim_trailing_slash() {
        let target = PrinterTarget::from_query(Some("http://192.168.0.42:7125/")).unwrap();
        assert_eq!(target.base(), "http://192.168.0.42:7125");
        assert_eq!(target.server_info_url(), "http://192.168.0.42:7125/server/info");
        assert_eq!(
            target.upload_url(),
            "http://192.168.0.42:7125/server/files/upload"
        );
    }

    #[test]
    fn print_start_filename_is_encoded() {
        let target = PrinterTarget::from_query(Some("http://printer.local")).unwrap();
        assert_eq!(
            target.print_start_url("part.gcode"),
            "http://printer.local/printer/print/start?filename=part.gcode"
        );
        assert_eq!(
            target.print_start_url("my part&v2.gcode"),
            "http://printer.local/printer/print/start?filename=my%20part%26v2.gcode"
        );
        assert_eq!(
            target.print_start_url("부품.gcode"),
            "http://printer.local/printer/print/start?filename=%EB%B6%80%ED%92%88.gcode"
        );
    }

    #[test]
    fn timeout_message_names_deadline() {
        let err = PrinterError::Timeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "printer did not respond within 1500 ms");
        assert_eq!(err.kind(), "timeout");
    }
}
