//! Response bodies and error mapping.
//!
//! # Responsibilities
//! - Define the JSON bodies returned by the relay
//! - Map every relay failure kind to its HTTP status and body
//! - Forward a printer reply to the caller
//!
//! # Design Decisions
//! - Error kinds are the contract; message wording is presentation only
//! - Printer-reported statuses are mirrored, except 403 on upload which is its own kind
//! - Transport failures on `/upload` get a minimal plain-text body

use axum::{
    extract::multipart::MultipartError,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::printer::PrinterReply;

/// Plain-text body for transport failures during upload-and-print.
pub const COMMUNICATION_FAILED: &str = "printer communication failed";

/// `{"error": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
}

/// Body of `GET /status`, in both the reachable and unreachable shape.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub proxy: &'static str,
    pub printer: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusReport {
    pub fn reachable(message: String) -> Self {
        Self {
            proxy: "ok",
            printer: "ok",
            message,
            error: None,
        }
    }

    pub fn unreachable(error: String) -> Self {
        Self {
            proxy: "ok",
            printer: "unreachable",
            message: "printer connect fail".to_string(),
            error: Some(error),
        }
    }
}

/// Every way a relay request can fail.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("printerUrl query parameter is required")]
    MissingPrinterUrl,

    #[error("file is required")]
    MissingFile,

    #[error("printer is already printing")]
    AlreadyPrinting,

    #[error("upload failed")]
    UploadFailed(StatusCode),

    #[error("print start failed")]
    PrintStartFailed(StatusCode),

    #[error("not found")]
    NotFound,

    /// Status probe could not reach the printer; carries the cause.
    #[error("printer unreachable: {0}")]
    PrinterUnreachable(String),

    /// Upload-and-print lost contact with the printer; carries the cause.
    #[error("printer communication failed: {0}")]
    Communication(String),

    /// The inbound multipart body could not be read.
    #[error("invalid upload body: {0}")]
    Body(#[from] MultipartError),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingPrinterUrl | RelayError::MissingFile => StatusCode::BAD_REQUEST,
            RelayError::AlreadyPrinting => StatusCode::FORBIDDEN,
            RelayError::NotFound => StatusCode::NOT_FOUND,
            RelayError::UploadFailed(status) | RelayError::PrintStartFailed(status) => *status,
            RelayError::PrinterUnreachable(_) | RelayError::Communication(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            RelayError::Body(err) => err.status(),
        }
    }

    fn json(&self) -> Json<ErrorBody> {
        Json(ErrorBody {
            error: self.to_string(),
        })
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            RelayError::PrinterUnreachable(cause) => {
                (status, Json(StatusReport::unreachable(cause))).into_response()
            }
            RelayError::Communication(_) => (status, COMMUNICATION_FAILED).into_response(),
            RelayError::Body(err) => (status, err.body_text()).into_response(),
            other => (status, other.json()).into_response(),
        }
    }
}

/// Pass a printer reply through: status, body and content type.
pub fn forward(reply: PrinterReply) -> Response {
    let mut response = (reply.status, reply.body).into_response();
    if let Some(content_type) = reply.content_type {
        response.headers_mut().insert(CONTENT_TYPE, content_type);
    }
    response
}
