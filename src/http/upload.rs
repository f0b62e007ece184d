//! `POST /upload`: upload a GCode file, then start printing it.
//!
//! Two printer calls, strictly in order. Print-start is only attempted after
//! the upload returned 2xx, and its own status decides the outcome.

use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        State,
    },
    http::StatusCode,
    response::Response,
};

use crate::http::request::{read_artifact, PrinterQuery};
use crate::http::response::{forward, RelayError};
use crate::http::server::AppState;
use crate::printer::PrinterError;

pub async fn upload(
    State(state): State<AppState>,
    query: PrinterQuery,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, RelayError> {
    let target = query.target().inspect_err(|_| {
        tracing::warn!("/upload called without printerUrl");
    })?;

    let artifact = match multipart {
        Ok(multipart) => read_artifact(multipart).await?,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Upload body is not multipart");
            None
        }
    };
    let artifact = artifact.ok_or_else(|| {
        tracing::warn!(printer = %target, "/upload called without file");
        RelayError::MissingFile
    })?;

    tracing::info!(
        printer = %target,
        filename = %artifact.filename,
        bytes = artifact.len(),
        "Uploading file to printer"
    );

    match state.printer.upload(&target, &artifact).await {
        Ok(_) => {}
        Err(PrinterError::Status { status, .. }) if status == StatusCode::FORBIDDEN => {
            tracing::warn!(printer = %target, "Upload rejected: printer is already printing");
            return Err(RelayError::AlreadyPrinting);
        }
        Err(PrinterError::Status { status, .. }) => {
            tracing::warn!(printer = %target, status = %status, "Upload failed");
            return Err(RelayError::UploadFailed(status));
        }
        Err(err @ (PrinterError::Timeout(_) | PrinterError::Transport(_))) => {
            tracing::error!(printer = %target, error = %err, "Printer communication failed during upload");
            return Err(RelayError::Communication(err.to_string()));
        }
    }

    match state.printer.start_print(&target, &artifact.filename).await {
        Ok(reply) => {
            tracing::info!(printer = %target, filename = %artifact.filename, "Print started");
            Ok(forward(reply))
        }
        Err(PrinterError::Status { status, .. }) => {
            tracing::warn!(printer = %target, status = %status, "Print start failed");
            Err(RelayError::PrintStartFailed(status))
        }
        Err(err @ (PrinterError::Timeout(_) | PrinterError::Transport(_))) => {
            tracing::error!(printer = %target, error = %err, "Printer communication failed during print start");
            Err(RelayError::Communication(err.to_string()))
        }
    }
}
