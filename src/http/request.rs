//! Request handling and extraction.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) and echo it back
//! - Extract the `printerUrl` query parameter
//! - Pull the single `file` field out of a multipart body
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The file is buffered fully in memory; nothing is written to disk

use std::convert::Infallible;

use axum::{
    extract::{multipart::Multipart, FromRequestParts, Request},
    http::{request::Parts, HeaderName},
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tracing::Span;

use crate::http::response::RelayError;
use crate::printer::{PrinterTarget, UploadedArtifact};

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Multipart field carrying the GCode file.
pub const FILE_FIELD: &str = "file";

/// Assigns an `x-request-id` to requests that arrive without one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)
}

/// Copies the request's `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// Span for `TraceLayer`, tagged with the request ID.
pub fn request_span(request: &Request) -> Span {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}

/// Query parameter naming the printer base URL.
pub const PRINTER_URL_PARAM: &str = "printerUrl";

/// Query string shared by `/status` and `/upload`.
///
/// Extraction never rejects: a malformed or repeated query still reaches the
/// handler, which answers with its own JSON error.
#[derive(Debug, Default)]
pub struct PrinterQuery {
    pub printer_url: Option<String>,
}

impl PrinterQuery {
    /// Parse a raw query string. A repeated `printerUrl` keeps its first value.
    pub fn parse(raw: Option<&str>) -> Self {
        let printer_url = raw.and_then(|raw| {
            url::form_urlencoded::parse(raw.as_bytes())
                .find(|(key, _)| key == PRINTER_URL_PARAM)
                .map(|(_, value)| value.into_owned())
        });
        Self { printer_url }
    }

    pub fn target(&self) -> Result<PrinterTarget, RelayError> {
        PrinterTarget::from_query(self.printer_url.as_deref()).ok_or(RelayError::MissingPrinterUrl)
    }
}

impl<S> FromRequestParts<S> for PrinterQuery
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::parse(parts.uri.query()))
    }
}

/// Read the first `file` field that carries a filename.
///
/// Fields with other names, and a `file` field sent without a filename, are
/// skipped. `Ok(None)` means no usable file was present.
pub async fn read_artifact(mut multipart: Multipart) -> Result<Option<UploadedArtifact>, RelayError> {
    while let Some(field) = multipart.next_field().await.map_err(RelayError::Body)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_owned) else {
            continue;
        };

        let bytes = field.bytes().await.map_err(RelayError::Body)?;
        return Ok(Some(UploadedArtifact::new(filename, bytes)));
    }

    Ok(None)
}
