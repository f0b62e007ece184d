//! `GET /status`: is the printer reachable?
//!
//! `proxy` is always `"ok"` (this handler ran), so the caller can tell a dead
//! relay from a dead printer. The printer probe is bounded by the configured
//! status timeout.

use axum::{
    extract::State,
    Json,
};

use crate::http::request::PrinterQuery;
use crate::http::response::{RelayError, StatusReport};
use crate::http::server::AppState;

pub async fn status(
    State(state): State<AppState>,
    query: PrinterQuery,
) -> Result<Json<StatusReport>, RelayError> {
    let target = query.target().inspect_err(|_| {
        tracing::warn!("/status called without printerUrl");
    })?;

    match state.printer.server_info(&target).await {
        Ok(reply) => {
            tracing::debug!(printer = %target, status = %reply.status, "Printer answered status probe");
            Ok(Json(StatusReport::reachable(reply.text())))
        }
        Err(err) => {
            tracing::warn!(printer = %target, kind = err.kind(), error = %err, "Printer connect fail");
            Err(RelayError::PrinterUnreachable(err.to_string()))
        }
    }
}
