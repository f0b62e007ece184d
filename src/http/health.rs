//! `GET /health`: liveness of the relay process itself.

use axum::Json;

use crate::http::response::HealthReport;

/// Always 200. Never contacts the printer.
pub async fn health() -> Json<HealthReport> {
    Json(HealthReport { status: "running" })
}
