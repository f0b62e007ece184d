//! Outbound HTTP client for the printer API.
//!
//! # Responsibilities
//! - Probe `/server/info` under a hard deadline
//! - Re-wrap an uploaded file as multipart and POST it to `/server/files/upload`
//! - Trigger `/printer/print/start` for the uploaded filename
//! - Classify every outcome into `PrinterReply` or `PrinterError`

use std::time::{Duration, Instant};

use axum::http::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use tokio::time::timeout;

use crate::config::PrinterConfig;
use crate::observability::metrics;
use crate::printer::types::{PrinterError, PrinterReply, PrinterTarget, UploadedArtifact};

const UPLOAD_CONTENT_TYPE: &str = "application/octet-stream";

/// Printer API client, cheap to clone and shared by all handlers.
#[derive(Clone)]
pub struct PrinterClient {
    http: reqwest::Client,
    status_timeout: Duration,
}

impl PrinterClient {
    /// Create a client from the printer settings.
    pub fn new(config: &PrinterConfig) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(connect_timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(connect_timeout);
        }

        Ok(Self {
            http: builder.build()?,
            status_timeout: config.status_timeout(),
        })
    }

    /// Deadline applied to [`PrinterClient::server_info`].
    pub fn status_timeout(&self) -> Duration {
        self.status_timeout
    }

    /// GET `/server/info`.
    ///
    /// Any HTTP answer counts as reachable, so this never yields
    /// `PrinterError::Status`. The deadline covers the body read too.
    pub async fn server_info(&self, target: &PrinterTarget) -> Result<PrinterReply, PrinterError> {
        let started = Instant::now();
        let url = target.server_info_url();

        let call = async {
            let response = self.http.get(&url).send().await?;
            read_reply(response).await
        };

        let result = match timeout(self.status_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(PrinterError::Timeout(self.status_timeout)),
        };

        record("server_info", &result, started);
        result
    }

    /// POST the artifact to `/server/files/upload` as the multipart field `file`.
    pub async fn upload(
        &self,
        target: &PrinterTarget,
        artifact: &UploadedArtifact,
    ) -> Result<PrinterReply, PrinterError> {
        let started = Instant::now();

        let part = Part::stream_with_length(artifact.bytes.clone(), artifact.len() as u64)
            .file_name(artifact.filename.clone())
            .mime_str(UPLOAD_CONTENT_TYPE)?;
        let form = Form::new().part("file", part);

        let result = async {
            let response = self
                .http
                .post(target.upload_url())
                .multipart(form)
                .send()
                .await?;
            success_only(read_reply(response).await?)
        }
        .await;

        record("upload", &result, started);
        result
    }

    /// POST `/printer/print/start?filename=<name>` with an empty body.
    pub async fn start_print(
        &self,
        target: &PrinterTarget,
        filename: &str,
    ) -> Result<PrinterReply, PrinterError> {
        let started = Instant::now();

        let result = async {
            let response = self
                .http
                .post(target.print_start_url(filename))
                .send()
                .await?;
            success_only(read_reply(response).await?)
        }
        .await;

        record("print_start", &result, started);
        result
    }
}

async fn read_reply(response: reqwest::Response) -> Result<PrinterReply, PrinterError> {
    let status = response.status();
    let content_type = response.headers().get(CONTENT_TYPE).cloned();
    let body = response.bytes().await?;

    Ok(PrinterReply {
        status,
        content_type,
        body,
    })
}

fn success_only(reply: PrinterReply) -> Result<PrinterReply, PrinterError> {
    if reply.status.is_success() {
        Ok(reply)
    } else {
        Err(PrinterError::Status {
            status: reply.status,
            body: reply.body,
        })
    }
}

fn record(endpoint: &'static str, result: &Result<PrinterReply, PrinterError>, started: Instant) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    metrics::record_printer_call(endpoint, outcome, started);
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Bytes;
    use axum::http::StatusCode;

    fn reply(status: StatusCode) -> PrinterReply {
        PrinterReply {
            status,
            content_type: None,
            body: Bytes::from_static(b"{}"),
        }
    }

    #[test]
    fn success_only_passes_2xx() {
        assert!(success_only(reply(StatusCode::OK)).is_ok());
        assert!(success_only(reply(StatusCode::CREATED)).is_ok());
    }

    #[test]
    fn success_only_keeps_status_of_failures() {
        match success_only(reply(StatusCode::FORBIDDEN)) {
            Err(PrinterError::Status { status, .. }) => assert_eq!(status, StatusCode::FORBIDDEN),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn client_uses_configured_deadline() {
        let config = PrinterConfig {
            status_timeout_ms: 250,
            ..PrinterConfig::default()
        };
        let client = PrinterClient::new(&config).unwrap();
        assert_eq!(client.status_timeout(), Duration::from_millis(250));
    }

    #[tokio::test]
    async fn unreachable_printer_is_transport_error() {
        let client = PrinterClient::new(&PrinterConfig::default()).unwrap();
        let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", closed.local_addr().unwrap());
        drop(closed);
        let target = PrinterTarget::from_query(Some(&url)).unwrap();

        let err = client.start_print(&target, "part.gcode").await.unwrap_err();
        assert!(matches!(err, PrinterError::Transport(_)));
    }
}
