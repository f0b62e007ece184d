//! Shared utilities for integration testing: mock printers and request builders.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Multipart, RawQuery, State},
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use printer_relay::config::RelayConfig;
use printer_relay::http::{build_router, AppState};
use tokio::net::TcpListener;

pub const BOUNDARY: &str = "relay-test-boundary";

/// What the mock printer answers on each endpoint.
#[derive(Clone)]
pub struct Behavior {
    pub info_status: u16,
    pub info_body: &'static str,
    pub info_delay: Duration,
    pub upload_status: u16,
    pub start_status: u16,
    pub start_body: &'static str,
    /// Drop the connection on print-start instead of answering.
    pub start_hangs_up: bool,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            info_status: 200,
            info_body: "ok",
            info_delay: Duration::ZERO,
            upload_status: 201,
            start_status: 200,
            start_body: r#"{"result":"ok"}"#,
            start_hangs_up: false,
        }
    }
}

/// A file as the printer received it.
#[derive(Debug, Clone)]
pub struct ReceivedFile {
    pub field: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Default)]
pub struct Calls {
    pub info: Arc<AtomicU32>,
    pub upload: Arc<AtomicU32>,
    pub start: Arc<AtomicU32>,
    pub start_queries: Arc<Mutex<Vec<String>>>,
    pub files: Arc<Mutex<Vec<ReceivedFile>>>,
}

impl Calls {
    pub fn info(&self) -> u32 {
        self.info.load(Ordering::SeqCst)
    }

    pub fn upload(&self) -> u32 {
        self.upload.load(Ordering::SeqCst)
    }

    pub fn start(&self) -> u32 {
        self.start.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> u32 {
        self.info() + self.upload() + self.start()
    }
}

#[derive(Clone)]
struct MockState {
    behavior: Behavior,
    calls: Calls,
}

pub struct MockPrinter {
    pub addr: SocketAddr,
    pub calls: Calls,
}

impl MockPrinter {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap()
}

async fn server_info(State(state): State<MockState>) -> (StatusCode, &'static str) {
    state.calls.info.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(state.behavior.info_delay).await;
    (status(state.behavior.info_status), state.behavior.info_body)
}

async fn files_upload(State(state): State<MockState>, mut multipart: Multipart) -> StatusCode {
    state.calls.upload.fetch_add(1, Ordering::SeqCst);
    while let Some(field) = multipart.next_field().await.unwrap() {
        let received = ReceivedFile {
            field: field.name().unwrap_or_default().to_string(),
            filename: field.file_name().map(str::to_owned),
            content_type: field.content_type().map(str::to_owned),
            bytes: field.bytes().await.unwrap().to_vec(),
        };
        state.calls.files.lock().unwrap().push(received);
    }
    status(state.behavior.upload_status)
}

async fn print_start(
    State(state): State<MockState>,
    RawQuery(query): RawQuery,
) -> (StatusCode, [(&'static str, &'static str); 1], &'static str) {
    state.calls.start.fetch_add(1, Ordering::SeqCst);
    state
        .calls
        .start_queries
        .lock()
        .unwrap()
        .push(query.unwrap_or_default());
    if state.behavior.start_hangs_up {
        // Unwinding the connection task closes the socket without a response.
        panic!("printer hung up");
    }
    (
        status(state.behavior.start_status),
        [("content-type", "application/json")],
        state.behavior.start_body,
    )
}

/// Start a programmable mock printer API on an ephemeral port.
pub async fn start_mock_printer(behavior: Behavior) -> MockPrinter {
    let calls = Calls::default();
    let app = Router::new()
        .route("/server/info", get(server_info))
        .route("/server/files/upload", post(files_upload))
        .route("/printer/print/start", post(print_start))
        .with_state(MockState {
            behavior,
            calls: calls.clone(),
        });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockPrinter { addr, calls }
}

/// Accepts connections and never answers.
pub async fn start_silent_printer() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    addr
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// The relay router with default configuration.
pub fn relay() -> Router {
    relay_with(RelayConfig::default())
}

pub fn relay_with(config: RelayConfig) -> Router {
    let state = AppState::from_config(&config).unwrap();
    build_router(state, &config.limits)
}

pub fn query(printer_url: &str) -> String {
    format!("printerUrl={}", urlencoding::encode(printer_url))
}

/// Multipart body with a single file part.
pub fn multipart_body(field: &str, filename: Option<&str>, data: &[u8]) -> Vec<u8> {
    let disposition = match filename {
        Some(name) => format!("form-data; name=\"{}\"; filename=\"{}\"", field, name),
        None => format!("form-data; name=\"{}\"", field),
    };

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(format!("Content-Disposition: {}\r\n", disposition).as_bytes());
    body.extend_from_slice(b"Content-Type: text/x-gcode\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn upload_request(query: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/upload?{}", query))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header("content-length", body.len())
        .body(Body::from(body))
        .unwrap()
}

/// A multipart body cut off before its closing boundary.
pub fn truncated_multipart_body(filename: &str, data: &[u8]) -> Vec<u8> {
    let mut body = multipart_body("file", Some(filename), data);
    let closing = format!("\r\n--{}--\r\n", BOUNDARY).len();
    body.truncate(body.len() - closing);
    body
}

pub async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
