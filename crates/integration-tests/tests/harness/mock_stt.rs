//! Mock speech-to-text backend for integration tests
//!
//! Serves the `ElevenLabs` multipart endpoint and the Chutes JSON endpoint
//! from one listener, replies with a canned status and body, and records the
//! last request it saw

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Router, routing};
use tokio_util::sync::CancellationToken;

/// Request as observed by the mock
#[derive(Debug, Clone, Default)]
pub struct RecordedRequest {
    pub headers: HeaderMap,
    /// Multipart text fields
    pub fields: HashMap<String, String>,
    /// Multipart file part name and bytes
    pub file_name: Option<String>,
    pub file: Vec<u8>,
    /// JSON body (Chutes endpoint)
    pub json: Option<serde_json::Value>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Mock STT backend with a fixed reply
pub struct MockStt {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockSttState>,
}

struct MockSttState {
    request_count: AtomicU32,
    status: StatusCode,
    body: String,
    delay: Duration,
    last_request: Mutex<Option<RecordedRequest>>,
}

impl MockStt {
    /// Start a mock that answers 200 with `body`
    pub async fn start_ok(body: impl Into<String>) -> anyhow::Result<Self> {
        Self::start(200, body).await
    }

    /// Start a mock that answers with `status` and `body`
    pub async fn start(status: u16, body: impl Into<String>) -> anyhow::Result<Self> {
        Self::start_inner(status, body.into(), Duration::ZERO).await
    }

    /// Start a mock that waits `delay` before answering 200 with `body`
    pub async fn start_delayed(delay: Duration, body: impl Into<String>) -> anyhow::Result<Self> {
        Self::start_inner(200, body.into(), delay).await
    }

    async fn start_inner(status: u16, body: String, delay: Duration) -> anyhow::Result<Self> {
        let state = Arc::new(MockSttState {
            request_count: AtomicU32::new(0),
            status: StatusCode::from_u16(status)?,
            body,
            delay,
            last_request: Mutex::new(None),
        });

        let app = Router::new()
            .route("/v1/speech-to-text", routing::post(handle_multipart))
            .route("/transcribe", routing::post(handle_json))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for an `ElevenLabs` provider (the provider appends `/speech-to-text`)
    pub fn elevenlabs_base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Full endpoint URL for a Chutes provider
    pub fn chutes_url(&self) -> String {
        format!("http://{}/transcribe", self.addr)
    }

    /// Number of requests received on either endpoint
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }

    /// Most recent request, if any
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state.last_request.lock().unwrap().clone()
    }
}

impl Drop for MockStt {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn reply(state: &MockSttState, recorded: RecordedRequest) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    *state.last_request.lock().unwrap() = Some(recorded);

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body.clone(),
    )
        .into_response()
}

async fn handle_multipart(
    State(state): State<Arc<MockSttState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let mut recorded = RecordedRequest {
        headers,
        ..RecordedRequest::default()
    };

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_owned();

        if name == "file" {
            recorded.file_name = field.file_name().map(str::to_owned);
            recorded.file = field.bytes().await.unwrap().to_vec();
        } else {
            recorded.fields.insert(name, field.text().await.unwrap());
        }
    }

    reply(&state, recorded).await
}

async fn handle_json(State(state): State<Arc<MockSttState>>, headers: HeaderMap, body: Bytes) -> Response {
    let recorded = RecordedRequest {
        headers,
        json: serde_json::from_slice(&body).ok(),
        ..RecordedRequest::default()
    };

    reply(&state, recorded).await
}
