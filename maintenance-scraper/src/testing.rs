//! Test doubles: a local HTTP server standing in for the feed host and the
//! completion endpoint, and an observer that counts retry events.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use crate::completion::RetryObserver;
use crate::error::PipelineError;

#[derive(Debug, Clone, Default)]
pub struct MockBehavior {
    content: String,
    fail_first: u32,
    delay: Duration,
    no_choices: bool,
    feed: Option<String>,
    page: Option<String>,
}

impl MockBehavior {
    /// Completion endpoint answering with `content`
    pub fn answering(content: &str) -> Self {
        Self {
            content: content.to_string(),
            ..Self::default()
        }
    }

    /// Completion endpoint returning 200 with an empty `choices` list
    pub fn without_choices() -> Self {
        Self {
            no_choices: true,
            ..Self::default()
        }
    }

    /// Answer HTTP 500 to the first `n` completion calls
    pub fn failing_first(mut self, n: u32) -> Self {
        self.fail_first = n;
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Serve `xml` at `/feed.rss`
    pub fn with_feed(mut self, xml: &str) -> Self {
        self.feed = Some(xml.to_string());
        self
    }

    /// Serve `html` at `/status`
    pub fn with_page(mut self, html: &str) -> Self {
        self.page = Some(html.to_string());
        self
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub body: serde_json::Value,
}

struct MockState {
    behavior: MockBehavior,
    calls: AtomicU32,
    last_request: Mutex<Option<RecordedRequest>>,
}

pub struct MockServer {
    addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockServer {
    pub async fn start(behavior: MockBehavior) -> Self {
        let state = Arc::new(MockState {
            behavior,
            calls: AtomicU32::new(0),
            last_request: Mutex::new(None),
        });

        let app = Router::new()
            .route("/chat/completions", post(chat_completions))
            .route("/feed.rss", get(feed))
            .route("/status", get(page))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn completion_calls(&self) -> u32 {
        self.state.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state.last_request.lock().unwrap().clone()
    }
}

async fn chat_completions(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let call = state.calls.fetch_add(1, Ordering::SeqCst) + 1;
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *state.last_request.lock().unwrap() = Some(RecordedRequest { authorization, body });

    let behavior = &state.behavior;
    if !behavior.delay.is_zero() {
        tokio::time::sleep(behavior.delay).await;
    }

    if call <= behavior.fail_first {
        return (StatusCode::INTERNAL_SERVER_ERROR, "upstream unavailable").into_response();
    }

    if behavior.no_choices {
        return Json(serde_json::json!({ "choices": [] })).into_response();
    }

    Json(serde_json::json!({
        "id": format!("mock-{}", call),
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "finish_reason": "stop",
            "message": { "role": "assistant", "content": behavior.content }
        }]
    }))
    .into_response()
}

async fn feed(State(state): State<Arc<MockState>>) -> Response {
    match &state.behavior.feed {
        Some(xml) => ([(header::CONTENT_TYPE, "application/rss+xml")], xml.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn page(State(state): State<Arc<MockState>>) -> Response {
    match &state.behavior.page {
        Some(html) => ([(header::CONTENT_TYPE, "text/html")], html.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[derive(Debug, Default)]
pub struct RecordingObserver {
    failures: AtomicU32,
    backoffs: AtomicU32,
    successes: AtomicU32,
    exhausted: AtomicU32,
}

impl RecordingObserver {
    pub fn failures(&self) -> u32 {
        self.failures.load(Ordering::SeqCst)
    }

    pub fn backoffs(&self) -> u32 {
        self.backoffs.load(Ordering::SeqCst)
    }

    pub fn successes(&self) -> u32 {
        self.successes.load(Ordering::SeqCst)
    }

    pub fn exhausted(&self) -> u32 {
        self.exhausted.load(Ordering::SeqCst)
    }
}

impl RetryObserver for RecordingObserver {
    fn on_attempt_failed(&self, _attempt: u32, _max_attempts: u32, _error: &PipelineError, backoff: Option<Duration>) {
        self.failures.fetch_add(1, Ordering::SeqCst);
        if backoff.is_some() {
            self.backoffs.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn on_success(&self, _attempt: u32) {
        self.successes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_exhausted(&self, _attempts: u32) {
        self.exhausted.fetch_add(1, Ordering::SeqCst);
    }
}
