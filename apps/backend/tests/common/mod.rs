//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext wiring the router to an in-memory SQLite database
//! - A mock chat completions provider served on an ephemeral port
//! - Profile header helpers

#![allow(dead_code)]

pub mod fixtures;

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use axum_test::TestServer;
use serde_json::{json, Value};

use flashgenius_backend::config::{AdaptationMode, LlmConfig};
use flashgenius_backend::db::Database;
use flashgenius_backend::services::adapter::AdaptationBackend;
use flashgenius_backend::services::llm::LlmClient;
use flashgenius_backend::{app, AppState};

/// One scripted reply from the mock provider.
#[derive(Clone, Debug)]
pub struct MockReply {
    pub status: StatusCode,
    pub content: String,
    pub delay: Option<Duration>,
}

impl MockReply {
    /// Successful completion whose message content is `content`.
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            content: content.into(),
            delay: None,
        }
    }

    /// Provider failure with the given status.
    pub fn failure(status: StatusCode) -> Self {
        Self {
            status,
            content: "provider unavailable".to_string(),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Clone, Default)]
struct MockState {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<Value>>>,
}

/// Mock OpenAI-compatible provider. Replies are served in order; once the
/// script runs out every request fails with 500.
pub struct MockProvider {
    state: MockState,
    addr: SocketAddr,
}

impl MockProvider {
    pub async fn start() -> Self {
        let state = MockState::default();
        let router = Router::new()
            .route("/v1/chat/completions", post(mock_completion))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock provider");
        let addr = listener.local_addr().expect("Mock provider has no address");
        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Mock provider failed");
        });

        Self { state, addr }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub fn push(&self, reply: MockReply) {
        self.state.replies.lock().unwrap().push_back(reply);
    }

    /// Request bodies received so far.
    pub fn requests(&self) -> Vec<Value> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Text parts of the last request's user message, joined.
    pub fn last_prompt(&self) -> String {
        let requests = self.requests();
        let last = requests.last().expect("No request reached the mock provider");
        last["messages"][0]["content"]
            .as_array()
            .expect("content should be an array of parts")
            .iter()
            .filter_map(|part| part["text"].as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

async fn mock_completion(
    State(state): State<MockState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.requests.lock().unwrap().push(body);
    let reply = state.replies.lock().unwrap().pop_front();

    match reply {
        Some(reply) => {
            if let Some(delay) = reply.delay {
                tokio::time::sleep(delay).await;
            }
            if reply.status.is_success() {
                let body = json!({
                    "choices": [{ "message": { "role": "assistant", "content": reply.content } }]
                });
                (reply.status, Json(body))
            } else {
                (reply.status, Json(json!({ "error": reply.content })))
            }
        }
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "no scripted reply" })),
        ),
    }
}

/// Test context containing the app state, router and mock provider.
pub struct TestContext {
    pub state: AppState,
    pub provider: MockProvider,
    app: Router,
}

impl TestContext {
    /// Context with local (miss-count) adaptation.
    pub async fn new() -> Self {
        Self::with_mode(AdaptationMode::Local).await
    }

    /// Context whose adaptation goes through the mock provider.
    pub async fn with_model_adaptation() -> Self {
        Self::with_mode(AdaptationMode::Model).await
    }

    pub async fn with_mode(mode: AdaptationMode) -> Self {
        Self::build(mode, None).await
    }

    /// Context with a tighter body limit on document uploads.
    pub async fn with_document_limit(max_bytes: usize) -> Self {
        Self::build(AdaptationMode::Local, Some(max_bytes)).await
    }

    async fn build(mode: AdaptationMode, max_document_bytes: Option<usize>) -> Self {
        let provider = MockProvider::start().await;

        let llm = LlmClient::new(&LlmConfig {
            api_key: Some("test-key".to_string()),
            base_url: provider.base_url(),
            timeout: Duration::from_secs(5),
            ..LlmConfig::default()
        })
        .expect("Failed to build model client");

        let db = Database::open_in_memory().expect("Failed to open in-memory database");
        let adapter = AdaptationBackend::from_mode(mode, &llm);
        let mut state = AppState::new(db, llm, adapter);
        if let Some(bytes) = max_document_bytes {
            state = state.with_max_document_bytes(bytes);
        }
        let app = app(state.clone());

        Self {
            state,
            provider,
            app,
        }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).expect("Failed to start test server")
    }

    /// Profile header name.
    pub fn profile_header() -> axum::http::HeaderName {
        axum::http::HeaderName::from_static("x-profile-id")
    }

    /// Profile header value.
    pub fn profile_value(profile: &str) -> axum::http::HeaderValue {
        axum::http::HeaderValue::from_str(profile).expect("Invalid profile header")
    }
}
