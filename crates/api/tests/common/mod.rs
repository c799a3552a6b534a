#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use futures::{stream, StreamExt};
use http_body_util::BodyExt;
use stagecraft_api::config::{MockIdentity, ServerConfig};
use stagecraft_api::router::build_app_router;
use stagecraft_api::state::AppState;
use stagecraft_core::types::USER_ID_HEADER;
use stagecraft_llm::config::LlmConfig;
use stagecraft_llm::sse::{done_record, encode_delta, format_record};
use tower::ServiceExt;

pub const TEST_USER: &str = "test-user-001";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        identity: MockIdentity {
            user_id: TEST_USER.to_string(),
            email: Some("test@example.com".to_string()),
        },
    }
}

/// LLM settings pointing at `api_url` with a test key.
pub fn test_llm_config(api_url: &str) -> LlmConfig {
    LlmConfig {
        api_url: api_url.to_string(),
        api_key: Some("test-key".to_string()),
        model: "test-model".to_string(),
    }
}

/// Build the full application router over a seeded store. The upstream
/// URL points nowhere; proxy tests use [`build_app_with_llm`].
pub fn build_test_app() -> Router {
    build_app_with_llm(test_llm_config("http://127.0.0.1:9"))
}

pub fn build_app_with_llm(llm_config: LlmConfig) -> Router {
    let config = test_config();
    let state = AppState::new(stagecraft_db::create_pool(), config.clone(), llm_config);
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_as(app: Router, uri: &str, user: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header(USER_ID_HEADER, user)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
    user: Option<&str>,
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(user) = user {
        builder = builder.header(USER_ID_HEADER, user);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::POST, uri, body, None).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::PUT, uri, body, None).await
}

pub async fn body_bytes(response: Response) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await.to_vec()).unwrap()
}

// ---------------------------------------------------------------------------
// Fake upstream completion API
// ---------------------------------------------------------------------------

/// How the fake upstream answers `POST /chat/completions`.
#[derive(Clone)]
pub enum UpstreamReply {
    /// 200 with these deltas, then `[DONE]`.
    Deltas(Vec<&'static str>),
    /// These deltas, then the connection is aborted.
    AbortAfter(Vec<&'static str>),
    /// A bare error status.
    Status(StatusCode),
}

/// A request the fake upstream received.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub authorization: Option<String>,
    pub body: serde_json::Value,
}

pub struct FakeUpstream {
    reply: UpstreamReply,
    seen: Mutex<Vec<SeenRequest>>,
}

impl FakeUpstream {
    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

async fn completions(
    State(upstream): State<Arc<FakeUpstream>>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Response {
    upstream.seen.lock().unwrap().push(SeenRequest {
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body,
    });

    let records = |deltas: &[&str]| -> Vec<Result<Bytes, std::io::Error>> {
        deltas
            .iter()
            .map(|d| Ok(Bytes::from(format_record(&encode_delta(d)))))
            .collect()
    };

    match &upstream.reply {
        UpstreamReply::Deltas(deltas) => {
            let mut chunks = records(deltas);
            chunks.push(Ok(Bytes::from(done_record())));
            Body::from_stream(stream::iter(chunks)).into_response()
        }
        UpstreamReply::AbortAfter(deltas) => {
            let mut chunks = records(deltas);
            chunks.push(Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "upstream went away",
            )));
            // The error must land after the headers are flushed.
            let body = stream::iter(chunks).then(|chunk| async move {
                if chunk.is_err() {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                }
                chunk
            });
            Body::from_stream(body).into_response()
        }
        UpstreamReply::Status(status) => (*status, "upstream exploded").into_response(),
    }
}

/// Serve a fake upstream on an ephemeral port. Returns its base URL.
pub async fn spawn_upstream(reply: UpstreamReply) -> (String, Arc<FakeUpstream>) {
    let upstream = Arc::new(FakeUpstream {
        reply,
        seen: Mutex::new(Vec::new()),
    });
    let app = Router::new()
        .route("/chat/completions", post(completions))
        .with_state(Arc::clone(&upstream));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), upstream)
}
