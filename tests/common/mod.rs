#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use answer_service::{
    build_app,
    config::AppConfig,
    store::{QuestionRepository, SqliteStore},
    AppState,
};
use axum::{body::Body, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use http::{Method, Request};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

#[derive(Clone)]
pub enum ProviderReply {
    Completion(&'static str),
    Status(StatusCode),
    NotJson,
    Hang,
}

pub struct MockProvider {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl MockProvider {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

pub async fn spawn_provider(reply: ProviderReply) -> MockProvider {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();

    let app = Router::new().route(
        "/v1/chat/completions",
        post(move || {
            let reply = reply.clone();
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                match reply {
                    ProviderReply::Completion(content) => Json(json!({
                        "id": "chatcmpl-test",
                        "object": "chat.completion",
                        "choices": [{
                            "index": 0,
                            "message": { "role": "assistant", "content": content },
                            "finish_reason": "stop"
                        }]
                    }))
                    .into_response(),
                    ProviderReply::Status(status) => {
                        (status, Json(json!({ "error": { "message": "boom" } }))).into_response()
                    }
                    ProviderReply::NotJson => "<html>oops</html>".into_response(),
                    ProviderReply::Hang => {
                        tokio::time::sleep(Duration::from_secs(10)).await;
                        StatusCode::OK.into_response()
                    }
                }
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockProvider {
        base_url: format!("http://{addr}/v1"),
        hits,
    }
}

pub fn test_config(api_base: &str) -> AppConfig {
    let api_base = api_base.to_string();
    AppConfig::from_lookup(move |key| match key {
        "OPENAI_API_KEY" => Some("sk-test".to_string()),
        "OPENAI_API_BASE" => Some(api_base.clone()),
        "OPENAI_MODEL" => Some("gpt-test".to_string()),
        "PROVIDER_TIMEOUT_MS" => Some("500".to_string()),
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        _ => None,
    })
}

pub async fn memory_store() -> Arc<SqliteStore> {
    Arc::new(SqliteStore::in_memory().await.unwrap())
}

pub fn build_test_app(api_base: &str, store: Arc<dyn QuestionRepository>) -> Router {
    build_app(AppState::new(&test_config(api_base), store))
}

pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn upload_request(question: &str, choices: &[&str]) -> Request<Body> {
    json_request(
        Method::POST,
        "/upload",
        json!({ "question": question, "choices": choices }),
    )
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}
