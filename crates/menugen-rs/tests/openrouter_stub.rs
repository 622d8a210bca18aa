//! Integration tests for the OpenRouter generator.
//!
//! These tests start a stand-in chat completions server on a random port
//! and point a real `OpenRouterClient` at it.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use menugen_rs::prelude::*;

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: &'static str,
    hits: Arc<AtomicUsize>,
}

async fn completions(
    State(stub): State<Stub>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    stub.hits.fetch_add(1, Ordering::SeqCst);
    assert_eq!(
        headers.get("authorization").and_then(|v| v.to_str().ok()),
        Some("Bearer test-key")
    );
    let request: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(request["messages"][0]["role"], "user");
    (stub.status, stub.body.to_string())
}

/// Helper: spawn a stub returning `body` with `status`; returns a generator
/// pointed at it and the stub's hit counter.
async fn spawn_stub(
    status: StatusCode,
    body: &'static str,
) -> (OpenRouterGenerator, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(Stub {
            status,
            body,
            hits: hits.clone(),
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = OpenRouterClient::new("test-key")
        .unwrap()
        .with_endpoint(format!("http://{addr}/v1/chat/completions"));
    (OpenRouterGenerator::new(client), hits)
}

#[tokio::test]
async fn returns_trimmed_reply_text() {
    let (generator, hits) = spawn_stub(
        StatusCode::OK,
        r#"{"choices":[{"message":{"role":"assistant","content":"  The Saffron Table\n"},"finish_reason":"stop"}]}"#,
    )
    .await;

    let text = generator.generate("Suggest a name").await.unwrap();
    assert_eq!(text, "The Saffron Table");
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn reply_without_text_yields_sentinel() {
    let (generator, _) = spawn_stub(
        StatusCode::OK,
        r#"{"choices":[{"message":{"role":"assistant","content":null},"finish_reason":"content_filter"}]}"#,
    )
    .await;

    let text = generator.generate("Suggest a name").await.unwrap();
    assert_eq!(text, "No response");
}

#[tokio::test]
async fn reply_without_choices_yields_sentinel() {
    let (generator, _) = spawn_stub(StatusCode::OK, r#"{"choices":[]}"#).await;
    assert_eq!(generator.generate("x").await.unwrap(), NO_RESPONSE);
}

#[tokio::test]
async fn error_status_is_unavailable() {
    let (generator, _) = spawn_stub(
        StatusCode::SERVICE_UNAVAILABLE,
        r#"{"error":{"message":"upstream overloaded"}}"#,
    )
    .await;

    let err = generator.generate("x").await.unwrap_err();
    assert!(err.reason().contains("HTTP 503"), "{err}");
}

#[tokio::test]
async fn error_body_with_ok_status_is_unavailable() {
    let (generator, _) = spawn_stub(
        StatusCode::OK,
        r#"{"error":{"message":"invalid model"}}"#,
    )
    .await;

    let err = generator.generate("x").await.unwrap_err();
    assert!(err.reason().contains("invalid model"), "{err}");
}

#[tokio::test]
async fn cached_service_calls_the_endpoint_once_per_key() {
    let (generator, hits) = spawn_stub(
        StatusCode::OK,
        r#"{"choices":[{"message":{"content":"Starters\nSamosa\nDrinks\nChai"}}]}"#,
    )
    .await;
    let service = MenuGenerator::new(Arc::new(generator), Arc::new(ResponseCache::default()));

    let first = service.generate("India", "Modern").await.unwrap();
    let second = service.generate("India", "Modern").await.unwrap();

    // One call for the name, one for the menu, none for the repeat.
    assert_eq!(hits.load(Ordering::SeqCst), 2);
    assert_eq!(first.menu_text, second.menu_text);
    assert_eq!(second.sections.len(), 2);
}
