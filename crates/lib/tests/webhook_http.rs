//! Integration tests: serve the webhook on an ephemeral port and exercise every tag over HTTP.
//! The joke API is replaced by a local axum stub; nothing leaves 127.0.0.1.

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use lib::config::{Config, JokeConfig};
use lib::handlers::{is_registered, FixedClock, HandlerContext, SeededPicker};
use lib::jokes::JokeApiClient;
use lib::webhook::{self, WebhookResponse, WebhookState};
use serde_json::json;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

const FALLBACK: &str = "no joke right now";

async fn spawn_router(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local_addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Stub joke API: `/joke` echoes its query, `/down` is a 503, `/slow` stalls.
async fn spawn_joke_stub() -> SocketAddr {
    let app = Router::new()
        .route(
            "/joke",
            get(|Query(q): Query<HashMap<String, String>>| async move {
                format!(
                    "flags={} format={} type={}",
                    q.get("blacklistFlags").cloned().unwrap_or_default(),
                    q.get("format").cloned().unwrap_or_default(),
                    q.get("type").cloned().unwrap_or_default(),
                )
            }),
        )
        .route(
            "/down",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        )
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "too late"
            }),
        );
    spawn_router(app).await
}

fn context(joke_url: String, timeout: Duration, hour: u32) -> HandlerContext {
    let client = JokeApiClient::new(joke_url, JokeConfig::default().blacklist_flags, timeout)
        .expect("joke client");
    HandlerContext::new(Arc::new(client), FALLBACK)
        .with_clock(Arc::new(FixedClock(hour)))
        .with_picker(Arc::new(SeededPicker::new(5)))
}

async fn spawn_webhook(ctx: HandlerContext) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local_addr");
    let state = WebhookState::new(Config::default(), ctx);
    tokio::spawn(async move {
        let _ = webhook::serve(listener, state, std::future::pending::<()>()).await;
    });
    format!("http://{}/", addr)
}

async fn post(url: &str, body: impl Into<reqwest::Body>) -> (StatusCode, String) {
    let res = reqwest::Client::new()
        .post(url)
        .header("content-type", "application/json")
        .body(body)
        .send()
        .await
        .expect("send");
    let status = StatusCode::from_u16(res.status().as_u16()).expect("status");
    let text = res.text().await.expect("body");
    (status, text)
}

async fn post_tag(url: &str, tag: &str, params: serde_json::Value) -> WebhookResponse {
    let body = json!({
        "fulfillmentInfo": { "tag": tag },
        "sessionInfo": { "session": "projects/p/agents/a/sessions/s1", "parameters": params }
    });
    let (status, text) = post(url, body.to_string()).await;
    assert_eq!(status, StatusCode::OK, "body: {}", text);
    WebhookResponse::decode(text.as_bytes()).expect("decode response")
}

fn texts(res: &WebhookResponse) -> Vec<String> {
    res.texts().map(str::to_string).collect()
}

#[tokio::test]
async fn validate_account_number_over_http() {
    let stub = spawn_joke_stub().await;
    let url = spawn_webhook(context(format!("http://{}/joke", stub), Duration::from_secs(2), 9)).await;

    let res = post_tag(&url, "validateAccountNumber", json!({ "account-number": "1923" })).await;
    assert_eq!(res.parameter("valid-account-number"), Some("true"));
    assert!(texts(&res).is_empty());

    let res = post_tag(&url, "validateAccountNumber", json!({ "account-number": "0000" })).await;
    assert_eq!(res.parameter("valid-account-number"), Some("false"));
}

#[tokio::test]
async fn generate_account_number_over_http() {
    let stub = spawn_joke_stub().await;
    let url = spawn_webhook(context(format!("http://{}/joke", stub), Duration::from_secs(2), 9)).await;

    for _ in 0..10 {
        let res = post_tag(&url, "generateAccountNumber", json!({})).await;
        let account = res.parameter("account-number").expect("account-number");
        assert!(is_registered(account), "{} not registered", account);
    }
}

#[tokio::test]
async fn greeting_over_http() {
    let stub = spawn_joke_stub().await;
    let url = spawn_webhook(context(format!("http://{}/joke", stub), Duration::from_secs(2), 21)).await;

    let res = post_tag(&url, "greeting", json!({})).await;
    let texts = texts(&res);
    assert_eq!(texts.len(), 1);
    assert!(texts[0].starts_with("Good Night! "), "{}", texts[0]);
    assert_eq!(res.parameter("hours"), Some("21"));
}

#[tokio::test]
async fn joke_relays_upstream_body_with_filters() {
    let stub = spawn_joke_stub().await;
    let url = spawn_webhook(context(format!("http://{}/joke", stub), Duration::from_secs(2), 9)).await;

    let res = post_tag(&url, "joke", json!({})).await;
    assert_eq!(
        texts(&res),
        ["flags=nsfw,religious,political,racist,sexist,explicit format=txt type=single"]
    );
    assert!(res.session_info.parameters.is_empty());
}

#[tokio::test]
async fn joke_upstream_error_status_falls_back() {
    let stub = spawn_joke_stub().await;
    let url = spawn_webhook(context(format!("http://{}/down", stub), Duration::from_secs(2), 9)).await;

    let res = post_tag(&url, "joke", json!({})).await;
    assert_eq!(texts(&res), [FALLBACK]);
}

#[tokio::test]
async fn joke_upstream_timeout_falls_back() {
    let stub = spawn_joke_stub().await;
    let url = spawn_webhook(context(
        format!("http://{}/slow", stub),
        Duration::from_millis(200),
        9,
    ))
    .await;

    let res = post_tag(&url, "joke", json!({})).await;
    assert_eq!(texts(&res), [FALLBACK]);
}

#[tokio::test]
async fn joke_upstream_unreachable_falls_back() {
    let closed = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("local_addr")
    };
    let url = spawn_webhook(context(format!("http://{}/joke", closed), Duration::from_secs(2), 9)).await;

    let res = post_tag(&url, "joke", json!({})).await;
    assert_eq!(texts(&res), [FALLBACK]);
}

#[tokio::test]
async fn unknown_tag_is_internal_server_error() {
    let stub = spawn_joke_stub().await;
    let url = spawn_webhook(context(format!("http://{}/joke", stub), Duration::from_secs(2), 9)).await;

    let body = json!({ "fulfillmentInfo": { "tag": "fooBar" }, "sessionInfo": { "parameters": {} } });
    let (status, text) = post(&url, body.to_string()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(text.starts_with("ERROR: "), "{}", text);
    assert!(text.contains("Unknown tag: fooBar"), "{}", text);
}

#[tokio::test]
async fn malformed_json_is_internal_server_error() {
    let stub = spawn_joke_stub().await;
    let url = spawn_webhook(context(format!("http://{}/joke", stub), Duration::from_secs(2), 9)).await;

    let (status, text) = post(&url, "{\"fulfillmentInfo\": ").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(text.starts_with("ERROR:"), "{}", text);
}

#[tokio::test]
async fn null_parameters_are_treated_as_missing() {
    let stub = spawn_joke_stub().await;
    let url = spawn_webhook(context(format!("http://{}/joke", stub), Duration::from_secs(2), 9)).await;

    let body = r#"{"fulfillmentInfo":{"tag":"validateAccountNumber"},"sessionInfo":{"session":null,"parameters":null}}"#;
    let (status, text) = post(&url, body).await;
    assert_eq!(status, StatusCode::OK, "body: {}", text);
    let res = WebhookResponse::decode(text.as_bytes()).expect("decode response");
    assert_eq!(res.parameter("valid-account-number"), Some("false"));
}
