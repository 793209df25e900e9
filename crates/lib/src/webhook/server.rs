//! Webhook HTTP server: `POST /` for fulfillment calls, `GET /health` for probes.

use crate::config::Config;
use crate::handlers::HandlerContext;
use crate::webhook::dispatch;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared state for the webhook (config and handler dependencies). Read-only after startup.
#[derive(Clone)]
pub struct WebhookState {
    pub config: Arc<Config>,
    pub handlers: Arc<HandlerContext>,
}

impl WebhookState {
    pub fn new(config: Config, handlers: HandlerContext) -> Self {
        Self {
            config: Arc::new(config),
            handlers: Arc::new(handlers),
        }
    }
}

/// Routes for the webhook.
pub fn router(state: WebhookState) -> Router {
    Router::new()
        .route("/", post(webhook))
        .route("/health", get(health_http))
        .with_state(state)
}

/// Run the webhook server; binds to config.server.bind:config.server.port.
/// Callers apply the PORT override (`config::resolve_port`) before calling.
/// Blocks until shutdown (e.g. Ctrl+C).
pub async fn run_server(config: Config) -> Result<()> {
    let handlers = HandlerContext::from_config(&config).context("building joke client")?;

    let bind_addr = format!("{}:{}", config.server.bind.trim(), config.server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("webhook listening on {}", bind_addr);

    serve(listener, WebhookState::new(config, handlers), shutdown_signal()).await?;
    log::info!("webhook stopped");
    Ok(())
}

/// Serve the webhook on an already-bound listener until `shutdown` completes.
pub async fn serve<F>(listener: TcpListener, state: WebhookState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("webhook server exited")
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");
}

/// POST / — decode the fulfillment request, dispatch on its tag, reply with the encoded response.
/// Any failure is a 500 with a plain-text `ERROR: ...` body.
async fn webhook(State(state): State<WebhookState>, body: Bytes) -> Response {
    match dispatch::handle_body(&state.handlers, &body).await {
        Ok(json) => ([(header::CONTENT_TYPE, "application/json")], json).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /health returns a simple health JSON (for probes).
async fn health_http(State(state): State<WebhookState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "port": state.config.server.port,
    }))
}
