use crate::config::ProxyConfig;
use crate::logging::SharedJournal;
use crate::proxy::{self, ProxyResult};
use crate::translate::anthropic_types::MessagesRequest;
use crate::translate::errors::GatewayFailure;

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

const SERVICE_NAME: &str = "anthropic-to-ollama-proxy";

/// Shared, read-only per-process state. The journal is the only part with
/// interior mutability.
#[derive(Clone)]
pub struct AppState {
    pub config: ProxyConfig,
    pub client: reqwest::Client,
    pub journal: SharedJournal,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/v1/messages", post(handle_messages))
        .route("/health", get(handle_health))
        .route("/v1/models", get(handle_models))
        .fallback(handle_not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_messages(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    // Parsed by hand so a bad body still gets an Anthropic-shaped 400.
    let req: MessagesRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(error = %e, "Rejecting unparseable request body");
            state
                .journal
                .warn("server", format!("Failed to parse request: {}", e));
            return into_response(GatewayFailure::invalid_request(e).into());
        }
    };

    tracing::debug!(
        model = %req.model,
        streaming = req.stream,
        messages = req.messages.len(),
        "Request received"
    );

    into_response(proxy::proxy_messages(&req, &state.config, &state.client, &state.journal).await)
}

fn into_response(result: ProxyResult) -> Response {
    match result {
        ProxyResult::Success(resp) => Json(resp).into_response(),
        ProxyResult::Error(err, status_code) => {
            let status = StatusCode::from_u16(status_code).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, Json(err)).into_response()
        }
    }
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "backend_url": state.config.backend.base_url,
        "available_models": state.config.models.len(),
    }))
}

async fn handle_models(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let models: Vec<serde_json::Value> = state
        .config
        .models
        .source_models()
        .into_iter()
        .map(|id| {
            serde_json::json!({
                "id": id,
                "object": "model",
                "created": 0,
                "owned_by": "ollama",
            })
        })
        .collect();

    Json(serde_json::json!({ "data": models, "object": "list" }))
}

async fn handle_not_found(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": format!("Endpoint {} not implemented", uri.path()),
            "hint": "Use /v1/messages",
        })),
    )
        .into_response()
}
