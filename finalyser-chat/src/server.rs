//! HTTP proxy: injects the financial snapshot as a system instruction and
//! streams the upstream completion back unchanged.

use std::future::Future;
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use finalyser_core::FinancialSnapshot;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::context::build_system_prompt;
use crate::error::ChatError;
use crate::upstream::{ChatMessage, UpstreamClient};

/// Body accepted by the chat endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatProxyRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_data: Option<FinancialSnapshot>,
}

#[derive(Clone)]
pub struct ProxyState {
    pub upstream: UpstreamClient,
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ])
}

pub fn router(upstream: UpstreamClient) -> Router {
    Router::new()
        .route("/", post(handle_chat))
        .route("/financial-chat", post(handle_chat))
        .route("/health", get(health))
        .layer(cors())
        .with_state(Arc::new(ProxyState { upstream }))
}

/// Serve until `shutdown` resolves
pub async fn serve(
    listener: TcpListener,
    upstream: UpstreamClient,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("chat proxy listening on http://{}", addr);
    }
    axum::serve(listener, router(upstream))
        .with_graceful_shutdown(async move {
            shutdown.await;
            tracing::info!("chat proxy shutting down");
        })
        .await
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn handle_chat(State(state): State<Arc<ProxyState>>, body: Bytes) -> Response {
    match proxy_chat(&state, &body).await {
        Ok(resp) => resp,
        Err(err) => {
            if !matches!(err, ChatError::Upstream { .. } | ChatError::RateLimited | ChatError::Billing) {
                tracing::error!("chat error: {err}");
            }
            err.into_response()
        }
    }
}

async fn proxy_chat(state: &ProxyState, body: &[u8]) -> Result<Response, ChatError> {
    let req: ChatProxyRequest =
        serde_json::from_slice(body).map_err(|e| ChatError::InvalidRequest(e.to_string()))?;

    let system = build_system_prompt(req.financial_data.as_ref());
    let upstream = state.upstream.open(&system, &req.messages).await?;

    Ok((
        [(CONTENT_TYPE, "text/event-stream")],
        Body::from_stream(upstream.bytes_stream()),
    )
        .into_response())
}
