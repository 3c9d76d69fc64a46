//! HTTP gateway (Axum) for semantic recommendations.
//!
//! This module is primarily used by the `shelf` server binary.

#![allow(missing_docs)]

pub mod cors;
pub mod error;
pub mod handler;
pub mod payload;
pub mod state;

#[cfg(test)]
mod handler_tests;

use axum::{
    Json, Router,
    extract::State,
    http::HeaderValue,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use cors::cors_layer;
pub use error::GatewayError;
pub use handler::{hello_handler, recommend_handler, root_handler};
pub use state::HandlerState;

use crate::embedding::Embedder;

/// Routes without CORS (tests and embedding in other routers).
pub fn create_router_with_state<E>(state: HandlerState<E>) -> Router
where
    E: Embedder + 'static,
{
    Router::new()
        .route("/", get(root_handler))
        .route("/hello/{name}", get(hello_handler))
        .route("/recommend", post(recommend_handler::<E>))
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler::<E>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Full application router, CORS restricted to `origins`.
pub fn create_app<E>(state: HandlerState<E>, origins: Vec<HeaderValue>) -> Router
where
    E: Embedder + 'static,
{
    create_router_with_state(state).layer(cors_layer(origins))
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ReadyResponse {
    pub status: String,
    pub embedder_mode: String,
    pub device: String,
    pub embedding_dim: usize,
    pub top_k: usize,
}

#[tracing::instrument]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler<E>(State(state): State<HandlerState<E>>) -> Json<ReadyResponse>
where
    E: Embedder + 'static,
{
    let embedder = state.ranker.embedder();
    let embedder_mode = if embedder.is_stub() { "stub" } else { "model" };

    Json(ReadyResponse {
        status: "ok".to_string(),
        embedder_mode: embedder_mode.to_string(),
        device: embedder.device_label().to_string(),
        embedding_dim: embedder.embedding_dim(),
        top_k: state.ranker.top_k(),
    })
}
