use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use tracing::{debug, info, instrument};

use crate::embedding::Embedder;
use crate::gateway::error::GatewayError;
use crate::gateway::payload::{MessageResponse, RecommendRequest, RecommendResponse};
use crate::gateway::state::HandlerState;
use crate::ranking::RankRequest;

#[instrument]
pub async fn root_handler() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Hello World".to_string(),
    })
}

#[instrument]
pub async fn hello_handler(Path(name): Path<String>) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: format!("Hello {}", name),
    })
}

#[instrument(skip(state, body), fields(candidates = tracing::field::Empty))]
pub async fn recommend_handler<E>(
    State(state): State<HandlerState<E>>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<RecommendResponse>, GatewayError>
where
    E: Embedder + 'static,
{
    let rank_request = parse_recommend_request(body)?;
    tracing::Span::current().record("candidates", rank_request.len());

    debug!(
        target_len = rank_request.query().len(),
        "Ranking recommendation candidates"
    );

    let ranker = Arc::clone(&state.ranker);
    let ranking = tokio::task::spawn_blocking(move || ranker.rank(&rank_request))
        .await
        .map_err(|e| GatewayError::InternalError(format!("ranking task failed: {}", e)))??;

    let response = RecommendResponse::from(&ranking);
    info!(
        recommended = ?response.recommended_book_isbns,
        "Recommendation served"
    );

    Ok(Json(response))
}

/// Turns the raw body into a validated [`RankRequest`].
///
/// Malformed JSON or a schema mismatch is a 422; an empty `feature` list is a 400.
pub(crate) fn parse_recommend_request(
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<RankRequest, GatewayError> {
    let Json(value) = body.map_err(|rejection| GatewayError::InvalidSchema(rejection.body_text()))?;

    let request: RecommendRequest = serde_json::from_value(value)
        .map_err(|e| GatewayError::InvalidSchema(format!("Invalid request schema: {}", e)))?;

    Ok(request.into_rank_request()?)
}
