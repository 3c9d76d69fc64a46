use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::ranking::RankingError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid request schema: {0}")]
    InvalidSchema(String),

    #[error("embedding failed: {0}")]
    EmbeddingFailed(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

/// Error body, shaped `{"detail": "..."}`.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::InvalidSchema(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GatewayError::EmbeddingFailed(_) | GatewayError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message reported to the caller.
    pub fn detail(&self) -> &str {
        match self {
            GatewayError::InvalidRequest(msg)
            | GatewayError::InvalidSchema(msg)
            | GatewayError::EmbeddingFailed(msg)
            | GatewayError::InternalError(msg) => msg,
        }
    }
}

impl From<RankingError> for GatewayError {
    fn from(err: RankingError) -> Self {
        match err {
            RankingError::EmptyCandidates => GatewayError::InvalidRequest(err.to_string()),
            RankingError::Embedding(_) | RankingError::EmbeddingCountMismatch { .. } => {
                GatewayError::EmbeddingFailed(err.to_string())
            }
            RankingError::InvalidTopK => GatewayError::InternalError(err.to_string()),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        let body = Json(ErrorResponse {
            detail: self.detail().to_string(),
        });

        (status, body).into_response()
    }
}
