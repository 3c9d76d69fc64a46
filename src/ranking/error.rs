use thiserror::Error;

use crate::constants::EMPTY_FEATURE_DETAIL;
use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
pub enum RankingError {
    /// No candidates were supplied; nothing can be ranked.
    #[error("{detail}", detail = EMPTY_FEATURE_DETAIL)]
    EmptyCandidates,

    #[error("top_k must be greater than zero")]
    InvalidTopK,

    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("embedder returned {actual} vectors for {expected} texts")]
    EmbeddingCountMismatch { expected: usize, actual: usize },
}

impl RankingError {
    /// Returns `true` when the caller's input is at fault (4xx), `false` for service faults.
    pub fn is_client_error(&self) -> bool {
        matches!(self, RankingError::EmptyCandidates)
    }
}

pub type RankingResult<T> = Result<T, RankingError>;
