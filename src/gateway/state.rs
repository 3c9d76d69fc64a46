use std::sync::Arc;

use crate::embedding::Embedder;
use crate::ranking::{RankingResult, SimilarityRanker};

/// Shared handler state: the ranker and the embedder it owns, loaded once at startup.
pub struct HandlerState<E: Embedder + 'static> {
    pub ranker: Arc<SimilarityRanker<E>>,
}

impl<E: Embedder + 'static> Clone for HandlerState<E> {
    fn clone(&self) -> Self {
        Self {
            ranker: Arc::clone(&self.ranker),
        }
    }
}

impl<E: Embedder + 'static> HandlerState<E> {
    pub fn new(ranker: Arc<SimilarityRanker<E>>) -> Self {
        Self { ranker }
    }

    /// Builds the ranker around `embedder` with the given `top_k`.
    pub fn from_embedder(embedder: E, top_k: usize) -> RankingResult<Self> {
        let ranker = SimilarityRanker::new(embedder, top_k)?;
        Ok(Self::new(Arc::new(ranker)))
    }
}
