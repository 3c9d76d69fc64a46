use std::cmp::Ordering;
use tracing::{debug, info};

use crate::embedding::Embedder;

use super::error::{RankingError, RankingResult};
use super::similarity::cosine_similarity;
use super::types::{RankRequest, RankedCandidate, Ranking};

/// Brute-force semantic ranker over a per-request candidate list.
pub struct SimilarityRanker<E: Embedder> {
    embedder: E,
    top_k: usize,
}

impl<E: Embedder> std::fmt::Debug for SimilarityRanker<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimilarityRanker")
            .field("top_k", &self.top_k)
            .field("embedding_dim", &self.embedder.embedding_dim())
            .field("stub", &self.embedder.is_stub())
            .finish()
    }
}

impl<E: Embedder> SimilarityRanker<E> {
    pub fn new(embedder: E, top_k: usize) -> RankingResult<Self> {
        if top_k == 0 {
            return Err(RankingError::InvalidTopK);
        }
        Ok(Self { embedder, top_k })
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Ranks with the configured `top_k`.
    pub fn rank(&self, request: &RankRequest) -> RankingResult<Ranking> {
        self.rank_top_k(request, self.top_k)
    }

    /// Returns the `min(k, N)` best candidates, best first. Ties keep request order.
    pub fn rank_top_k(&self, request: &RankRequest, k: usize) -> RankingResult<Ranking> {
        if k == 0 {
            return Err(RankingError::InvalidTopK);
        }

        let scored = self.score_candidates(request)?;
        let top = select_top_k(scored, k);

        info!(
            candidates = request.len(),
            returned = top.len(),
            top_score = top.first().map(|c| c.score),
            "Ranking complete"
        );

        Ok(Ranking::new(top, request.len()))
    }

    /// Scores every candidate against the query, in request order.
    ///
    /// The query and all candidate texts go to the embedder as one batch.
    pub fn score_candidates(&self, request: &RankRequest) -> RankingResult<Vec<RankedCandidate>> {
        let texts = request.texts();
        let embeddings = self.embedder.embed_batch(&texts)?;

        if embeddings.len() != texts.len() {
            return Err(RankingError::EmbeddingCountMismatch {
                expected: texts.len(),
                actual: embeddings.len(),
            });
        }

        let Some((query_embedding, candidate_embeddings)) = embeddings.split_first() else {
            return Err(RankingError::EmbeddingCountMismatch {
                expected: texts.len(),
                actual: 0,
            });
        };

        let scored = request
            .candidates()
            .iter()
            .zip(candidate_embeddings)
            .enumerate()
            .map(|(index, (candidate, embedding))| {
                let score = cosine_similarity(query_embedding, embedding);
                debug!(
                    isbn = candidate.identifier,
                    summary = %candidate.text,
                    score,
                    "Candidate similarity"
                );
                RankedCandidate {
                    identifier: candidate.identifier,
                    index,
                    score,
                }
            })
            .collect();

        Ok(scored)
    }
}

/// Stable descending sort by score, truncated to `k`.
pub fn select_top_k(mut scored: Vec<RankedCandidate>, k: usize) -> Vec<RankedCandidate> {
    scored.sort_by(|a, b| compare_scores_desc(a.score, b.score));
    scored.truncate(k);
    scored
}

// NaN sorts last; 0.0 and -0.0 tie.
fn compare_scores_desc(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
