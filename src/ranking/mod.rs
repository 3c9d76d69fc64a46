//! Semantic similarity ranking.
//!
//! A [`SimilarityRanker`] embeds the query together with every candidate text in a
//! single [`Embedder`](crate::embedding::Embedder) call, scores each candidate by
//! cosine similarity to the query, and keeps the top K by descending score.
//!
//! There is no index: every request is a full scan over the candidates it carries.

pub mod error;
pub mod ranker;
pub mod similarity;
pub mod types;


pub use error::{RankingError, RankingResult};
pub use ranker::{SimilarityRanker, select_top_k};
pub use similarity::cosine_similarity;
pub use types::{CandidateItem, RankRequest, RankedCandidate, Ranking};
