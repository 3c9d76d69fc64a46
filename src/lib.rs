//! Shelf library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`SimilarityRanker`], [`RankRequest`], [`Ranking`] - Semantic top-K ranking
//!
//! ## Embedding
//! - [`Embedder`] - Batch text-to-vector seam the ranker depends on
//! - [`SentenceEmbedder`], [`SentenceConfig`] - BERT sentence encoder (or hash stub)
//!
//! ## HTTP
//! - [`gateway::create_app`] - Axum router with CORS, as served by the `shelf` binary
//!
//! ## Test/Mock Support
//! [`MockEmbedder`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod ranking;

pub use config::{Config, ConfigError};
pub use constants::{DEFAULT_TOP_K, EMPTY_FEATURE_DETAIL};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
pub use embedding::{Embedder, EmbeddingError, SentenceConfig, SentenceEmbedder};
pub use gateway::{GatewayError, HandlerState, create_app, create_router_with_state};
pub use ranking::{
    CandidateItem, RankRequest, RankedCandidate, Ranking, RankingError, SimilarityRanker,
    cosine_similarity,
};
