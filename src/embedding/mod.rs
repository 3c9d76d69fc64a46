//! Embedding + model utilities.
//!
//! - [`Embedder`] is the seam the ranker depends on.
//! - [`sentence`] provides the BERT sentence encoder used in production.

/// The `Embedder` trait.
pub mod backend;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
/// Sentence encoder (BERT + mean pooling).
pub mod sentence;
/// Tokenizer loading helpers.
pub mod tokenizer;

pub use backend::Embedder;
pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbedder;
pub use sentence::{SENTENCE_EMBEDDING_DIM, SENTENCE_MAX_SEQ_LEN, SentenceConfig, SentenceEmbedder};
