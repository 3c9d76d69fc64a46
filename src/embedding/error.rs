use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading the sentence encoder or embedding text.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// `SHELF_MODEL_PATH` (or an explicit config) points at no directory.
    #[error("sentence encoder directory not found: {path}")]
    ModelNotFound { path: PathBuf },

    /// The encoder directory lacks one of the files it needs.
    #[error("{file} missing from sentence encoder directory {model_dir}")]
    MissingModelFile {
        file: &'static str,
        model_dir: PathBuf,
    },

    #[error("failed to load sentence encoder: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("invalid sentence encoder configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("tokenization failed: {reason}")]
    TokenizationFailed { reason: String },

    /// Forward pass, pooling, or a test double refused the batch.
    #[error("embedding inference failed: {reason}")]
    InferenceFailed { reason: String },
}

// Tensor errors only surface once a model is loaded, so they count as inference failures.
impl From<candle_core::Error> for EmbeddingError {
    fn from(err: candle_core::Error) -> Self {
        EmbeddingError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}
