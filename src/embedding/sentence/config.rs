use std::path::PathBuf;

use serde::Deserialize;

use crate::embedding::error::EmbeddingError;

/// Default output dimension (used by stub mode; model mode reports `hidden_size`).
pub const SENTENCE_EMBEDDING_DIM: usize = crate::constants::DEFAULT_EMBEDDING_DIM;

/// Max tokens per text when neither the caller nor the model directory sets one.
pub const SENTENCE_MAX_SEQ_LEN: usize = crate::constants::DEFAULT_MAX_SEQ_LEN;

/// Files a model directory must contain.
pub const MODEL_CONFIG_FILE: &str = "config.json";
pub const MODEL_WEIGHTS_FILE: &str = "model.safetensors";
pub const MODEL_TOKENIZER_FILE: &str = "tokenizer.json";

/// Optional sentence-transformers metadata carrying `max_seq_length`.
pub const SENTENCE_BERT_CONFIG_FILE: &str = "sentence_bert_config.json";

#[derive(Debug, Deserialize)]
struct SentenceBertConfig {
    max_seq_length: Option<usize>,
}

#[derive(Debug, Clone)]
/// Configuration for [`SentenceEmbedder`](super::SentenceEmbedder).
pub struct SentenceConfig {
    /// Directory holding `config.json`, `model.safetensors` and `tokenizer.json`.
    pub model_dir: PathBuf,
    /// Max tokens per text. `None` defers to `sentence_bert_config.json`, then
    /// [`SENTENCE_MAX_SEQ_LEN`].
    pub max_seq_len: Option<usize>,
    /// Output dimension in stub mode.
    pub embedding_dim: usize,
    /// L2-normalize pooled vectors.
    pub normalize: bool,
    /// If true, run in deterministic stub mode (no model files required).
    pub testing_stub: bool,
}

impl Default for SentenceConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::new(),
            max_seq_len: None,
            embedding_dim: SENTENCE_EMBEDDING_DIM,
            normalize: true,
            testing_stub: false,
        }
    }
}

impl SentenceConfig {
    /// Creates a config for a sentence-transformers style model directory.
    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: model_dir.into(),
            ..Default::default()
        }
    }

    /// Creates a stub config (no model files; produces deterministic embeddings).
    pub fn stub() -> Self {
        Self {
            testing_stub: true,
            ..Default::default()
        }
    }

    pub fn with_max_seq_len(mut self, max_seq_len: usize) -> Self {
        self.max_seq_len = Some(max_seq_len);
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Validates required fields and files for non-stub mode.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.max_seq_len == Some(0) {
            return Err(EmbeddingError::InvalidConfig {
                reason: "max_seq_len must be greater than zero".to_string(),
            });
        }

        if self.testing_stub {
            if self.embedding_dim == 0 {
                return Err(EmbeddingError::InvalidConfig {
                    reason: "embedding_dim must be greater than zero".to_string(),
                });
            }
            return Ok(());
        }

        if self.model_dir.as_os_str().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model_dir is required (stubbing is disabled)".to_string(),
            });
        }

        if !self.model_dir.is_dir() {
            return Err(EmbeddingError::ModelNotFound {
                path: self.model_dir.clone(),
            });
        }

        for file in [MODEL_CONFIG_FILE, MODEL_WEIGHTS_FILE, MODEL_TOKENIZER_FILE] {
            if !self.model_dir.join(file).is_file() {
                return Err(EmbeddingError::MissingModelFile {
                    file,
                    model_dir: self.model_dir.clone(),
                });
            }
        }

        Ok(())
    }

    pub fn config_file(&self) -> PathBuf {
        self.model_dir.join(MODEL_CONFIG_FILE)
    }

    pub fn weights_file(&self) -> PathBuf {
        self.model_dir.join(MODEL_WEIGHTS_FILE)
    }

    /// Token limit applied to every text.
    ///
    /// An explicit [`with_max_seq_len`](Self::with_max_seq_len) wins; otherwise the
    /// model directory's `sentence_bert_config.json` decides, as sentence-transformers
    /// does. Falls back to [`SENTENCE_MAX_SEQ_LEN`].
    pub fn resolve_max_seq_len(&self) -> Result<usize, EmbeddingError> {
        if let Some(max_seq_len) = self.max_seq_len {
            return Ok(max_seq_len);
        }
        if self.testing_stub {
            return Ok(SENTENCE_MAX_SEQ_LEN);
        }

        let path = self.model_dir.join(SENTENCE_BERT_CONFIG_FILE);
        if !path.is_file() {
            return Ok(SENTENCE_MAX_SEQ_LEN);
        }

        let content = std::fs::read_to_string(&path).map_err(|e| EmbeddingError::InvalidConfig {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        let parsed: SentenceBertConfig =
            serde_json::from_str(&content).map_err(|e| EmbeddingError::InvalidConfig {
                reason: format!("failed to parse {}: {}", path.display(), e),
            })?;

        match parsed.max_seq_length {
            Some(0) => Err(EmbeddingError::InvalidConfig {
                reason: format!("max_seq_length in {} must be greater than zero", path.display()),
            }),
            Some(max_seq_len) => Ok(max_seq_len),
            None => Ok(SENTENCE_MAX_SEQ_LEN),
        }
    }
}
