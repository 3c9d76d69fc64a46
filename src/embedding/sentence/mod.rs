//! Sentence encoder (BERT + tokenizer, mean pooling).
//!
//! Use [`SentenceConfig::stub`] for tests/examples without model files.

/// Sentence encoder configuration.
pub mod config;
pub(crate) mod model;


pub use config::{SENTENCE_EMBEDDING_DIM, SENTENCE_MAX_SEQ_LEN, SentenceConfig};
pub use model::{l2_normalize, mean_pool};

use candle_core::{Device, Tensor};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::embedding::backend::Embedder;
use crate::embedding::device::{device_label, select_device};
use crate::embedding::error::EmbeddingError;
use crate::embedding::tokenizer::load_batch_tokenizer;

use model::SentenceBert;

enum EncoderBackend {
    Model {
        model: Mutex<SentenceBert>,
        tokenizer: tokenizers::Tokenizer,
    },
    Stub,
}

/// Sentence embedding generator (supports stub mode).
pub struct SentenceEmbedder {
    backend: EncoderBackend,
    device: Device,
    embedding_dim: usize,
    max_seq_len: usize,
    normalize: bool,
}

impl std::fmt::Debug for SentenceEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceEmbedder")
            .field(
                "backend",
                &match &self.backend {
                    EncoderBackend::Model { .. } => format!("Model({:?})", self.device),
                    EncoderBackend::Stub => format!("Stub({:?})", self.device),
                },
            )
            .field("embedding_dim", &self.embedding_dim)
            .field("max_seq_len", &self.max_seq_len)
            .finish()
    }
}

impl SentenceEmbedder {
    /// Loads the encoder from a config (stub mode is supported).
    pub fn load(config: SentenceConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;
        let requested_seq_len = config.resolve_max_seq_len()?;

        let device = select_device();
        debug!(?device, "Selected compute device for sentence encoder");

        if config.testing_stub {
            warn!("Sentence encoder running in STUB mode (testing only)");
            return Ok(Self {
                backend: EncoderBackend::Stub,
                device,
                embedding_dim: config.embedding_dim,
                max_seq_len: requested_seq_len,
                normalize: config.normalize,
            });
        }

        let model = SentenceBert::load(&config.config_file(), &config.weights_file(), &device)
            .map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load BERT model: {}", e),
            })?;

        // Positions past the embedding table cannot be encoded.
        let max_seq_len = requested_seq_len.min(model.max_position_embeddings());
        if max_seq_len < requested_seq_len {
            warn!(
                requested = requested_seq_len,
                max_position_embeddings = model.max_position_embeddings(),
                "Token limit exceeds the model's position embeddings, clamping"
            );
        }

        let tokenizer = load_batch_tokenizer(&config.model_dir, max_seq_len).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            }
        })?;

        let embedding_dim = model.hidden_size();

        info!(
            model_dir = %config.model_dir.display(),
            embedding_dim,
            max_seq_len,
            normalize = config.normalize,
            "Sentence encoder loaded"
        );

        Ok(Self {
            backend: EncoderBackend::Model {
                model: Mutex::new(model),
                tokenizer,
            },
            device,
            embedding_dim,
            max_seq_len,
            normalize: config.normalize,
        })
    }

    /// Generates an embedding for a single string.
    pub fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_batch(&[text])?
            .pop()
            .ok_or_else(|| EmbeddingError::InferenceFailed {
                reason: "encoder returned no vector".to_string(),
            })
    }

    /// Generates embeddings for a batch of strings in a single forward pass.
    pub fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        match &self.backend {
            EncoderBackend::Model { model, tokenizer } => {
                self.embed_batch_with_model(texts, model, tokenizer)
            }
            EncoderBackend::Stub => Ok(texts.iter().map(|text| self.embed_stub(text)).collect()),
        }
    }

    fn embed_batch_with_model(
        &self,
        texts: &[&str],
        model: &Mutex<SentenceBert>,
        tokenizer: &tokenizers::Tokenizer,
    ) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let encodings = tokenizer.encode_batch(texts.to_vec(), true).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: e.to_string(),
            }
        })?;

        debug!(
            batch_size = texts.len(),
            seq_len = encodings.first().map(|e| e.get_ids().len()),
            "Encoding batch (transformer forward pass)"
        );

        let mut ids = Vec::with_capacity(encodings.len());
        let mut type_ids = Vec::with_capacity(encodings.len());
        let mut masks = Vec::with_capacity(encodings.len());
        for encoding in &encodings {
            ids.push(Tensor::new(encoding.get_ids(), &self.device)?);
            type_ids.push(Tensor::new(encoding.get_type_ids(), &self.device)?);
            masks.push(Tensor::new(encoding.get_attention_mask(), &self.device)?);
        }

        let input_ids = Tensor::stack(&ids, 0)?;
        let token_type_ids = Tensor::stack(&type_ids, 0)?;
        let attention_mask = Tensor::stack(&masks, 0)?;

        let hidden_states = model
            .lock()
            .forward(&input_ids, &token_type_ids, &attention_mask)
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("Transformer forward pass failed: {}", e),
            })?;

        let mut pooled = mean_pool(&hidden_states, &attention_mask)?;
        if self.normalize {
            pooled = l2_normalize(&pooled)?;
        }

        Ok(pooled.to_vec2::<f32>()?)
    }

    fn embed_stub(&self, text: &str) -> Vec<f32> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let mut state = hasher.finish();

        let mut embedding = Vec::with_capacity(self.embedding_dim);
        for _ in 0..self.embedding_dim {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut embedding {
                *x /= norm;
            }
        }

        embedding
    }

    /// Returns the output embedding dimension.
    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EncoderBackend::Stub)
    }

    /// Token limit applied to each text before encoding.
    pub fn max_seq_len(&self) -> usize {
        self.max_seq_len
    }
}

impl Embedder for SentenceEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        SentenceEmbedder::embed_batch(self, texts)
    }

    fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    fn is_stub(&self) -> bool {
        SentenceEmbedder::is_stub(self)
    }

    fn device_label(&self) -> &'static str {
        device_label(&self.device)
    }
}
