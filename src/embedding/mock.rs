//! In-memory embedder for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;

use super::backend::Embedder;
use super::error::EmbeddingError;

/// Embedder with a fixed text-to-vector table.
///
/// Texts without an entry get a deterministic vector derived from the text, so
/// identical texts always embed identically.
pub struct MockEmbedder {
    dim: usize,
    vectors: RwLock<HashMap<String, Vec<f32>>>,
    failure: RwLock<Option<String>>,
    calls: AtomicUsize,
    texts_seen: AtomicUsize,
}

impl MockEmbedder {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            vectors: RwLock::new(HashMap::new()),
            failure: RwLock::new(None),
            calls: AtomicUsize::new(0),
            texts_seen: AtomicUsize::new(0),
        }
    }

    /// Pins the vector returned for `text`.
    pub fn with_vector(self, text: &str, vector: Vec<f32>) -> Self {
        self.insert(text, vector);
        self
    }

    pub fn insert(&self, text: &str, vector: Vec<f32>) {
        self.vectors.write().insert(text.to_string(), vector);
    }

    /// Makes every subsequent call fail with `reason`.
    pub fn fail_with(&self, reason: &str) {
        *self.failure.write() = Some(reason.to_string());
    }

    /// Number of `embed_batch` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of texts embedded across all calls.
    pub fn texts_seen(&self) -> usize {
        self.texts_seen.load(Ordering::SeqCst)
    }

    fn fallback_vector(&self, text: &str) -> Vec<f32> {
        let mut state = text
            .bytes()
            .fold(0xcbf29ce484222325u64, |h, b| (h ^ b as u64).wrapping_mul(0x100000001b3));

        (0..self.dim)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
                ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0
            })
            .collect()
    }
}

impl Embedder for MockEmbedder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts_seen.fetch_add(texts.len(), Ordering::SeqCst);

        if let Some(reason) = self.failure.read().clone() {
            return Err(EmbeddingError::InferenceFailed { reason });
        }

        let vectors = self.vectors.read();
        Ok(texts
            .iter()
            .map(|text| {
                vectors
                    .get(*text)
                    .cloned()
                    .unwrap_or_else(|| self.fallback_vector(text))
            })
            .collect())
    }

    fn embedding_dim(&self) -> usize {
        self.dim
    }

    fn is_stub(&self) -> bool {
        true
    }
}
