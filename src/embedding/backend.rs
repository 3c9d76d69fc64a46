use super::error::EmbeddingError;

/// Text-to-vector capability consumed by the ranker.
///
/// Implementations must return exactly one vector per input text, in input order.
/// The ranker only holds a shared reference, so implementations that are not
/// internally thread-safe must serialize access themselves.
pub trait Embedder: Send + Sync {
    /// Embeds every text in one call.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Dimension of every returned vector.
    fn embedding_dim(&self) -> usize;

    /// Returns `true` when vectors are synthetic rather than model output.
    fn is_stub(&self) -> bool {
        false
    }

    /// Short name of the compute device, for readiness reporting.
    fn device_label(&self) -> &'static str {
        "cpu"
    }
}

impl<E: Embedder + ?Sized> Embedder for std::sync::Arc<E> {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        (**self).embed_batch(texts)
    }

    fn embedding_dim(&self) -> usize {
        (**self).embedding_dim()
    }

    fn is_stub(&self) -> bool {
        (**self).is_stub()
    }

    fn device_label(&self) -> &'static str {
        (**self).device_label()
    }
}
