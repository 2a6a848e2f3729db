//! Capabilities the engine consumes but does not implement.

/// Text → fixed-length vector. Implementations must be deterministic for a
/// given `model_id` and always return `dim()` values.
pub trait Embedder: Send + Sync {
    /// Stable identifier recorded as `embedding_model` on rebuilt entries.
    fn model_id(&self) -> &str;
    fn dim(&self) -> usize;
    fn embed_text(&self, text: &str) -> anyhow::Result<Vec<f32>>;

    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed_text(t)).collect()
    }
}

/// Content digest used for staleness detection.
pub trait ContentHasher: Send + Sync {
    fn digest(&self, text: &str) -> String;
}
