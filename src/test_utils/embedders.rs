//! Embedding provider doubles.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::search::embeddings::EmbeddingProvider;
use crate::search::normalize::normalize;

/// Returns fixed vectors keyed by normalized text; unknown text embeds to zeros.
#[derive(Debug, Default)]
pub struct StubEmbedder {
    dims: usize,
    vectors: HashMap<String, Vec<f32>>,
    single_calls: AtomicUsize,
    batch_calls: AtomicUsize,
}

impl StubEmbedder {
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        assert_eq!(vector.len(), self.dims, "stub vector for {text:?} has wrong dims");
        self.vectors.insert(normalize(text), vector);
        self
    }

    pub fn single_calls(&self) -> usize {
        self.single_calls.load(Ordering::SeqCst)
    }

    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    fn lookup(&self, text: &str) -> Vec<f32> {
        self.vectors
            .get(&normalize(text))
            .cloned()
            .unwrap_or_else(|| vec![0.0; self.dims])
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, text: &str) -> Vec<f32> {
        self.single_calls.fetch_add(1, Ordering::SeqCst);
        self.lookup(text)
    }

    async fn embed_batch(&self, texts: &[String]) -> Vec<Vec<f32>> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        texts.iter().map(|t| self.lookup(t)).collect()
    }

    fn dims(&self) -> usize {
        self.dims
    }

    fn name(&self) -> &str {
        "stub"
    }
}
