//! Semantic retrieval
//!
//! Embeds the query and each candidate's display text, keeps candidates
//! whose cosine similarity is strictly above the threshold, and scores them
//! `similarity * 100`.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::core::Skill;
use crate::search::embeddings::EmbeddingProvider;
use crate::search::freshness::{default_window, is_stale};
use crate::search::normalize::normalize;
use crate::search::results::{QueryResult, sort_by_score_desc};
use crate::search::similarity::cosine_similarity;

pub const SEMANTIC_REASON: &str = "AI semantic match";

#[derive(Debug, Clone)]
pub struct SemanticOptions {
    /// Similarity must be strictly greater than this
    pub threshold: f64,
    /// Reuse a fresh stored embedding instead of embedding the skill text
    pub prefer_cached: bool,
    pub freshness_window: Duration,
    pub now: DateTime<Utc>,
    /// Texts per embedding request
    pub batch_size: usize,
}

impl Default for SemanticOptions {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            prefer_cached: false,
            freshness_window: default_window(),
            now: Utc::now(),
            batch_size: 32,
        }
    }
}

/// Rank candidates by semantic similarity to the query, best first.
pub async fn search_semantic(
    query: &str,
    candidates: &[Skill],
    embedder: &dyn EmbeddingProvider,
    options: &SemanticOptions,
) -> Vec<QueryResult> {
    if candidates.is_empty() {
        return Vec::new();
    }

    let normalized_query = normalize(query);
    let (query_vector, skill_vectors) = tokio::join!(
        embedder.embed(&normalized_query),
        candidate_vectors(candidates, embedder, options)
    );

    let mut results: Vec<QueryResult> = candidates
        .iter()
        .zip(skill_vectors)
        .filter_map(|(skill, vector)| {
            let similarity = cosine_similarity(&query_vector, &vector);
            (similarity > options.threshold).then(|| {
                QueryResult::new(
                    skill.clone(),
                    similarity * 100.0,
                    vec![SEMANTIC_REASON.to_string()],
                )
            })
        })
        .collect();

    sort_by_score_desc(&mut results);
    debug!(
        candidates = candidates.len(),
        results = results.len(),
        embedder = embedder.name(),
        "semantic path scored"
    );
    results
}

/// One vector per candidate, in candidate order.
async fn candidate_vectors(
    candidates: &[Skill],
    embedder: &dyn EmbeddingProvider,
    options: &SemanticOptions,
) -> Vec<Vec<f32>> {
    let mut vectors: Vec<Option<Vec<f32>>> = candidates
        .iter()
        .map(|skill| cached_vector(skill, embedder.dims(), options))
        .collect();

    let pending: Vec<usize> = vectors
        .iter()
        .enumerate()
        .filter_map(|(pos, v)| v.is_none().then_some(pos))
        .collect();

    for chunk in pending.chunks(options.batch_size.max(1)) {
        let texts: Vec<String> = chunk
            .iter()
            .map(|&pos| normalize(&candidates[pos].embedding_text()))
            .collect();
        let embedded = embedder.embed_batch(&texts).await;
        for (&pos, vector) in chunk.iter().zip(embedded) {
            vectors[pos] = Some(vector);
        }
    }

    vectors.into_iter().map(Option::unwrap_or_default).collect()
}

fn cached_vector(skill: &Skill, dims: usize, options: &SemanticOptions) -> Option<Vec<f32>> {
    if !options.prefer_cached || is_stale(skill, options.now, options.freshness_window) {
        return None;
    }
    skill
        .embedding
        .as_ref()
        .filter(|vector| vector.len() == dims)
        .cloned()
}
