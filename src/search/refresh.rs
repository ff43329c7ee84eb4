//! Bulk embedding regeneration
//!
//! Walks the active catalog, re-embeds skills whose stored embedding is
//! stale (or every skill with `force`), and writes the vectors back with a
//! single timestamp. Batches run one after another with a pause between
//! them to stay under external rate limits.

use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::core::Skill;
use crate::error::Result;
use crate::search::embeddings::EmbeddingProvider;
use crate::search::filters::SearchFilters;
use crate::search::freshness::{default_window, is_stale};
use crate::search::normalize::normalize;
use crate::storage::CandidateStore;

#[derive(Debug, Clone)]
pub struct RefreshOptions {
    /// Re-embed fresh skills too
    pub force: bool,
    pub batch_size: usize,
    /// Pause between batches
    pub throttle: StdDuration,
    pub freshness_window: Duration,
    /// Timestamp recorded on every regenerated embedding
    pub now: DateTime<Utc>,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self {
            force: false,
            batch_size: 32,
            throttle: StdDuration::from_millis(250),
            freshness_window: default_window(),
            now: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    /// Active skills examined
    pub scanned: usize,
    pub refreshed: usize,
    /// Skills left alone because their embedding is fresh
    pub skipped: usize,
}

/// Skills that need a new embedding under `options`
pub fn select_for_refresh<'a>(skills: &'a [Skill], options: &RefreshOptions) -> Vec<&'a Skill> {
    skills
        .iter()
        .filter(|skill| options.force || is_stale(skill, options.now, options.freshness_window))
        .collect()
}

/// Regenerate stale embeddings; `on_progress(done, total)` fires after each batch.
///
/// Store failures abort the run; embedding failures cannot happen since the
/// provider degrades to its fallback.
pub async fn refresh_embeddings<S>(
    store: &S,
    embedder: &dyn EmbeddingProvider,
    options: &RefreshOptions,
    on_progress: &mut dyn FnMut(usize, usize),
) -> Result<RefreshReport>
where
    S: CandidateStore + ?Sized,
{
    let candidates = store.fetch_candidates(&SearchFilters::default()).await?;
    let pending = select_for_refresh(&candidates, options);
    let total = pending.len();

    let mut report = RefreshReport {
        scanned: candidates.len(),
        refreshed: 0,
        skipped: candidates.len() - total,
    };
    info!(
        scanned = report.scanned,
        pending = total,
        force = options.force,
        "refreshing embeddings"
    );

    let batch_size = options.batch_size.max(1);
    for (batch_idx, batch) in pending.chunks(batch_size).enumerate() {
        if batch_idx > 0 && !options.throttle.is_zero() {
            tokio::time::sleep(options.throttle).await;
        }

        let texts: Vec<String> = batch
            .iter()
            .map(|skill| normalize(&skill.embedding_text()))
            .collect();
        let vectors = embedder.embed_batch(&texts).await;

        for (skill, vector) in batch.iter().zip(vectors) {
            store.upsert_embedding(&skill.id, &vector, options.now).await?;
            report.refreshed += 1;
        }

        debug!(batch = batch_idx, done = report.refreshed, total, "embedding batch stored");
        on_progress(report.refreshed, total);
    }

    info!(
        refreshed = report.refreshed,
        skipped = report.skipped,
        "embedding refresh complete"
    );
    Ok(report)
}
