//! Embedding freshness policy

use chrono::{DateTime, Duration, Utc};

use crate::core::Skill;

/// Default freshness window
pub const DEFAULT_FRESHNESS_DAYS: i64 = 7;

pub fn default_window() -> Duration {
    Duration::days(DEFAULT_FRESHNESS_DAYS)
}

/// True when the skill's embedding should be regenerated.
///
/// Missing vector or timestamp counts as stale. Otherwise stale only when
/// strictly older than `window`; exactly `window` old is still fresh.
/// Stale embeddings remain usable for search.
pub fn is_stale(skill: &Skill, now: DateTime<Utc>, window: Duration) -> bool {
    match (&skill.embedding, skill.embedding_updated_at) {
        (Some(vector), Some(updated_at)) if !vector.is_empty() => now - updated_at > window,
        _ => true,
    }
}
