//! Scored results returned by the retrieval paths

use serde::{Deserialize, Serialize};

use crate::core::Skill;

/// A skill with its path-specific score and why it matched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub skill: Skill,
    /// Non-negative; scale depends on the producing path
    pub score: f64,
    pub match_reasons: Vec<String>,
}

impl QueryResult {
    pub fn new(skill: Skill, score: f64, match_reasons: Vec<String>) -> Self {
        Self {
            skill,
            score,
            match_reasons,
        }
    }

    pub fn id(&self) -> &str {
        &self.skill.id
    }
}

/// One page of ranked results plus the store's match count
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<QueryResult>,
    /// Substring match count from the store, independent of `results`
    pub total: u64,
}

impl SearchResponse {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Sort by descending score. Stable, so equal scores keep input order.
pub(crate) fn sort_by_score_desc(results: &mut [QueryResult]) {
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
}
