//! Candidate filters
//!
//! Filters narrow the candidate set *before* scoring. They are evaluated
//! by the store (in SQL for [`SqliteStore`](crate::storage::SqliteStore))
//! and, for in-memory candidates, by [`CandidateFilter::matches`].

use serde::{Deserialize, Serialize};

use crate::core::Skill;

/// One pre-scoring constraint on the candidate set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CandidateFilter {
    /// Only skills flagged active
    ActiveOnly,
    /// Skill belongs to at least one of these category slugs
    CategoryIn(Vec<String>),
    /// Skill carries at least one of these tag slugs
    TagIn(Vec<String>),
    /// Popularity at or above the threshold
    MinPopularity(f64),
}

impl CandidateFilter {
    pub fn matches(&self, skill: &Skill) -> bool {
        match self {
            Self::ActiveOnly => skill.is_active,
            Self::CategoryIn(slugs) => slugs.iter().any(|slug| skill.has_category(slug)),
            Self::TagIn(slugs) => slugs.iter().any(|slug| skill.has_tag(slug)),
            Self::MinPopularity(min) => skill.popularity_score >= *min,
        }
    }
}

/// An ordered conjunction of candidate filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    filters: Vec<CandidateFilter>,
}

impl Default for SearchFilters {
    /// Active skills only
    fn default() -> Self {
        Self {
            filters: vec![CandidateFilter::ActiveOnly],
        }
    }
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// No constraints at all, inactive skills included
    pub fn none() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    pub fn with_category(self, slug: impl Into<String>) -> Self {
        self.with(CandidateFilter::CategoryIn(vec![slug.into()]))
    }

    /// Any-match over the given tag slugs; an empty list adds nothing.
    pub fn with_tags(self, tags: Vec<String>) -> Self {
        if tags.is_empty() {
            return self;
        }
        self.with(CandidateFilter::TagIn(tags))
    }

    pub fn with_min_popularity(self, min: f64) -> Self {
        self.with(CandidateFilter::MinPopularity(min))
    }

    pub fn with(mut self, filter: CandidateFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn as_slice(&self) -> &[CandidateFilter] {
        &self.filters
    }

    pub fn iter(&self) -> impl Iterator<Item = &CandidateFilter> {
        self.filters.iter()
    }

    /// True when the skill passes every filter
    pub fn matches(&self, skill: &Skill) -> bool {
        self.filters.iter().all(|f| f.matches(skill))
    }
}
