//! Keyword retrieval
//!
//! Case-insensitive substring containment of the query in each display
//! field, with a fixed weight per field, plus a popularity/quality boost.
//! The query is matched exactly as typed (not trimmed, not normalized), so
//! punctuation and surrounding spaces in the query must appear in the field
//! too.

use crate::core::{DisplayField, Skill};
use crate::search::results::{QueryResult, sort_by_score_desc};

/// Per-field score and reason label
pub const fn field_weight(field: DisplayField) -> (f64, &'static str) {
    match field {
        DisplayField::Name => (100.0, "name match"),
        DisplayField::LocalizedName => (90.0, "localized name match"),
        DisplayField::Description => (50.0, "description match"),
        DisplayField::LocalizedDescription => (45.0, "localized description match"),
        DisplayField::Content => (30.0, "content match"),
    }
}

const POPULARITY_BOOST_CAP: f64 = 20.0;
const QUALITY_BOOST_CAP: f64 = 15.0;

/// Boost added to every keyword-scored skill
pub fn boost(skill: &Skill) -> f64 {
    (skill.popularity_score / 10.0).min(POPULARITY_BOOST_CAP)
        + (skill.quality_score * 5.0).min(QUALITY_BOOST_CAP)
}

/// Keyword score breakdown for one skill
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordScore {
    pub score: f64,
    pub reasons: Vec<String>,
}

impl KeywordScore {
    /// True when at least one field contained the query
    pub fn matched(&self) -> bool {
        !self.reasons.is_empty()
    }
}

/// Score one skill. A skill with no field match still gets the boost.
pub fn score_skill(query: &str, skill: &Skill) -> KeywordScore {
    let needle = query.to_lowercase();
    let mut score = 0.0;
    let mut reasons = Vec::new();

    if !needle.trim().is_empty() {
        for field in DisplayField::ALL {
            let Some(text) = skill.field(field) else {
                continue;
            };
            if text.to_lowercase().contains(&needle) {
                let (weight, reason) = field_weight(field);
                score += weight;
                reasons.push(reason.to_string());
            }
        }
    }

    KeywordScore {
        score: score + boost(skill),
        reasons,
    }
}

/// Rank candidates by keyword score, best first; ties keep input order.
///
/// With `require_match`, candidates without any field match are dropped
/// instead of competing on their boost alone.
pub fn search_keyword(query: &str, candidates: &[Skill], require_match: bool) -> Vec<QueryResult> {
    let mut results: Vec<QueryResult> = candidates
        .iter()
        .filter_map(|skill| {
            let scored = score_skill(query, skill);
            if require_match && !scored.matched() {
                return None;
            }
            Some(QueryResult::new(skill.clone(), scored.score, scored.reasons))
        })
        .collect();

    sort_by_score_desc(&mut results);
    tracing::debug!(
        candidates = candidates.len(),
        results = results.len(),
        "keyword path scored"
    );
    results
}
