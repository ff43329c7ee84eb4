//! Weighted score fusion for hybrid search
//!
//! Combines keyword and semantic results by linear weighting of their raw
//! scores:
//!
//! ```text
//! hybrid(d) = keyword_weight * keyword(d) + semantic_weight * semantic(d)
//! ```
//!
//! A skill missing from one path contributes 0 for that path. Match reasons
//! are concatenated, keyword reasons first.

use std::collections::HashMap;

use crate::core::Skill;
use crate::search::embeddings::EmbeddingProvider;
use crate::search::keyword::search_keyword;
use crate::search::results::{QueryResult, sort_by_score_desc};
use crate::search::semantic::{SemanticOptions, search_semantic};

/// Fusion weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedFusionConfig {
    pub keyword_weight: f64,
    pub semantic_weight: f64,
}

impl Default for WeightedFusionConfig {
    fn default() -> Self {
        Self {
            keyword_weight: 0.6,
            semantic_weight: 0.4,
        }
    }
}

impl WeightedFusionConfig {
    pub fn with_weights(keyword_weight: f64, semantic_weight: f64) -> Self {
        Self {
            keyword_weight,
            semantic_weight,
        }
    }
}

/// Merge keyword and semantic results by skill id.
///
/// Output is sorted by fused score (descending). Ties keep first-seen order,
/// keyword results before semantic-only ones.
pub fn fuse_results(
    keyword: Vec<QueryResult>,
    semantic: Vec<QueryResult>,
    config: &WeightedFusionConfig,
) -> Vec<QueryResult> {
    let mut merged: Vec<QueryResult> = Vec::with_capacity(keyword.len() + semantic.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for result in keyword {
        let weighted = result.score * config.keyword_weight;
        match positions.get(result.id()) {
            Some(&pos) => {
                merged[pos].score += weighted;
                merged[pos].match_reasons.extend(result.match_reasons);
            }
            None => {
                positions.insert(result.skill.id.clone(), merged.len());
                merged.push(QueryResult {
                    score: weighted,
                    ..result
                });
            }
        }
    }

    for result in semantic {
        let weighted = result.score * config.semantic_weight;
        match positions.get(result.id()) {
            Some(&pos) => {
                merged[pos].score += weighted;
                merged[pos].match_reasons.extend(result.match_reasons);
            }
            None => {
                positions.insert(result.skill.id.clone(), merged.len());
                merged.push(QueryResult {
                    score: weighted,
                    ..result
                });
            }
        }
    }

    sort_by_score_desc(&mut merged);
    merged
}

/// Fuse and keep the best `limit`
pub fn fuse_with_limit(
    keyword: Vec<QueryResult>,
    semantic: Vec<QueryResult>,
    config: &WeightedFusionConfig,
    limit: usize,
) -> Vec<QueryResult> {
    let mut results = fuse_results(keyword, semantic, config);
    results.truncate(limit);
    results
}

/// Options for one hybrid search
#[derive(Debug, Clone, Default)]
pub struct HybridOptions {
    pub fusion: WeightedFusionConfig,
    pub semantic: SemanticOptions,
    pub require_keyword_match: bool,
}

/// Run both paths concurrently over `2 * limit`, then fuse down to `limit`.
pub async fn search_hybrid(
    query: &str,
    candidates: &[Skill],
    limit: usize,
    embedder: &dyn EmbeddingProvider,
    options: &HybridOptions,
) -> Vec<QueryResult> {
    let path_limit = limit.saturating_mul(2);

    let keyword_path = async {
        let mut results = search_keyword(query, candidates, options.require_keyword_match);
        results.truncate(path_limit);
        results
    };
    let semantic_path = async {
        let mut results = search_semantic(query, candidates, embedder, &options.semantic).await;
        results.truncate(path_limit);
        results
    };

    let (keyword, semantic) = tokio::join!(keyword_path, semantic_path);
    tracing::debug!(
        keyword = keyword.len(),
        semantic = semantic.len(),
        limit,
        "fusing hybrid results"
    );
    fuse_with_limit(keyword, semantic, &options.fusion, limit)
}
