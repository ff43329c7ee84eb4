//! Search facade
//!
//! [`SearchEngine`] ties a [`CandidateStore`], an [`EmbeddingProvider`] and
//! the search configuration together and exposes the three request-level
//! operations: `search`, `generate_embedding` and `is_embedding_stale`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, Instrument};

use crate::config::{Config, SearchConfig};
use crate::core::Skill;
use crate::error::{Result, SmError};
use crate::search::embeddings::EmbeddingProvider;
use crate::search::filters::SearchFilters;
use crate::search::freshness::{default_window, is_stale};
use crate::search::hybrid::{HybridOptions, WeightedFusionConfig, search_hybrid};
use crate::search::keyword::search_keyword;
use crate::search::normalize::is_blank;
use crate::search::results::SearchResponse;
use crate::search::semantic::{SemanticOptions, search_semantic};
use crate::storage::CandidateStore;

/// Retrieval strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Keyword,
    Semantic,
    #[default]
    Hybrid,
}

impl FromStr for SearchMode {
    type Err = SmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "keyword" => Ok(Self::Keyword),
            "semantic" => Ok(Self::Semantic),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(SmError::InvalidQuery(format!(
                "unknown search mode: {other} (expected keyword, semantic or hybrid)"
            ))),
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Keyword => "keyword",
            Self::Semantic => "semantic",
            Self::Hybrid => "hybrid",
        };
        f.write_str(name)
    }
}

/// Paging and pre-filtering for one search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Page size; 0 means the configured default
    pub limit: usize,
    pub offset: usize,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub min_popularity: Option<f64>,
}

impl SearchOptions {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Build from untrusted signed values; negatives clamp to 0.
    pub fn from_raw(limit: i64, offset: i64) -> Self {
        Self {
            limit: usize::try_from(limit.max(0)).unwrap_or(usize::MAX),
            offset: usize::try_from(offset.max(0)).unwrap_or(usize::MAX),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub fn with_category(mut self, slug: impl Into<String>) -> Self {
        self.category = Some(slug.into());
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    #[must_use]
    pub fn with_min_popularity(mut self, min: f64) -> Self {
        self.min_popularity = Some(min);
        self
    }

    /// Page size after applying the default and the cap
    pub fn effective_limit(&self, config: &SearchConfig) -> usize {
        let limit = if self.limit == 0 {
            config.default_limit
        } else {
            self.limit
        };
        limit.clamp(1, config.max_limit.max(1))
    }

    /// Active-only filters plus whatever the caller asked for
    pub fn filters(&self) -> SearchFilters {
        let mut filters = SearchFilters::new();
        if let Some(category) = &self.category {
            filters = filters.with_category(category.clone());
        }
        filters = filters.with_tags(self.tags.clone());
        if let Some(min) = self.min_popularity {
            filters = filters.with_min_popularity(min);
        }
        filters
    }
}

/// Request-level search entry point
pub struct SearchEngine<S> {
    store: S,
    embedder: Arc<dyn EmbeddingProvider>,
    config: SearchConfig,
    freshness_window: Duration,
    batch_size: usize,
}

impl<S: CandidateStore> SearchEngine<S> {
    pub fn new(store: S, embedder: Arc<dyn EmbeddingProvider>, config: SearchConfig) -> Self {
        Self {
            store,
            embedder,
            config,
            freshness_window: default_window(),
            batch_size: 32,
        }
    }

    /// Engine wired from a full config (search section plus embedding freshness/batching).
    pub fn from_config(store: S, embedder: Arc<dyn EmbeddingProvider>, config: &Config) -> Self {
        Self::new(store, embedder, config.search.clone())
            .with_freshness_window(config.embedding.freshness_window())
            .with_batch_size(config.embedding.batch_size)
    }

    #[must_use]
    pub fn with_freshness_window(mut self, window: Duration) -> Self {
        self.freshness_window = window;
        self
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Ranked page of results plus the store's substring match count.
    ///
    /// A blank query returns an empty response without touching the store
    /// or the embedder. Results are ranked over `offset + limit` and the
    /// first `offset` are skipped.
    pub async fn search(
        &self,
        query: &str,
        mode: SearchMode,
        options: &SearchOptions,
    ) -> Result<SearchResponse> {
        if is_blank(query) {
            return Ok(SearchResponse::empty());
        }

        let span = info_span!("search", %mode, limit = options.limit, offset = options.offset);
        async {
            let limit = options.effective_limit(&self.config);
            let window = options.offset.saturating_add(limit);
            let filters = options.filters();

            let (candidates, total) = tokio::try_join!(
                self.store.fetch_candidates(&filters),
                self.store.count_matching(query, &filters)
            )?;
            debug!(candidates = candidates.len(), total, "fetched candidates");

            let ranked = match mode {
                SearchMode::Keyword => {
                    let mut results =
                        search_keyword(query, &candidates, self.config.require_keyword_match);
                    results.truncate(window);
                    results
                }
                SearchMode::Semantic => {
                    let mut results = search_semantic(
                        query,
                        &candidates,
                        self.embedder.as_ref(),
                        &self.semantic_options(Utc::now()),
                    )
                    .await;
                    results.truncate(window);
                    results
                }
                SearchMode::Hybrid => {
                    search_hybrid(
                        query,
                        &candidates,
                        window,
                        self.embedder.as_ref(),
                        &self.hybrid_options(Utc::now()),
                    )
                    .await
                }
            };

            let results = ranked.into_iter().skip(options.offset).collect();
            Ok(SearchResponse { results, total })
        }
        .instrument(span)
        .await
    }

    /// Embed arbitrary text with the configured provider (fallback on failure).
    pub async fn generate_embedding(&self, text: &str) -> Vec<f32> {
        self.embedder.embed(text).await
    }

    pub fn is_embedding_stale(&self, skill: &Skill) -> bool {
        self.is_embedding_stale_at(skill, Utc::now())
    }

    pub fn is_embedding_stale_at(&self, skill: &Skill, now: DateTime<Utc>) -> bool {
        is_stale(skill, now, self.freshness_window)
    }

    fn semantic_options(&self, now: DateTime<Utc>) -> SemanticOptions {
        SemanticOptions {
            threshold: self.config.semantic_threshold,
            prefer_cached: self.config.prefer_cached_embeddings,
            freshness_window: self.freshness_window,
            now,
            batch_size: self.batch_size,
        }
    }

    fn hybrid_options(&self, now: DateTime<Utc>) -> HybridOptions {
        HybridOptions {
            fusion: WeightedFusionConfig::with_weights(
                self.config.keyword_weight,
                self.config.semantic_weight,
            ),
            semantic: self.semantic_options(now),
            require_keyword_match: self.config.require_keyword_match,
        }
    }
}
