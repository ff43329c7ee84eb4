//! Hybrid search core
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │          query + mode + options (filters, limit, offset)       │
//! └────────────────────────────────────────────────────────────────┘
//!                                │
//!                                ▼
//!                 CandidateStore::fetch_candidates
//!                                │
//!                     ┌──────────┴───────────┐
//!                     ▼                      ▼
//! ┌──────────────────────────────┐  ┌──────────────────────────────┐
//! │   Keyword (keyword.rs)       │  │   Semantic (semantic.rs)     │
//! │   field substring weights    │  │   embeddings + cosine        │
//! └──────────────────────────────┘  └──────────────────────────────┘
//!                     │                      │
//!                     └──────────┬───────────┘
//!                                ▼
//!                ┌───────────────────────────────┐
//!                │  Weighted fusion (hybrid.rs)  │
//!                └───────────────────────────────┘
//!                                │
//!                                ▼
//!                     ranked page + total count
//! ```

pub mod embeddings;
pub mod engine;
pub mod filters;
pub mod freshness;
pub mod hybrid;
pub mod keyword;
pub mod normalize;
pub mod refresh;
pub mod results;
pub mod semantic;
pub mod similarity;

pub use embeddings::{
    ApiEmbedder, EmbeddingProvider, FallbackEmbedder, build_embedder, rolling_hash,
};
pub use engine::{SearchEngine, SearchMode, SearchOptions};
pub use filters::{CandidateFilter, SearchFilters};
pub use freshness::is_stale;
pub use hybrid::{HybridOptions, WeightedFusionConfig, fuse_results, fuse_with_limit, search_hybrid};
pub use keyword::{KeywordScore, score_skill, search_keyword};
pub use normalize::normalize;
pub use refresh::{RefreshOptions, RefreshReport, refresh_embeddings};
pub use results::{QueryResult, SearchResponse};
pub use semantic::{SemanticOptions, search_semantic};
pub use similarity::cosine_similarity;
