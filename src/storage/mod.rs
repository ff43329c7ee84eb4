//! Storage layer
//!
//! The search core only talks to a [`CandidateStore`]: fetch filtered
//! candidates, count substring matches, write back embeddings. SQLite backs
//! the CLI; [`MemoryStore`] serves tests and catalog files searched in place.

pub mod memory;
pub mod migrations;
pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::Skill;
use crate::error::Result;
use crate::search::filters::SearchFilters;

pub use memory::MemoryStore;
pub use sqlite::{Database, SqliteStore};

/// Source of search candidates
#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// All skills passing `filters`, in a stable order.
    async fn fetch_candidates(&self, filters: &SearchFilters) -> Result<Vec<Skill>>;

    /// Number of filtered skills whose display text contains `query`
    /// (case-insensitive substring).
    async fn count_matching(&self, query: &str, filters: &SearchFilters) -> Result<u64>;

    /// Persist a regenerated embedding with its timestamp.
    async fn upsert_embedding(&self, id: &str, vector: &[f32], at: DateTime<Utc>) -> Result<()>;
}

#[async_trait]
impl<T: CandidateStore + ?Sized> CandidateStore for Arc<T> {
    async fn fetch_candidates(&self, filters: &SearchFilters) -> Result<Vec<Skill>> {
        (**self).fetch_candidates(filters).await
    }

    async fn count_matching(&self, query: &str, filters: &SearchFilters) -> Result<u64> {
        (**self).count_matching(query, filters).await
    }

    async fn upsert_embedding(&self, id: &str, vector: &[f32], at: DateTime<Utc>) -> Result<()> {
        (**self).upsert_embedding(id, vector, at).await
    }
}
