//! Candidate store doubles.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::Skill;
use crate::error::{Result, SmError};
use crate::search::filters::SearchFilters;
use crate::storage::CandidateStore;

/// Wraps a store and counts calls per operation.
#[derive(Debug, Default)]
pub struct RecordingStore<S> {
    inner: S,
    fetches: AtomicUsize,
    counts: AtomicUsize,
    upserts: AtomicUsize,
}

impl<S> RecordingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            fetches: AtomicUsize::new(0),
            counts: AtomicUsize::new(0),
            upserts: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn counts(&self) -> usize {
        self.counts.load(Ordering::SeqCst)
    }

    pub fn upserts(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.fetches() + self.counts() + self.upserts()
    }
}

#[async_trait]
impl<S: CandidateStore> CandidateStore for RecordingStore<S> {
    async fn fetch_candidates(&self, filters: &SearchFilters) -> Result<Vec<Skill>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_candidates(filters).await
    }

    async fn count_matching(&self, query: &str, filters: &SearchFilters) -> Result<u64> {
        self.counts.fetch_add(1, Ordering::SeqCst);
        self.inner.count_matching(query, filters).await
    }

    async fn upsert_embedding(&self, id: &str, vector: &[f32], at: DateTime<Utc>) -> Result<()> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        self.inner.upsert_embedding(id, vector, at).await
    }
}

/// Every operation fails with a storage error.
#[derive(Debug, Default)]
pub struct FailingStore;

#[async_trait]
impl CandidateStore for FailingStore {
    async fn fetch_candidates(&self, _filters: &SearchFilters) -> Result<Vec<Skill>> {
        Err(SmError::Database(rusqlite::Error::InvalidQuery))
    }

    async fn count_matching(&self, _query: &str, _filters: &SearchFilters) -> Result<u64> {
        Err(SmError::Database(rusqlite::Error::InvalidQuery))
    }

    async fn upsert_embedding(&self, id: &str, _vector: &[f32], _at: DateTime<Utc>) -> Result<()> {
        Err(SmError::SkillNotFound(id.to_string()))
    }
}
