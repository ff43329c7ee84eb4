//! In-process candidate store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::core::Skill;
use crate::error::{Result, SmError};
use crate::search::filters::SearchFilters;
use crate::search::keyword::score_skill;
use crate::storage::CandidateStore;

/// Skills held in insertion order behind a lock
#[derive(Debug, Default)]
pub struct MemoryStore {
    skills: RwLock<Vec<Skill>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list; later duplicates replace earlier ones in place.
    pub fn from_skills(skills: impl IntoIterator<Item = Skill>) -> Self {
        let store = Self::new();
        for skill in skills {
            store.insert(skill);
        }
        store
    }

    /// Insert or replace by id
    pub fn insert(&self, skill: Skill) {
        let mut skills = self.skills.write();
        match skills.iter_mut().find(|s| s.id == skill.id) {
            Some(existing) => *existing = skill,
            None => skills.push(skill),
        }
    }

    pub fn get(&self, id: &str) -> Option<Skill> {
        self.skills.read().iter().find(|s| s.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.skills.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.read().is_empty()
    }

    pub fn snapshot(&self) -> Vec<Skill> {
        self.skills.read().clone()
    }
}

#[async_trait]
impl CandidateStore for MemoryStore {
    async fn fetch_candidates(&self, filters: &SearchFilters) -> Result<Vec<Skill>> {
        Ok(self
            .skills
            .read()
            .iter()
            .filter(|s| filters.matches(s))
            .cloned()
            .collect())
    }

    async fn count_matching(&self, query: &str, filters: &SearchFilters) -> Result<u64> {
        if query.trim().is_empty() {
            return Ok(0);
        }
        let count = self
            .skills
            .read()
            .iter()
            .filter(|s| filters.matches(s) && score_skill(query, s).matched())
            .count();
        Ok(count as u64)
    }

    async fn upsert_embedding(&self, id: &str, vector: &[f32], at: DateTime<Utc>) -> Result<()> {
        let mut skills = self.skills.write();
        let skill = skills
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| SmError::SkillNotFound(id.to_string()))?;
        skill.embedding = Some(vector.to_vec());
        skill.embedding_updated_at = Some(at);
        Ok(())
    }
}
