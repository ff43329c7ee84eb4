//! Catalog files
//!
//! A catalog is a JSON or YAML document listing skills, either as a bare
//! list or under a top-level `skills` key. Labels may be plain slugs or
//! `{slug, name}` objects. Entries without an id get a v4 UUID; entries
//! with a blank name are skipped.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::{Label, Skill};
use crate::error::{Result, SmError};
use crate::storage::Database;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Yaml,
}

impl CatalogFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(SmError::UnsupportedCatalog(path.display().to_string())),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<CatalogEntry>),
    Wrapped { skills: Vec<CatalogEntry> },
}

/// One skill as written in a catalog file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub localized_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub localized_description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub popularity_score: f64,
    #[serde(default)]
    pub quality_score: f64,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub categories: Vec<LabelEntry>,
    #[serde(default)]
    pub tags: Vec<LabelEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelEntry {
    Slug(String),
    Full {
        slug: String,
        #[serde(default)]
        name: Option<String>,
    },
}

impl From<LabelEntry> for Label {
    fn from(entry: LabelEntry) -> Self {
        match entry {
            LabelEntry::Slug(slug) => Label::new(slug.clone(), slug),
            LabelEntry::Full { slug, name } => {
                let name = name.unwrap_or_else(|| slug.clone());
                Label::new(slug, name)
            }
        }
    }
}

impl CatalogEntry {
    /// Convert to a skill, `None` when the name is blank.
    pub fn into_skill(self) -> Option<Skill> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return None;
        }
        let id = self
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Some(Skill {
            id,
            name,
            localized_name: self.localized_name,
            description: self.description,
            localized_description: self.localized_description,
            content: self.content,
            popularity_score: self.popularity_score,
            quality_score: self.quality_score,
            embedding: None,
            embedding_updated_at: None,
            is_active: self.is_active.unwrap_or(true),
            categories: self.categories.into_iter().map(Label::from).collect(),
            tags: self.tags.into_iter().map(Label::from).collect(),
        })
    }
}

/// Parsed catalog contents
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub skills: Vec<Skill>,
    /// Entries dropped for a blank name
    pub skipped: usize,
}

pub fn parse_catalog(raw: &str, format: CatalogFormat) -> Result<Catalog> {
    let document: CatalogDocument = match format {
        CatalogFormat::Json => serde_json::from_str(raw)
            .map_err(|err| SmError::Catalog(format!("invalid JSON catalog: {err}")))?,
        CatalogFormat::Yaml => serde_yaml::from_str(raw)
            .map_err(|err| SmError::Catalog(format!("invalid YAML catalog: {err}")))?,
    };

    let entries = match document {
        CatalogDocument::List(entries) | CatalogDocument::Wrapped { skills: entries } => entries,
    };

    let mut catalog = Catalog::default();
    for (idx, entry) in entries.into_iter().enumerate() {
        match entry.into_skill() {
            Some(skill) => catalog.skills.push(skill),
            None => {
                warn!(entry = idx, "skipping catalog entry with blank name");
                catalog.skipped += 1;
            }
        }
    }
    Ok(catalog)
}

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let format = CatalogFormat::from_path(path)?;
    let raw = std::fs::read_to_string(path)?;
    parse_catalog(&raw, format)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}

/// Load a catalog file and upsert every valid entry.
pub fn import_catalog(db: &Database, path: &Path) -> Result<ImportReport> {
    let catalog = load_catalog(path)?;
    for skill in &catalog.skills {
        db.upsert_skill(skill)?;
    }

    let report = ImportReport {
        imported: catalog.skills.len(),
        skipped: catalog.skipped,
    };
    info!(
        path = %path.display(),
        imported = report.imported,
        skipped = report.skipped,
        "catalog imported"
    );
    Ok(report)
}
