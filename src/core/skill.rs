//! Skill data structure
//!
//! A [`Skill`] is the unit the search core ranks. Display fields are the
//! text the keyword path matches against; the first four of them also make
//! up the text the semantic path embeds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification label (category or tag) with a stable slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub slug: String,
    #[serde(default)]
    pub name: String,
}

impl Label {
    pub fn new(slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
        }
    }
}

/// Text fields eligible for keyword matching, in match-priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayField {
    Name,
    LocalizedName,
    Description,
    LocalizedDescription,
    Content,
}

impl DisplayField {
    pub const ALL: [Self; 5] = [
        Self::Name,
        Self::LocalizedName,
        Self::Description,
        Self::LocalizedDescription,
        Self::Content,
    ];
}

/// A searchable skill record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    /// Stable unique identifier
    pub id: String,
    /// Primary (English) name
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localized_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localized_description: Option<String>,
    /// Long-form body (README / SKILL.md content)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// External popularity signal, e.g. star count
    #[serde(default)]
    pub popularity_score: f64,
    /// Average rating 0..5, 0 when unrated
    #[serde(default)]
    pub quality_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_updated_at: Option<DateTime<Utc>>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub categories: Vec<Label>,
    #[serde(default)]
    pub tags: Vec<Label>,
}

fn default_active() -> bool {
    true
}

impl Skill {
    /// Create an active skill with the given ID and name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            localized_name: None,
            description: None,
            localized_description: None,
            content: None,
            popularity_score: 0.0,
            quality_score: 0.0,
            embedding: None,
            embedding_updated_at: None,
            is_active: true,
            categories: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_localized(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.localized_name = Some(name.into());
        self.localized_description = Some(description.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_scores(mut self, popularity: f64, quality: f64) -> Self {
        self.popularity_score = popularity;
        self.quality_score = quality;
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>, updated_at: DateTime<Utc>) -> Self {
        self.embedding = Some(embedding);
        self.embedding_updated_at = Some(updated_at);
        self
    }

    pub fn with_category(mut self, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        self.categories.push(Label::new(slug.clone(), slug));
        self
    }

    pub fn with_tag(mut self, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        self.tags.push(Label::new(slug.clone(), slug));
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Text of a display field, `None` when absent or empty
    pub fn field(&self, field: DisplayField) -> Option<&str> {
        let value = match field {
            DisplayField::Name => Some(self.name.as_str()),
            DisplayField::LocalizedName => self.localized_name.as_deref(),
            DisplayField::Description => self.description.as_deref(),
            DisplayField::LocalizedDescription => self.localized_description.as_deref(),
            DisplayField::Content => self.content.as_deref(),
        };
        value.filter(|v| !v.is_empty())
    }

    /// Text the semantic path embeds for this skill (before normalization).
    ///
    /// Name, localized name, description and localized description joined
    /// by single spaces; long-form content is not included.
    pub fn embedding_text(&self) -> String {
        [
            DisplayField::Name,
            DisplayField::LocalizedName,
            DisplayField::Description,
            DisplayField::LocalizedDescription,
        ]
        .into_iter()
        .filter_map(|field| self.field(field))
        .collect::<Vec<_>>()
        .join(" ")
    }

    pub fn has_category(&self, slug: &str) -> bool {
        self.categories.iter().any(|c| c.slug == slug)
    }

    pub fn has_tag(&self, slug: &str) -> bool {
        self.tags.iter().any(|t| t.slug == slug)
    }
}
