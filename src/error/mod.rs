//! Error handling for skillmart.
//!
//! This module provides:
//! - [`SmError`]: The main error enum for all skillmart operations
//! - [`ErrorCode`]: Standardized error codes for machine parsing
//! - [`StructuredError`]: Error payload for `--json` output

mod codes;

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use codes::ErrorCode;

/// Main error type for skillmart operations.
#[derive(Error, Debug)]
pub enum SmError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Skill not found: {0}")]
    SkillNotFound(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Unsupported catalog format: {0}")]
    UnsupportedCatalog(String),

    #[error("Invalid search request: {0}")]
    InvalidQuery(String),

    #[error("Embedding service error: {0}")]
    Embedding(String),

    #[error("Embedding service timed out after {0}s")]
    EmbeddingTimeout(u64),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing required config: {0}")]
    MissingConfig(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SmError {
    /// Get the error code for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) | Self::Yaml(_) | Self::Serialization(_) => ErrorCode::SerializationError,
            Self::SkillNotFound(_) => ErrorCode::SkillNotFound,
            Self::Catalog(_) => ErrorCode::CatalogParseError,
            Self::UnsupportedCatalog(_) => ErrorCode::CatalogUnsupported,
            Self::InvalidQuery(_) => ErrorCode::SearchQueryInvalid,
            Self::Embedding(_) => ErrorCode::EmbeddingUnavailable,
            Self::EmbeddingTimeout(_) => ErrorCode::EmbeddingTimeout,
            Self::Config(_) => ErrorCode::ConfigInvalid,
            Self::MissingConfig(_) => ErrorCode::ConfigMissingRequired,
            Self::Migration(_) => ErrorCode::MigrationFailed,
        }
    }

    /// Get context information for this error as JSON.
    #[must_use]
    pub fn context(&self) -> Option<Value> {
        match self {
            Self::SkillNotFound(id) => Some(serde_json::json!({ "skill_id": id })),
            Self::MissingConfig(key) => Some(serde_json::json!({ "config_key": key })),
            Self::EmbeddingTimeout(secs) => Some(serde_json::json!({ "timeout_secs": secs })),
            _ => None,
        }
    }

    /// Convert this error to a structured error.
    #[must_use]
    pub fn to_structured(&self) -> StructuredError {
        StructuredError::from_sm_error(self)
    }
}

/// A structured error with machine-readable code, suggestion, and context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// The error code (e.g., "SKILL_NOT_FOUND")
    pub code: ErrorCode,

    /// The numeric error code (e.g., 101)
    pub numeric_code: u16,

    /// Human-readable error message
    pub message: String,

    /// Actionable suggestion for recovery
    pub suggestion: String,

    /// Additional context for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    /// Whether this error is potentially recoverable by the user
    pub recoverable: bool,

    /// Error category (e.g., "skill", "config", "storage")
    pub category: String,
}

impl StructuredError {
    /// Create a new structured error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            numeric_code: code.numeric(),
            suggestion: code.suggestion().to_string(),
            context: None,
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
            code,
            message: message.into(),
        }
    }

    /// Create a structured error from an `SmError`.
    #[must_use]
    pub fn from_sm_error(err: &SmError) -> Self {
        let mut structured = Self::new(err.code(), err.to_string());
        structured.context = err.context();
        structured
    }
}

impl std::fmt::Display for StructuredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl From<&SmError> for StructuredError {
    fn from(err: &SmError) -> Self {
        Self::from_sm_error(err)
    }
}

/// Result type alias using `SmError`.
pub type Result<T> = std::result::Result<T, SmError>;
