//! Standardized error codes for machine-parseable output.
//!
//! Error codes follow a numeric taxonomy:
//! - 1xx: Skill errors
//! - 2xx: Catalog errors
//! - 3xx: Config errors
//! - 4xx: Search errors
//! - 5xx: Embedding / network errors
//! - 6xx: Storage errors
//! - 9xx: Internal errors

use serde::{Deserialize, Serialize};

/// Standardized error codes for JSON output.
///
/// Each variant maps to a numeric code (e.g., `SkillNotFound` -> E101).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================
    // Skill errors (1xx)
    // ========================================
    /// E101: Requested skill was not found in the store
    SkillNotFound,

    // ========================================
    // Catalog errors (2xx)
    // ========================================
    /// E201: Catalog file could not be parsed
    CatalogParseError,
    /// E202: Catalog file extension is not supported
    CatalogUnsupported,

    // ========================================
    // Config errors (3xx)
    // ========================================
    /// E301: Config file has invalid syntax or values
    ConfigInvalid,
    /// E302: Required config value is missing
    ConfigMissingRequired,

    // ========================================
    // Search errors (4xx)
    // ========================================
    /// E401: Search mode or options are invalid
    SearchQueryInvalid,

    // ========================================
    // Embedding / network errors (5xx)
    // ========================================
    /// E501: Embedding service could not be reached or answered badly
    EmbeddingUnavailable,
    /// E502: Embedding service call timed out
    EmbeddingTimeout,

    // ========================================
    // Storage errors (6xx)
    // ========================================
    /// E601: Database operation failed
    DatabaseError,
    /// E602: Serialization/deserialization failed
    SerializationError,
    /// E603: Schema migration failed
    MigrationFailed,

    // ========================================
    // Internal errors (9xx)
    // ========================================
    /// E901: Filesystem operation failed
    IoError,
}

impl ErrorCode {
    /// Numeric code (e.g., 101).
    #[must_use]
    pub const fn numeric(&self) -> u16 {
        match self {
            Self::SkillNotFound => 101,

            Self::CatalogParseError => 201,
            Self::CatalogUnsupported => 202,

            Self::ConfigInvalid => 301,
            Self::ConfigMissingRequired => 302,

            Self::SearchQueryInvalid => 401,

            Self::EmbeddingUnavailable => 501,
            Self::EmbeddingTimeout => 502,

            Self::DatabaseError => 601,
            Self::SerializationError => 602,
            Self::MigrationFailed => 603,

            Self::IoError => 901,
        }
    }

    #[must_use]
    pub fn code_string(&self) -> String {
        format!("E{}", self.numeric())
    }

    /// Actionable hint shown next to the error message.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::SkillNotFound => "Run `skillmart search <query>` to find similar skills",
            Self::CatalogParseError => "Check the catalog file: it must be a JSON or YAML list of skills",
            Self::CatalogUnsupported => "Use a .json, .yaml or .yml catalog file",
            Self::ConfigInvalid => "Check TOML syntax and value ranges in the config file",
            Self::ConfigMissingRequired => "Set the value in config.toml or via its SKILLMART_* variable",
            Self::SearchQueryInvalid => "Valid modes are keyword, semantic and hybrid",
            Self::EmbeddingUnavailable => "Check embedding.endpoint and embedding.api_key, or use backend = \"fallback\"",
            Self::EmbeddingTimeout => "Raise embedding.timeout_secs or check the embedding service",
            Self::DatabaseError => "Check the database path; delete the file to rebuild it from a catalog",
            Self::SerializationError => "The stored data may be corrupted. Re-import the catalog",
            Self::MigrationFailed => "The database schema is newer or damaged. Re-create it from a catalog",
            Self::IoError => "File operation failed. Check path exists and permissions are correct",
        }
    }

    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::SkillNotFound
            | Self::CatalogParseError
            | Self::CatalogUnsupported
            | Self::ConfigInvalid
            | Self::ConfigMissingRequired
            | Self::SearchQueryInvalid
            | Self::EmbeddingUnavailable
            | Self::EmbeddingTimeout
            | Self::IoError => true,

            Self::DatabaseError | Self::SerializationError | Self::MigrationFailed => false,
        }
    }

    /// Get the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.numeric() / 100 {
            1 => "skill",
            2 => "catalog",
            3 => "config",
            4 => "search",
            5 => "embedding",
            6 => "storage",
            9 => "internal",
            _ => "unknown",
        }
    }

    /// Iterate over all error codes.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::SkillNotFound,
            Self::CatalogParseError,
            Self::CatalogUnsupported,
            Self::ConfigInvalid,
            Self::ConfigMissingRequired,
            Self::SearchQueryInvalid,
            Self::EmbeddingUnavailable,
            Self::EmbeddingTimeout,
            Self::DatabaseError,
            Self::SerializationError,
            Self::MigrationFailed,
            Self::IoError,
        ]
        .into_iter()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code_string())
    }
}
