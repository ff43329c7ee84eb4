use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SmError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration: defaults, then config files, then `SKILLMART_*`
    /// environment overrides.
    ///
    /// An explicit path (or `SKILLMART_CONFIG`) replaces the global/project
    /// lookup. Missing files are skipped; unreadable or malformed ones are
    /// errors.
    pub fn load(explicit_path: Option<&Path>, project_root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| env_string("SKILLMART_CONFIG").map(PathBuf::from));

        if let Some(path) = explicit {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(project_root)? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Parse a config from TOML text on top of the defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let patch: ConfigPatch =
            toml::from_str(raw).map_err(|err| SmError::Config(format!("parse config: {err}")))?;
        let mut config = Self::default();
        config.merge_patch(patch);
        config.validate()?;
        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("skillmart/config.toml"))
    }

    fn load_project(project_root: &Path) -> Result<Option<ConfigPatch>> {
        Self::load_patch(&project_root.join(".skillmart/config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| SmError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| SmError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.search {
            self.search.merge(patch);
        }
        if let Some(patch) = patch.embedding {
            self.embedding.merge(patch);
        }
        if let Some(patch) = patch.storage {
            self.storage.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_usize("SKILLMART_SEARCH_DEFAULT_LIMIT")? {
            self.search.default_limit = value;
        }
        if let Some(value) = env_usize("SKILLMART_SEARCH_MAX_LIMIT")? {
            self.search.max_limit = value;
        }
        if let Some(value) = env_f64("SKILLMART_SEARCH_KEYWORD_WEIGHT")? {
            self.search.keyword_weight = value;
        }
        if let Some(value) = env_f64("SKILLMART_SEARCH_SEMANTIC_WEIGHT")? {
            self.search.semantic_weight = value;
        }
        if let Some(value) = env_f64("SKILLMART_SEARCH_SEMANTIC_THRESHOLD")? {
            self.search.semantic_threshold = value;
        }
        if let Some(value) = env_bool("SKILLMART_SEARCH_REQUIRE_KEYWORD_MATCH") {
            self.search.require_keyword_match = value;
        }
        if let Some(value) = env_bool("SKILLMART_SEARCH_PREFER_CACHED_EMBEDDINGS") {
            self.search.prefer_cached_embeddings = value;
        }

        if let Some(value) = env_string("SKILLMART_EMBEDDING_BACKEND") {
            self.embedding.backend = value;
        }
        if let Some(value) = env_string("SKILLMART_EMBEDDING_ENDPOINT") {
            self.embedding.endpoint = Some(value);
        }
        if let Some(value) = env_string("SKILLMART_EMBEDDING_MODEL") {
            self.embedding.model = value;
        }
        if let Some(value) = env_string("SKILLMART_EMBEDDING_API_KEY") {
            self.embedding.api_key = Some(value);
        }
        if let Some(value) = env_usize("SKILLMART_EMBEDDING_DIMS")? {
            self.embedding.dims = value;
        }
        if let Some(value) = env_u64("SKILLMART_EMBEDDING_TIMEOUT_SECS")? {
            self.embedding.timeout_secs = value;
        }
        if let Some(value) = env_usize("SKILLMART_EMBEDDING_BATCH_SIZE")? {
            self.embedding.batch_size = value;
        }
        if let Some(value) = env_u64("SKILLMART_EMBEDDING_THROTTLE_MS")? {
            self.embedding.throttle_ms = value;
        }
        if let Some(value) = env_u64("SKILLMART_EMBEDDING_FRESHNESS_DAYS")? {
            self.embedding.freshness_days = value;
        }

        if let Some(value) = env_string("SKILLMART_DB") {
            self.storage.database = Some(PathBuf::from(value));
        }

        Ok(())
    }

    /// Reject values the search core cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.embedding.dims == 0 {
            return Err(SmError::Config(
                "embedding.dims must be greater than 0".to_string(),
            ));
        }
        if self.embedding.batch_size == 0 {
            return Err(SmError::Config(
                "embedding.batch_size must be greater than 0".to_string(),
            ));
        }
        for (key, weight) in [
            ("search.keyword_weight", self.search.keyword_weight),
            ("search.semantic_weight", self.search.semantic_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(SmError::Config(format!(
                    "{key} must be a finite non-negative number (got {weight})"
                )));
            }
        }
        if !(-1.0..=1.0).contains(&self.search.semantic_threshold) {
            return Err(SmError::Config(format!(
                "search.semantic_threshold must be within [-1, 1] (got {})",
                self.search.semantic_threshold
            )));
        }
        if self.search.max_limit == 0 {
            return Err(SmError::Config(
                "search.max_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Page size used when the caller passes 0
    #[serde(default)]
    pub default_limit: usize,
    #[serde(default)]
    pub max_limit: usize,
    #[serde(default)]
    pub keyword_weight: f64,
    #[serde(default)]
    pub semantic_weight: f64,
    /// Similarity floor; only strictly greater values survive
    #[serde(default)]
    pub semantic_threshold: f64,
    /// Drop keyword candidates without any field match
    #[serde(default)]
    pub require_keyword_match: bool,
    /// Use a skill's stored embedding when it is fresh instead of re-embedding
    #[serde(default)]
    pub prefer_cached_embeddings: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
            keyword_weight: 0.6,
            semantic_weight: 0.4,
            semantic_threshold: 0.3,
            require_keyword_match: true,
            prefer_cached_embeddings: false,
        }
    }
}

impl SearchConfig {
    fn merge(&mut self, patch: SearchPatch) {
        if let Some(value) = patch.default_limit {
            self.default_limit = value;
        }
        if let Some(value) = patch.max_limit {
            self.max_limit = value;
        }
        if let Some(value) = patch.keyword_weight {
            self.keyword_weight = value;
        }
        if let Some(value) = patch.semantic_weight {
            self.semantic_weight = value;
        }
        if let Some(value) = patch.semantic_threshold {
            self.semantic_threshold = value;
        }
        if let Some(value) = patch.require_keyword_match {
            self.require_keyword_match = value;
        }
        if let Some(value) = patch.prefer_cached_embeddings {
            self.prefer_cached_embeddings = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "api" (external service with fallback) or "fallback" (offline only)
    #[serde(default)]
    pub backend: String,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub model: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub dims: usize,
    #[serde(default)]
    pub timeout_secs: u64,
    /// Texts per request for bulk regeneration
    #[serde(default)]
    pub batch_size: usize,
    /// Pause between bulk regeneration requests
    #[serde(default)]
    pub throttle_ms: u64,
    #[serde(default)]
    pub freshness_days: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: "api".to_string(),
            endpoint: None,
            model: "BAAI/bge-m3".to_string(),
            api_key: None,
            dims: 1024,
            timeout_secs: 30,
            batch_size: 32,
            throttle_ms: 250,
            freshness_days: 7,
        }
    }
}

impl EmbeddingConfig {
    fn merge(&mut self, patch: EmbeddingPatch) {
        if let Some(value) = patch.backend {
            self.backend = value;
        }
        if let Some(value) = patch.endpoint {
            self.endpoint = Some(value);
        }
        if let Some(value) = patch.model {
            self.model = value;
        }
        if let Some(value) = patch.api_key {
            self.api_key = Some(value);
        }
        if let Some(value) = patch.dims {
            self.dims = value;
        }
        if let Some(value) = patch.timeout_secs {
            self.timeout_secs = value;
        }
        if let Some(value) = patch.batch_size {
            self.batch_size = value;
        }
        if let Some(value) = patch.throttle_ms {
            self.throttle_ms = value;
        }
        if let Some(value) = patch.freshness_days {
            self.freshness_days = value;
        }
    }

    pub fn freshness_window(&self) -> chrono::Duration {
        i64::try_from(self.freshness_days)
            .ok()
            .and_then(chrono::Duration::try_days)
            .unwrap_or(chrono::Duration::MAX)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// SQLite database path; defaults to the platform data dir
    #[serde(default)]
    pub database: Option<PathBuf>,
}

impl StorageConfig {
    fn merge(&mut self, patch: StoragePatch) {
        if let Some(value) = patch.database {
            self.database = Some(value);
        }
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.database {
            return Ok(path.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| SmError::MissingConfig("storage.database".to_string()))?;
        Ok(data_dir.join("skillmart/skillmart.db"))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub search: Option<SearchPatch>,
    pub embedding: Option<EmbeddingPatch>,
    pub storage: Option<StoragePatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SearchPatch {
    pub default_limit: Option<usize>,
    pub max_limit: Option<usize>,
    pub keyword_weight: Option<f64>,
    pub semantic_weight: Option<f64>,
    pub semantic_threshold: Option<f64>,
    pub require_keyword_match: Option<bool>,
    pub prefer_cached_embeddings: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct EmbeddingPatch {
    pub backend: Option<String>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub dims: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub batch_size: Option<usize>,
    pub throttle_ms: Option<u64>,
    pub freshness_days: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StoragePatch {
    pub database: Option<PathBuf>,
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key).ok().map(|value| {
        matches!(
            value.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) => value.trim().parse::<T>().map(Some).map_err(|err| {
            SmError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        Err(_) => Ok(None),
    }
}

fn env_usize(key: &str) -> Result<Option<usize>> {
    env_parse(key)
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    env_parse(key)
}

fn env_f64(key: &str) -> Result<Option<f64>> {
    env_parse(key)
}
