use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::search::{EmbeddingProvider, SearchEngine, build_embedder};
use crate::storage::SqliteStore;

/// Everything a command needs: resolved config, open store, embedder.
pub struct AppContext {
    pub config: Config,
    pub db_path: PathBuf,
    pub store: Arc<SqliteStore>,
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub json: bool,
    pub quiet: bool,
    pub verbosity: u8,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let mut config = Config::load(cli.config.as_deref(), &cwd)?;
        if let Some(db) = &cli.db {
            config.storage.database = Some(db.clone());
        }

        let db_path = config.storage.database_path()?;
        let store = Arc::new(SqliteStore::open(&db_path)?);
        let embedder = build_embedder(&config.embedding)?;

        Ok(Self {
            config,
            db_path,
            store,
            embedder,
            json: cli.json,
            quiet: cli.quiet,
            verbosity: cli.verbose,
        })
    }

    /// Search facade over the shared store and embedder
    pub fn engine(&self) -> SearchEngine<Arc<SqliteStore>> {
        SearchEngine::from_config(Arc::clone(&self.store), Arc::clone(&self.embedder), &self.config)
    }
}
