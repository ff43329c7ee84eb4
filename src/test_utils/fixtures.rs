use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tempfile::TempDir;

use crate::core::Skill;
use crate::storage::Database;

/// Small catalog covering every display field and label kind.
pub fn sample_skills() -> Vec<Skill> {
    vec![
        Skill::new("react-best-practices", "React best practices")
            .with_localized("React 最佳实践", "组件与 Hooks 的写法")
            .with_description("Component patterns and hooks for React apps")
            .with_content("Prefer function components. Keep effects small.")
            .with_category("frontend")
            .with_tag("react")
            .with_tag("hooks")
            .with_scores(420.0, 4.6),
        Skill::new("docker-compose", "Docker Compose recipes")
            .with_description("Multi-container setups, including React dev servers")
            .with_category("devops")
            .with_tag("containers")
            .with_scores(150.0, 4.1),
        Skill::new("sql-tuning", "SQL query tuning")
            .with_localized("SQL 调优", "索引与执行计划")
            .with_description("Indexes, query plans and slow query triage")
            .with_category("backend")
            .with_tag("databases")
            .with_scores(80.0, 3.9),
        Skill::new("legacy-jquery", "jQuery plugins")
            .with_description("Old-school DOM scripting")
            .with_category("frontend")
            .with_scores(5.0, 2.0)
            .inactive(),
    ]
}

/// Fixed instant for freshness assertions.
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-03-10T12:00:00Z")
        .map(|at| at.with_timezone(&Utc))
        .expect("fixed timestamp parses")
}

/// Isolated directory for databases and catalog files.
pub struct CatalogFixture {
    pub temp_dir: TempDir,
    pub root: PathBuf,
}

impl CatalogFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        println!("[FIXTURE] Created temp directory: {:?}", root);
        Self { temp_dir, root }
    }

    pub fn db_path(&self) -> PathBuf {
        self.root.join("skillmart.db")
    }

    /// Write a catalog file with the given content.
    pub fn write_catalog(&self, file_name: &str, content: &str) -> PathBuf {
        let path = self.root.join(file_name);
        std::fs::write(&path, content).expect("Failed to write catalog");
        println!("[FIXTURE] Wrote catalog: {:?} ({} bytes)", path, content.len());
        path
    }

    /// Write [`sample_skills`] as a JSON catalog.
    pub fn write_sample_catalog(&self) -> PathBuf {
        let json = serde_json::to_string_pretty(&sample_skills()).expect("sample serializes");
        self.write_catalog("catalog.json", &json)
    }

    /// Open the fixture database and load [`sample_skills`] into it.
    pub fn seeded_database(&self) -> Database {
        let db = Database::open(self.db_path()).expect("Failed to open database");
        for skill in sample_skills() {
            db.upsert_skill(&skill).expect("Failed to seed skill");
        }
        db
    }
}

impl Default for CatalogFixture {
    fn default() -> Self {
        Self::new()
    }
}
