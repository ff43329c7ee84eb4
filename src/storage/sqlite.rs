//! SQLite database layer

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, MutexGuard};
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, Row, params, params_from_iter};

use crate::core::{Label, Skill};
use crate::error::{Result, SmError};
use crate::search::filters::{CandidateFilter, SearchFilters};
use crate::storage::CandidateStore;
use crate::storage::migrations;

const SKILL_COLUMNS: &str = "s.id, s.name, s.localized_name, s.description, \
     s.localized_description, s.content, s.popularity_score, s.quality_score, \
     s.embedding, s.embedding_dims, s.embedding_updated_at, s.is_active";

/// SQLite database wrapper for the skill catalog
pub struct Database {
    conn: Connection,
    schema_version: u32,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("schema_version", &self.schema_version)
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Open database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        Self::configure_pragmas(&conn)?;
        let schema_version = migrations::run_migrations(&conn)?;

        Ok(Self {
            conn,
            schema_version,
        })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Current schema version after migrations.
    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    /// Insert or replace a skill and its label links in one transaction.
    ///
    /// A skill without an embedding keeps whatever vector is already stored.
    pub fn upsert_skill(&self, skill: &Skill) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        let embedding = skill.embedding.as_deref().map(encode_embedding);
        let dims = skill.embedding.as_ref().map(|v| v.len() as i64);
        let embedded_at = skill.embedding_updated_at.map(|at| at.to_rfc3339());

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO skills (
                id, name, localized_name, description, localized_description, content,
                popularity_score, quality_score, embedding, embedding_dims,
                embedding_updated_at, is_active, created_at, updated_at
             ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                name=excluded.name,
                localized_name=excluded.localized_name,
                description=excluded.description,
                localized_description=excluded.localized_description,
                content=excluded.content,
                popularity_score=excluded.popularity_score,
                quality_score=excluded.quality_score,
                embedding=COALESCE(excluded.embedding, skills.embedding),
                embedding_dims=COALESCE(excluded.embedding_dims, skills.embedding_dims),
                embedding_updated_at=COALESCE(excluded.embedding_updated_at, skills.embedding_updated_at),
                is_active=excluded.is_active,
                updated_at=excluded.updated_at",
            params![
                skill.id,
                skill.name,
                skill.localized_name,
                skill.description,
                skill.localized_description,
                skill.content,
                skill.popularity_score,
                skill.quality_score,
                embedding,
                dims,
                embedded_at,
                skill.is_active,
                now,
                now,
            ],
        )?;

        tx.execute("DELETE FROM skill_categories WHERE skill_id = ?", [&skill.id])?;
        for label in &skill.categories {
            tx.execute(
                "INSERT INTO categories (slug, name) VALUES (?, ?)
                 ON CONFLICT(slug) DO UPDATE SET name = excluded.name",
                params![label.slug, label.name],
            )?;
            tx.execute(
                "INSERT OR IGNORE INTO skill_categories (skill_id, category_id)
                 SELECT ?, id FROM categories WHERE slug = ?",
                params![skill.id, label.slug],
            )?;
        }

        tx.execute("DELETE FROM skill_tags WHERE skill_id = ?", [&skill.id])?;
        for label in &skill.tags {
            tx.execute(
                "INSERT INTO tags (slug, name) VALUES (?, ?)
                 ON CONFLICT(slug) DO UPDATE SET name = excluded.name",
                params![label.slug, label.name],
            )?;
            tx.execute(
                "INSERT OR IGNORE INTO skill_tags (skill_id, tag_id)
                 SELECT ?, id FROM tags WHERE slug = ?",
                params![skill.id, label.slug],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    pub fn get_skill(&self, id: &str) -> Result<Option<Skill>> {
        let sql = format!("SELECT {SKILL_COLUMNS} FROM skills s WHERE s.id = ?");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };
        let mut skills = vec![skill_from_row(row)?];
        drop(rows);
        self.attach_labels(&mut skills)?;
        Ok(skills.pop())
    }

    pub fn list_skills(&self, limit: usize, offset: usize) -> Result<Vec<Skill>> {
        let sql = format!(
            "SELECT {SKILL_COLUMNS} FROM skills s ORDER BY s.id LIMIT ? OFFSET ?"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![limit as i64, offset as i64], skill_from_row)?;
        let mut skills = Vec::new();
        for row in rows {
            skills.push(row?);
        }
        self.attach_labels(&mut skills)?;
        Ok(skills)
    }

    pub fn skill_count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM skills", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// Skills passing every filter, most popular first.
    pub fn fetch_skills(&self, filters: &SearchFilters) -> Result<Vec<Skill>> {
        let (clause, values) = where_clause(filters);
        let sql = format!(
            "SELECT {SKILL_COLUMNS} FROM skills s WHERE {clause} \
             ORDER BY s.popularity_score DESC, s.id ASC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values), skill_from_row)?;
        let mut skills = Vec::new();
        for row in rows {
            skills.push(row?);
        }
        self.attach_labels(&mut skills)?;
        Ok(skills)
    }

    /// Count filtered skills whose display text contains `query`.
    ///
    /// Case folding uses SQLite `lower()`, which only folds ASCII.
    pub fn count_matching(&self, query: &str, filters: &SearchFilters) -> Result<u64> {
        if query.trim().is_empty() {
            return Ok(0);
        }

        let (clause, mut values) = where_clause(filters);
        let sql = format!(
            "SELECT COUNT(*) FROM skills s WHERE {clause} AND (
                instr(lower(s.name), lower(?)) > 0
                OR instr(lower(COALESCE(s.localized_name, '')), lower(?)) > 0
                OR instr(lower(COALESCE(s.description, '')), lower(?)) > 0
                OR instr(lower(COALESCE(s.localized_description, '')), lower(?)) > 0
                OR instr(lower(COALESCE(s.content, '')), lower(?)) > 0
             )"
        );
        for _ in 0..5 {
            values.push(SqlValue::Text(query.to_string()));
        }

        let count: i64 = self
            .conn
            .query_row(&sql, params_from_iter(values), |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// Store a freshly generated embedding.
    pub fn update_embedding(&self, id: &str, vector: &[f32], at: DateTime<Utc>) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE skills SET embedding = ?, embedding_dims = ?, embedding_updated_at = ?
             WHERE id = ?",
            params![encode_embedding(vector), vector.len() as i64, at.to_rfc3339(), id],
        )?;
        if changed == 0 {
            return Err(SmError::SkillNotFound(id.to_string()));
        }
        Ok(())
    }

    fn attach_labels(&self, skills: &mut [Skill]) -> Result<()> {
        if skills.is_empty() {
            return Ok(());
        }

        let categories = self.load_labels(
            "SELECT sc.skill_id, c.slug, c.name FROM skill_categories sc
             JOIN categories c ON c.id = sc.category_id
             ORDER BY c.slug",
        )?;
        let tags = self.load_labels(
            "SELECT st.skill_id, t.slug, t.name FROM skill_tags st
             JOIN tags t ON t.id = st.tag_id
             ORDER BY t.slug",
        )?;

        for skill in skills {
            skill.categories = categories.get(&skill.id).cloned().unwrap_or_default();
            skill.tags = tags.get(&skill.id).cloned().unwrap_or_default();
        }
        Ok(())
    }

    fn load_labels(&self, sql: &str) -> Result<HashMap<String, Vec<Label>>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                Label::new(row.get::<_, String>(1)?, row.get::<_, String>(2)?),
            ))
        })?;

        let mut out: HashMap<String, Vec<Label>> = HashMap::new();
        for row in rows {
            let (skill_id, label) = row?;
            out.entry(skill_id).or_default().push(label);
        }
        Ok(out)
    }

    fn configure_pragmas(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -64000;
             PRAGMA temp_store = MEMORY;
             PRAGMA foreign_keys = ON;",
        )?;
        Ok(())
    }
}

/// Candidate store over a SQLite [`Database`]
#[derive(Debug)]
pub struct SqliteStore {
    db: Mutex<Database>,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Database::open(path)?))
    }

    /// Direct access for catalog maintenance (import, listing).
    pub fn database(&self) -> MutexGuard<'_, Database> {
        self.db.lock()
    }
}

#[async_trait]
impl CandidateStore for SqliteStore {
    async fn fetch_candidates(&self, filters: &SearchFilters) -> Result<Vec<Skill>> {
        self.db.lock().fetch_skills(filters)
    }

    async fn count_matching(&self, query: &str, filters: &SearchFilters) -> Result<u64> {
        self.db.lock().count_matching(query, filters)
    }

    async fn upsert_embedding(&self, id: &str, vector: &[f32], at: DateTime<Utc>) -> Result<()> {
        self.db.lock().update_embedding(id, vector, at)
    }
}

/// SQL predicate and bound values for a filter set.
fn where_clause(filters: &SearchFilters) -> (String, Vec<SqlValue>) {
    let mut clauses = Vec::new();
    let mut values = Vec::new();

    for filter in filters.iter() {
        match filter {
            CandidateFilter::ActiveOnly => clauses.push("s.is_active = 1".to_string()),
            CandidateFilter::CategoryIn(slugs) => clauses.push(label_clause(
                "skill_categories",
                "category_id",
                "categories",
                slugs,
                &mut values,
            )),
            CandidateFilter::TagIn(slugs) => clauses.push(label_clause(
                "skill_tags",
                "tag_id",
                "tags",
                slugs,
                &mut values,
            )),
            CandidateFilter::MinPopularity(min) => {
                clauses.push("s.popularity_score >= ?".to_string());
                values.push(SqlValue::Real(*min));
            }
        }
    }

    if clauses.is_empty() {
        ("1 = 1".to_string(), values)
    } else {
        (clauses.join(" AND "), values)
    }
}

fn label_clause(
    link_table: &str,
    link_column: &str,
    label_table: &str,
    slugs: &[String],
    values: &mut Vec<SqlValue>,
) -> String {
    if slugs.is_empty() {
        return "0 = 1".to_string();
    }
    let placeholders = vec!["?"; slugs.len()].join(", ");
    values.extend(slugs.iter().map(|slug| SqlValue::Text(slug.clone())));
    format!(
        "EXISTS (SELECT 1 FROM {link_table} l JOIN {label_table} x ON x.id = l.{link_column} \
         WHERE l.skill_id = s.id AND x.slug IN ({placeholders}))"
    )
}

fn skill_from_row(row: &Row<'_>) -> rusqlite::Result<Skill> {
    let blob: Option<Vec<u8>> = row.get(8)?;
    let dims: Option<i64> = row.get(9)?;
    let embedding = match (blob, dims) {
        (Some(blob), Some(dims)) => Some(decode_embedding(&blob, dims.max(0) as usize).map_err(
            |err| {
                rusqlite::Error::FromSqlConversionFailure(
                    8,
                    rusqlite::types::Type::Blob,
                    Box::new(err),
                )
            },
        )?),
        _ => None,
    };

    let embedded_at: Option<String> = row.get(10)?;
    let embedding_updated_at = embedded_at
        .map(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .map(|at| at.with_timezone(&Utc))
                .map_err(|err| {
                    rusqlite::Error::FromSqlConversionFailure(
                        10,
                        rusqlite::types::Type::Text,
                        Box::new(err),
                    )
                })
        })
        .transpose()?;

    Ok(Skill {
        id: row.get(0)?,
        name: row.get(1)?,
        localized_name: row.get(2)?,
        description: row.get(3)?,
        localized_description: row.get(4)?,
        content: row.get(5)?,
        popularity_score: row.get(6)?,
        quality_score: row.get(7)?,
        embedding,
        embedding_updated_at,
        is_active: row.get::<_, i64>(11)? != 0,
        categories: Vec::new(),
        tags: Vec::new(),
    })
}

fn encode_embedding(values: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 4);
    for value in values {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out
}

fn decode_embedding(bytes: &[u8], dims: usize) -> Result<Vec<f32>> {
    let expected = dims.saturating_mul(4);
    if bytes.len() != expected {
        return Err(SmError::Serialization(format!(
            "embedding blob length mismatch: expected {}, got {}",
            expected,
            bytes.len()
        )));
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}
