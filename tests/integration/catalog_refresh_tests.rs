use std::time::Duration as StdDuration;

use chrono::Duration;

use skillmart::catalog::{ImportReport, import_catalog};
use skillmart::search::freshness::default_window;
use skillmart::search::{
    FallbackEmbedder, RefreshOptions, SearchMode, SearchOptions, refresh_embeddings,
};
use skillmart::storage::{Database, SqliteStore};
use skillmart::test_utils::fixtures::{CatalogFixture, fixed_now};
use skillmart::test_utils::logging::TestLogger;
use skillmart::test_utils::stores::RecordingStore;

const YAML_CATALOG: &str = r"
skills:
  - id: terraform-modules
    name: Terraform modules
    description: Reusable infrastructure modules
    categories:
      - slug: devops
        name: DevOps
    tags: [iac]
    popularity_score: 60
  - id: rust-async
    name: Async Rust
    localized_name: 异步 Rust
    tags: [rust, tokio]
  - name: ''
";

fn options(force: bool) -> RefreshOptions {
    RefreshOptions {
        force,
        batch_size: 2,
        throttle: StdDuration::ZERO,
        freshness_window: default_window(),
        now: fixed_now(),
    }
}

#[test]
fn yaml_catalog_imports_with_labels() {
    let log = TestLogger::new("yaml_catalog_imports_with_labels");
    let fixture = CatalogFixture::new();
    let path = fixture.write_catalog("catalog.yaml", YAML_CATALOG);
    log.log_input("catalog", &path);

    let db = Database::open(fixture.db_path()).unwrap();
    let report = import_catalog(&db, &path).unwrap();
    log.log_actual(&report);

    assert_eq!(report, ImportReport { imported: 2, skipped: 1 });
    let terraform = db.get_skill("terraform-modules").unwrap().unwrap();
    assert_eq!(terraform.categories[0].name, "DevOps");
    assert!(terraform.has_tag("iac"));
    let rust = db.get_skill("rust-async").unwrap().unwrap();
    assert_eq!(rust.localized_name.as_deref(), Some("异步 Rust"));
    log.pass();
}

#[test]
fn sample_catalog_round_trips_through_json() {
    let fixture = CatalogFixture::new();
    let path = fixture.write_sample_catalog();
    let db = Database::open(fixture.db_path()).unwrap();

    let report = import_catalog(&db, &path).unwrap();
    assert_eq!(report.imported, 4);
    let legacy = db.get_skill("legacy-jquery").unwrap().unwrap();
    assert!(!legacy.is_active);
}

#[tokio::test]
async fn refresh_stores_vectors_for_active_skills() {
    let fixture = CatalogFixture::new();
    let store = RecordingStore::new(SqliteStore::new(fixture.seeded_database()));
    let embedder = FallbackEmbedder::new(32);

    let report = refresh_embeddings(&store, &embedder, &options(false), &mut |_, _| {})
        .await
        .unwrap();
    assert_eq!(report.scanned, 3);
    assert_eq!(report.refreshed, 3);
    assert_eq!(store.upserts(), 3);

    let react = store
        .inner()
        .database()
        .get_skill("react-best-practices")
        .unwrap()
        .unwrap();
    assert_eq!(react.embedding_updated_at, Some(fixed_now()));
    assert_eq!(
        react.embedding.as_deref(),
        Some(embedder.embed_text(&react.embedding_text()).as_slice())
    );

    // the inactive skill is never embedded
    let legacy = store.inner().database().get_skill("legacy-jquery").unwrap().unwrap();
    assert!(legacy.embedding.is_none());
}

#[tokio::test]
async fn refresh_skips_fresh_embeddings_until_forced() {
    let fixture = CatalogFixture::new();
    let store = SqliteStore::new(fixture.seeded_database());
    let embedder = FallbackEmbedder::new(16);

    refresh_embeddings(&store, &embedder, &options(false), &mut |_, _| {})
        .await
        .unwrap();

    let mut later = options(false);
    later.now = fixed_now() + Duration::days(3);
    let report = refresh_embeddings(&store, &embedder, &later, &mut |_, _| {})
        .await
        .unwrap();
    assert_eq!(report.refreshed, 0);
    assert_eq!(report.skipped, 3);

    later.now = fixed_now() + Duration::days(8);
    let report = refresh_embeddings(&store, &embedder, &later, &mut |_, _| {})
        .await
        .unwrap();
    assert_eq!(report.refreshed, 3);

    let mut progress = Vec::new();
    let report = refresh_embeddings(&store, &embedder, &options(true), &mut |done, total| {
        progress.push((done, total));
    })
    .await
    .unwrap();
    assert_eq!(report.refreshed, 3);
    assert_eq!(progress, vec![(2, 3), (3, 3)]);
}

#[tokio::test]
async fn imported_catalog_is_searchable() {
    let fixture = CatalogFixture::new();
    let path = fixture.write_catalog("catalog.yaml", YAML_CATALOG);
    let db = Database::open(fixture.db_path()).unwrap();
    import_catalog(&db, &path).unwrap();

    let engine = skillmart::search::SearchEngine::new(
        SqliteStore::new(db),
        std::sync::Arc::new(FallbackEmbedder::new(16)),
        skillmart::config::SearchConfig::default(),
    );
    let response = engine
        .search("异步", SearchMode::Keyword, &SearchOptions::new(5))
        .await
        .unwrap();
    assert_eq!(response.total, 1);
    assert_eq!(response.results[0].id(), "rust-async");
}
