use std::sync::Arc;

use skillmart::config::SearchConfig;
use skillmart::search::{
    EmbeddingProvider, FallbackEmbedder, SearchEngine, SearchFilters, SearchMode, SearchOptions,
};
use skillmart::storage::{CandidateStore, MemoryStore, SqliteStore};
use skillmart::test_utils::fixtures::{CatalogFixture, fixed_now, sample_skills};

fn engine(fixture: &CatalogFixture) -> SearchEngine<SqliteStore> {
    let db = fixture.seeded_database();
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(FallbackEmbedder::new(32));
    SearchEngine::new(SqliteStore::new(db), embedder, SearchConfig::default())
}

#[tokio::test]
async fn keyword_search_over_sqlite() {
    let fixture = CatalogFixture::new();
    let engine = engine(&fixture);

    let response = engine
        .search("React", SearchMode::Keyword, &SearchOptions::new(10))
        .await
        .unwrap();

    assert_eq!(response.total, 2);
    let ids: Vec<&str> = response.results.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec!["react-best-practices", "docker-compose"]);
    assert_eq!(response.results[0].skill.tags.len(), 2);
}

#[tokio::test]
async fn localized_query_matches_cjk_fields() {
    let fixture = CatalogFixture::new();
    let engine = engine(&fixture);

    let response = engine
        .search("调优", SearchMode::Keyword, &SearchOptions::new(10))
        .await
        .unwrap();

    assert_eq!(response.total, 1);
    assert_eq!(response.results[0].id(), "sql-tuning");
    assert_eq!(response.results[0].match_reasons, vec!["localized name match"]);
}

#[tokio::test]
async fn count_keeps_surrounding_spaces_in_the_query() {
    let fixture = CatalogFixture::new();
    let sqlite = SqliteStore::new(fixture.seeded_database());
    let memory = MemoryStore::from_skills(sample_skills());
    let filters = SearchFilters::new();

    for (query, expected) in [("recipes", 1), ("recipes ", 0), (" compose", 1)] {
        assert_eq!(sqlite.count_matching(query, &filters).await.unwrap(), expected, "{query:?}");
        assert_eq!(memory.count_matching(query, &filters).await.unwrap(), expected, "{query:?}");
    }
}

#[tokio::test]
async fn sqlite_and_memory_filters_agree() {
    let fixture = CatalogFixture::new();
    let store = SqliteStore::new(fixture.seeded_database());
    let filters = SearchFilters::new().with_category("frontend");

    let skills = store.fetch_candidates(&filters).await.unwrap();
    let ids: Vec<&str> = skills.iter().map(|s| s.id.as_str()).collect();
    // the inactive jQuery skill shares the category but is filtered out
    assert_eq!(ids, vec!["react-best-practices"]);

    let all = store.fetch_candidates(&SearchFilters::none()).await.unwrap();
    assert_eq!(all.len(), 4);
}

#[tokio::test]
async fn stored_embedding_round_trips_through_store() {
    let fixture = CatalogFixture::new();
    let store = SqliteStore::new(fixture.seeded_database());
    let vector = FallbackEmbedder::new(32).embed_text("sql tuning");

    store
        .upsert_embedding("sql-tuning", &vector, fixed_now())
        .await
        .unwrap();

    let skill = store.database().get_skill("sql-tuning").unwrap().unwrap();
    assert_eq!(skill.embedding.as_deref(), Some(vector.as_slice()));
    assert_eq!(skill.embedding_updated_at, Some(fixed_now()));
}

#[tokio::test]
async fn upsert_embedding_for_unknown_skill_fails() {
    let fixture = CatalogFixture::new();
    let store = SqliteStore::new(fixture.seeded_database());
    let err = store
        .upsert_embedding("missing", &[0.1, 0.2], fixed_now())
        .await
        .unwrap_err();
    assert!(matches!(err, skillmart::SmError::SkillNotFound(_)));
}

#[tokio::test]
async fn database_reopens_with_data_intact() {
    let fixture = CatalogFixture::new();
    drop(fixture.seeded_database());

    let store = SqliteStore::open(fixture.db_path()).unwrap();
    assert_eq!(store.database().skill_count().unwrap(), 4);
}
