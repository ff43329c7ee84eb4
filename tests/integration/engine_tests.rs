use std::sync::Arc;

use skillmart::SmError;
use skillmart::config::SearchConfig;
use skillmart::core::Skill;
use skillmart::search::{
    EmbeddingProvider, FallbackEmbedder, SearchEngine, SearchMode, SearchOptions,
    cosine_similarity,
};
use skillmart::storage::MemoryStore;
use skillmart::test_utils::embedders::StubEmbedder;
use skillmart::test_utils::fixtures::{fixed_now, sample_skills};
use skillmart::test_utils::logging::init_test_tracing;
use skillmart::test_utils::stores::{FailingStore, RecordingStore};

fn sample_engine() -> SearchEngine<MemoryStore> {
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(FallbackEmbedder::new(64));
    SearchEngine::new(
        MemoryStore::from_skills(sample_skills()),
        embedder,
        SearchConfig::default(),
    )
}

fn stub_engine(skills: Vec<Skill>, stub: StubEmbedder) -> SearchEngine<MemoryStore> {
    SearchEngine::new(
        MemoryStore::from_skills(skills),
        Arc::new(stub),
        SearchConfig::default(),
    )
}

#[tokio::test]
async fn keyword_name_match_scores_weight_plus_boost() {
    init_test_tracing();
    let engine = sample_engine();

    let response = engine
        .search("react", SearchMode::Keyword, &SearchOptions::new(10))
        .await
        .unwrap();

    assert_eq!(response.total, 2);
    let ids: Vec<&str> = response.results.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec!["react-best-practices", "docker-compose"]);

    // name 100 + localized name 90 + description 50 + popularity 20 + quality 15
    let top = &response.results[0];
    assert!((top.score - 275.0).abs() < 1e-9);
    assert_eq!(
        top.match_reasons,
        vec!["name match", "localized name match", "description match"]
    );

    // description 50 + popularity 15 + quality 15
    assert!((response.results[1].score - 80.0).abs() < 1e-9);
}

#[tokio::test]
async fn blank_query_touches_neither_store_nor_embedder() {
    let store = Arc::new(RecordingStore::new(MemoryStore::from_skills(sample_skills())));
    let stub = Arc::new(StubEmbedder::new(4));
    let embedder: Arc<dyn EmbeddingProvider> = stub.clone();
    let engine = SearchEngine::new(Arc::clone(&store), embedder, SearchConfig::default());

    for mode in [SearchMode::Keyword, SearchMode::Semantic, SearchMode::Hybrid] {
        let response = engine
            .search("   ", mode, &SearchOptions::new(10))
            .await
            .unwrap();
        assert!(response.results.is_empty());
        assert_eq!(response.total, 0);
    }

    assert_eq!(store.total_calls(), 0);
    assert_eq!(stub.single_calls() + stub.batch_calls(), 0);
}

#[tokio::test]
async fn semantic_similarity_below_threshold_is_excluded() {
    let skills = vec![Skill::new("alpha", "Alpha"), Skill::new("beta", "Beta")];
    let stub = StubEmbedder::new(2)
        .with("kubernetes", vec![1.0, 0.0])
        .with("alpha", vec![0.25, 0.968_245_8])
        .with("beta", vec![0.8, 0.6]);
    let engine = stub_engine(skills, stub);

    let response = engine
        .search("Kubernetes", SearchMode::Semantic, &SearchOptions::new(10))
        .await
        .unwrap();

    assert_eq!(response.results.len(), 1);
    let hit = &response.results[0];
    assert_eq!(hit.id(), "beta");
    assert!((hit.score - 80.0).abs() < 1e-3);
    assert_eq!(hit.match_reasons, vec!["AI semantic match"]);
    // "kubernetes" appears in neither name
    assert_eq!(response.total, 0);
}

#[tokio::test]
async fn hybrid_semantic_only_hit_is_weighted() {
    let skills = vec![Skill::new("beta", "Beta")];
    let stub = StubEmbedder::new(2)
        .with("zzz", vec![1.0, 0.0])
        .with("beta", vec![0.8, 0.6]);
    let engine = stub_engine(skills, stub);

    let response = engine
        .search("zzz", SearchMode::Hybrid, &SearchOptions::new(10))
        .await
        .unwrap();

    assert_eq!(response.results.len(), 1);
    assert!((response.results[0].score - 32.0).abs() < 1e-3);
    assert_eq!(response.results[0].match_reasons, vec!["AI semantic match"]);
}

#[tokio::test]
async fn hybrid_agreement_concatenates_reasons() {
    let skills = vec![Skill::new("beta", "Beta").with_scores(0.0, 0.0)];
    let stub = StubEmbedder::new(2).with("beta", vec![0.6, 0.8]);
    let engine = stub_engine(skills, stub);

    let response = engine
        .search("beta", SearchMode::Hybrid, &SearchOptions::new(10))
        .await
        .unwrap();

    let hit = &response.results[0];
    // 0.6 * 100 + 0.4 * 100
    assert!((hit.score - 100.0).abs() < 1e-3);
    assert_eq!(hit.match_reasons, vec!["name match", "AI semantic match"]);
}

#[test]
fn mismatched_dimensions_have_zero_similarity() {
    let a = vec![0.5f32; 1024];
    let b = vec![0.5f32; 512];
    assert_eq!(cosine_similarity(&a, &b), 0.0);
}

#[tokio::test]
async fn offset_pages_through_ranked_results() {
    let engine = sample_engine();
    let options = SearchOptions::new(1).with_offset(1);

    let response = engine
        .search("react", SearchMode::Keyword, &options)
        .await
        .unwrap();

    assert_eq!(response.total, 2);
    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].id(), "docker-compose");
}

#[tokio::test]
async fn limit_is_capped_by_config() {
    let skills: Vec<Skill> = (0..30)
        .map(|i| Skill::new(format!("s{i}"), format!("shared {i}")))
        .collect();
    let config = SearchConfig {
        max_limit: 5,
        ..SearchConfig::default()
    };
    let engine = SearchEngine::new(
        MemoryStore::from_skills(skills),
        Arc::new(FallbackEmbedder::new(16)),
        config,
    );

    let response = engine
        .search("shared", SearchMode::Keyword, &SearchOptions::new(50))
        .await
        .unwrap();
    assert_eq!(response.results.len(), 5);
    assert_eq!(response.total, 30);
}

#[tokio::test]
async fn filters_restrict_candidates() {
    let engine = sample_engine();

    let by_category = engine
        .search(
            "s",
            SearchMode::Keyword,
            &SearchOptions::new(10).with_category("backend"),
        )
        .await
        .unwrap();
    let ids: Vec<&str> = by_category.results.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec!["sql-tuning"]);

    let by_tag = engine
        .search(
            "s",
            SearchMode::Keyword,
            &SearchOptions::new(10).with_tags(vec!["containers".into()]),
        )
        .await
        .unwrap();
    assert!(!by_tag.results.is_empty());
    assert!(by_tag.results.iter().all(|r| r.id() == "docker-compose"));

    let popular = engine
        .search(
            "s",
            SearchMode::Keyword,
            &SearchOptions::new(10).with_min_popularity(100.0),
        )
        .await
        .unwrap();
    assert!(popular.results.iter().all(|r| r.skill.popularity_score >= 100.0));
}

#[tokio::test]
async fn inactive_skills_never_surface() {
    let engine = sample_engine();
    let response = engine
        .search("jquery", SearchMode::Hybrid, &SearchOptions::new(10))
        .await
        .unwrap();
    assert!(response.results.iter().all(|r| r.id() != "legacy-jquery"));
    assert_eq!(response.total, 0);
}

#[tokio::test]
async fn store_failure_propagates() {
    let engine = SearchEngine::new(
        FailingStore,
        Arc::new(FallbackEmbedder::new(8)),
        SearchConfig::default(),
    );
    let err = engine
        .search("react", SearchMode::Keyword, &SearchOptions::new(10))
        .await
        .unwrap_err();
    assert!(matches!(err, SmError::Database(_)));
}

#[tokio::test]
async fn generate_embedding_uses_provider() {
    let engine = sample_engine();
    let vector = engine.generate_embedding("React hooks").await;
    assert_eq!(vector, FallbackEmbedder::new(64).embed_text("react hooks"));
}

#[test]
fn staleness_follows_the_seven_day_window() {
    let engine = sample_engine();
    let now = fixed_now();

    let never = Skill::new("a", "A");
    let fresh = Skill::new("b", "B").with_embedding(vec![0.1; 4], now - chrono::Duration::days(7));
    let old = Skill::new("c", "C").with_embedding(
        vec![0.1; 4],
        now - chrono::Duration::days(7) - chrono::Duration::seconds(1),
    );

    assert!(engine.is_embedding_stale_at(&never, now));
    assert!(!engine.is_embedding_stale_at(&fresh, now));
    assert!(engine.is_embedding_stale_at(&old, now));
}
