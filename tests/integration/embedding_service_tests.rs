use std::sync::Arc;

use httpmock::prelude::*;
use serde_json::json;

use skillmart::config::{EmbeddingConfig, SearchConfig};
use skillmart::search::{FallbackEmbedder, SearchEngine, SearchMode, SearchOptions, build_embedder};
use skillmart::storage::MemoryStore;
use skillmart::test_utils::fixtures::sample_skills;

fn api_config(endpoint: String, dims: usize) -> EmbeddingConfig {
    EmbeddingConfig {
        backend: "api".to_string(),
        endpoint: Some(endpoint),
        dims,
        timeout_secs: 2,
        ..EmbeddingConfig::default()
    }
}

#[tokio::test]
async fn unavailable_service_ranks_like_the_fallback() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/embeddings");
            then.status(503).body("maintenance");
        })
        .await;

    let api = build_embedder(&api_config(server.url("/v1"), 48)).unwrap();
    let api_engine = SearchEngine::new(
        MemoryStore::from_skills(sample_skills()),
        api,
        SearchConfig::default(),
    );
    let local_engine = SearchEngine::new(
        MemoryStore::from_skills(sample_skills()),
        Arc::new(FallbackEmbedder::new(48)),
        SearchConfig::default(),
    );

    let options = SearchOptions::new(10);
    let via_api = api_engine
        .search("react hooks", SearchMode::Hybrid, &options)
        .await
        .unwrap();
    let local = local_engine
        .search("react hooks", SearchMode::Hybrid, &options)
        .await
        .unwrap();

    assert!(mock.hits_async().await >= 1);
    let summarize = |response: &skillmart::search::SearchResponse| {
        response
            .results
            .iter()
            .map(|r| (r.id().to_string(), r.score))
            .collect::<Vec<_>>()
    };
    assert_eq!(summarize(&via_api), summarize(&local));
    assert_eq!(via_api.total, local.total);
}

#[tokio::test]
async fn service_vectors_drive_semantic_ranking() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/embeddings")
                .body_includes(r#""input":"docker""#);
            then.status(200).json_body(json!({
                "code": 0,
                "data": [{"embedding": [1.0, 0.0, 0.0], "index": 0}]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/embeddings").body_includes(r#""input":["#);
            then.status(200).json_body(json!({
                "code": 0,
                "data": [
                    {"embedding": [0.0, 1.0, 0.0], "index": 0},
                    {"embedding": [0.9, 0.1, 0.0], "index": 1},
                    {"embedding": [0.0, 0.0, 1.0], "index": 2}
                ]
            }));
        })
        .await;

    let embedder = build_embedder(&api_config(server.base_url(), 3)).unwrap();
    let engine = SearchEngine::new(
        MemoryStore::from_skills(sample_skills()),
        embedder,
        SearchConfig::default(),
    );

    let response = engine
        .search("docker", SearchMode::Semantic, &SearchOptions::new(10))
        .await
        .unwrap();

    // active candidates in insertion order: react, docker-compose, sql-tuning
    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].id(), "docker-compose");
    assert!(response.results[0].score > 90.0);
}

#[tokio::test]
async fn generate_embedding_falls_back_when_service_is_down() {
    let config = api_config("http://127.0.0.1:9/v1".to_string(), 24);
    let engine = SearchEngine::new(
        MemoryStore::new(),
        build_embedder(&config).unwrap(),
        SearchConfig::default(),
    );

    let vector = engine.generate_embedding("Docker Compose").await;
    assert_eq!(vector, FallbackEmbedder::new(24).embed_text("docker compose"));
}
