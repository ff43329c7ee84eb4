use skillmart::config::{Config, SearchConfig};
use skillmart::search::{CandidateFilter, SearchMode, SearchOptions};
use skillmart::test_utils::{TestCase, run_table_tests};

#[test]
fn effective_limit_cases() {
    let config = SearchConfig::default();
    let cases = vec![
        TestCase {
            name: "zero uses default",
            input: 0usize,
            expected: 20usize,
        },
        TestCase {
            name: "explicit",
            input: 7,
            expected: 7,
        },
        TestCase {
            name: "at cap",
            input: 100,
            expected: 100,
        },
        TestCase {
            name: "over cap",
            input: 5_000,
            expected: 100,
        },
    ];
    run_table_tests(cases, |limit| SearchOptions::new(*limit).effective_limit(&config));
}

#[test]
fn raw_paging_cases() {
    let cases = vec![
        TestCase {
            name: "negative limit and offset clamp to zero",
            input: (-5i64, -2i64),
            expected: (0usize, 0usize),
        },
        TestCase {
            name: "positive values pass through",
            input: (15, 30),
            expected: (15, 30),
        },
    ];
    run_table_tests(cases, |(limit, offset)| {
        let options = SearchOptions::from_raw(*limit, *offset);
        (options.limit, options.offset)
    });
}

#[test]
fn mode_parsing_cases() {
    let cases = vec![
        TestCase {
            name: "keyword",
            input: "keyword",
            expected: Some(SearchMode::Keyword),
        },
        TestCase {
            name: "case and padding",
            input: " Semantic ",
            expected: Some(SearchMode::Semantic),
        },
        TestCase {
            name: "hybrid",
            input: "HYBRID",
            expected: Some(SearchMode::Hybrid),
        },
        TestCase {
            name: "unknown",
            input: "bm25",
            expected: None,
        },
    ];
    run_table_tests(cases, |raw| raw.parse::<SearchMode>().ok());
}

#[test]
fn options_always_filter_to_active_skills() {
    let options = SearchOptions::new(5)
        .with_category("devops")
        .with_tags(vec!["docker".into()])
        .with_min_popularity(10.0);
    let filters = options.filters();
    let kinds = filters.as_slice();

    assert_eq!(kinds[0], CandidateFilter::ActiveOnly);
    assert!(kinds.contains(&CandidateFilter::CategoryIn(vec!["devops".into()])));
    assert!(kinds.contains(&CandidateFilter::TagIn(vec!["docker".into()])));
    assert!(kinds.contains(&CandidateFilter::MinPopularity(10.0)));
}

#[test]
fn config_file_feeds_search_settings() {
    let config = Config::from_toml_str(
        r#"
        [search]
        default_limit = 5
        max_limit = 8
        require_keyword_match = false
        "#,
    )
    .unwrap();

    let options = SearchOptions::new(0);
    assert_eq!(options.effective_limit(&config.search), 5);
    assert_eq!(SearchOptions::new(50).effective_limit(&config.search), 8);
    assert!(!config.search.require_keyword_match);
}
