use skillmart::search::normalize::{is_blank, normalize};
use skillmart::test_utils::{TestCase, run_table_tests};

#[test]
fn normalize_cases() {
    let cases = vec![
        TestCase {
            name: "mixed case and padding",
            input: "  Docker  COMPOSE ",
            expected: "docker compose".to_string(),
        },
        TestCase {
            name: "dotted version",
            input: "node.js 20.x",
            expected: "node js 20 x".to_string(),
        },
        TestCase {
            name: "fullwidth punctuation around ideographs",
            input: "【数据库】优化",
            expected: "数据库 优化".to_string(),
        },
        TestCase {
            name: "hashtag and at-sign",
            input: "#rust @tokio",
            expected: "rust tokio".to_string(),
        },
        TestCase {
            name: "underscore survives",
            input: "__init__",
            expected: "__init__".to_string(),
        },
        TestCase {
            name: "accented latin loses the accented letter",
            input: "Café",
            expected: "caf".to_string(),
        },
        TestCase {
            name: "cyrillic is stripped",
            input: "поиск",
            expected: String::new(),
        },
        TestCase {
            name: "hangul is stripped",
            input: "한국어 검색",
            expected: String::new(),
        },
        TestCase {
            name: "kana is stripped but kanji survive",
            input: "検索エンジン",
            expected: "検索".to_string(),
        },
        TestCase {
            name: "only symbols",
            input: "-- // --",
            expected: String::new(),
        },
    ];
    run_table_tests(cases, |input| normalize(input));
}

#[test]
fn blank_query_cases() {
    let cases = vec![
        TestCase {
            name: "empty",
            input: "",
            expected: true,
        },
        TestCase {
            name: "whitespace",
            input: " \n\t ",
            expected: true,
        },
        TestCase {
            name: "punctuation is not blank",
            input: "?",
            expected: false,
        },
        TestCase {
            name: "word",
            input: " react ",
            expected: false,
        },
    ];
    run_table_tests(cases, |input| is_blank(input));
}
