//! Query / document text normalization
//!
//! Embedders and the semantic path see text through [`normalize`]: lowercase,
//! symbols replaced by spaces, whitespace collapsed. Only ASCII word
//! characters (`A-Za-z0-9_`) and CJK Unified Ideographs (U+4E00..U+9FFF)
//! survive; accented Latin, Cyrillic, Hangul and kana become spaces.

use std::sync::LazyLock;

use regex::Regex;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^A-Za-z0-9_\s\x{4e00}-\x{9fff}]").expect("static normalizer pattern is valid")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static whitespace pattern is valid"));

/// Normalize text for matching and embedding.
///
/// Pure and idempotent: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = NON_WORD.replace_all(&lowered, " ");
    let collapsed = WHITESPACE.replace_all(&stripped, " ");
    collapsed.trim().to_string()
}

/// True when the text has nothing left to search for.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
