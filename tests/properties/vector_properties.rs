use proptest::prelude::*;

use skillmart::search::normalize::normalize;
use skillmart::search::similarity::{cosine_similarity, l2_norm};
use skillmart::search::FallbackEmbedder;

fn vector(len: usize) -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-100.0f32..100.0, len)
}

proptest! {
    #[test]
    fn normalize_is_idempotent(text in "\\PC{0,64}") {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalized_text_has_no_outer_or_double_spaces(text in "[a-zA-Z0-9 ,.!?\\t]{0,48}") {
        let out = normalize(&text);
        prop_assert_eq!(out.trim(), out.as_str());
        prop_assert!(!out.contains("  "));
        prop_assert_eq!(out.to_lowercase(), out.clone());
    }

    #[test]
    fn cosine_is_symmetric_and_bounded((a, b) in (1usize..48).prop_flat_map(|n| (vector(n), vector(n)))) {
        let ab = cosine_similarity(&a, &b);
        let ba = cosine_similarity(&b, &a);
        prop_assert!((ab - ba).abs() < 1e-5);
        prop_assert!(ab <= 1.0 + 1e-4 && ab >= -1.0 - 1e-4);
    }

    #[test]
    fn cosine_of_mismatched_lengths_is_zero(a in vector(8), b in vector(9)) {
        prop_assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn fallback_is_deterministic_unit_length(text in "\\PC{1,40}", dims in 1usize..256) {
        let embedder = FallbackEmbedder::new(dims);
        let first = embedder.embed_text(&text);
        let second = embedder.embed_text(&text);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.len(), dims);
        let norm = l2_norm(&first);
        // an all-zero raw vector is left as is
        prop_assert!((norm - 1.0).abs() < 1e-3 || norm == 0.0);
    }
}
