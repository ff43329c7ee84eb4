use std::collections::HashMap;

use proptest::prelude::*;

use skillmart::core::Skill;
use skillmart::search::{QueryResult, WeightedFusionConfig, fuse_results};

fn results(prefix: &'static str) -> impl Strategy<Value = Vec<QueryResult>> {
    prop::collection::vec((0u8..12, 0.0f64..300.0), 0..12).prop_map(move |entries| {
        let mut seen = std::collections::HashSet::new();
        entries
            .into_iter()
            .filter(|(id, _)| seen.insert(*id))
            .map(|(id, score)| {
                QueryResult::new(
                    Skill::new(format!("s{id}"), format!("skill {id}")),
                    score,
                    vec![format!("{prefix} reason")],
                )
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn fused_score_is_weighted_sum(keyword in results("keyword"), semantic in results("semantic")) {
        let config = WeightedFusionConfig::default();
        let kw: HashMap<String, f64> =
            keyword.iter().map(|r| (r.id().to_string(), r.score)).collect();
        let sem: HashMap<String, f64> =
            semantic.iter().map(|r| (r.id().to_string(), r.score)).collect();

        let fused = fuse_results(keyword, semantic, &config);

        let mut ids: Vec<&str> = fused.iter().map(QueryResult::id).collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), fused.len());

        for result in &fused {
            let expected = 0.6 * kw.get(result.id()).copied().unwrap_or(0.0)
                + 0.4 * sem.get(result.id()).copied().unwrap_or(0.0);
            prop_assert!((result.score - expected).abs() < 1e-9);
            let sources = usize::from(kw.contains_key(result.id()))
                + usize::from(sem.contains_key(result.id()));
            prop_assert_eq!(result.match_reasons.len(), sources);
        }
    }

    #[test]
    fn fused_results_are_sorted_descending(keyword in results("keyword"), semantic in results("semantic")) {
        let fused = fuse_results(keyword, semantic, &WeightedFusionConfig::default());
        for pair in fused.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }
}
