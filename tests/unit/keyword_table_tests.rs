use skillmart::core::Skill;
use skillmart::search::keyword::{boost, score_skill};
use skillmart::test_utils::{TestCase, run_table_tests};

fn skill() -> Skill {
    Skill::new("k8s", "Kubernetes operators")
        .with_localized("Kubernetes 运维", "集群自动化")
        .with_description("Write controllers with kube-rs")
        .with_content("Reconcile loops, finalizers, CRDs")
}

#[test]
fn field_weights_and_reasons() {
    // popularity and quality default to zero, so no boost is added
    let cases = vec![
        TestCase {
            name: "name and localized name",
            input: "kubernetes",
            expected: (190.0, vec!["name match", "localized name match"]),
        },
        TestCase {
            name: "description only",
            input: "KUBE-RS",
            expected: (50.0, vec!["description match"]),
        },
        TestCase {
            name: "localized description",
            input: "自动化",
            expected: (45.0, vec!["localized description match"]),
        },
        TestCase {
            name: "content only",
            input: "finalizers",
            expected: (30.0, vec!["content match"]),
        },
        TestCase {
            name: "trailing space must appear in the field",
            input: "operators ",
            expected: (0.0, vec![]),
        },
        TestCase {
            name: "leading space matches an inner word boundary",
            input: " operators",
            expected: (100.0, vec!["name match"]),
        },
        TestCase {
            name: "punctuation is matched as typed",
            input: "kube rs",
            expected: (0.0, vec![]),
        },
    ];
    run_table_tests(cases, |query| {
        let scored = score_skill(query, &skill());
        let reasons: Vec<&'static str> = scored
            .reasons
            .into_iter()
            .map(|r| &*Box::leak(r.into_boxed_str()))
            .collect();
        (scored.score, reasons)
    });
}

#[test]
fn boost_caps() {
    let cases = vec![
        TestCase {
            name: "zero",
            input: (0.0, 0.0),
            expected: 0.0,
        },
        TestCase {
            name: "below caps",
            input: (50.0, 2.0),
            expected: 15.0,
        },
        TestCase {
            name: "popularity capped",
            input: (1_000.0, 0.0),
            expected: 20.0,
        },
        TestCase {
            name: "quality capped",
            input: (0.0, 5.0),
            expected: 15.0,
        },
        TestCase {
            name: "both capped",
            input: (500.0, 4.8),
            expected: 35.0,
        },
    ];
    run_table_tests(cases, |(popularity, quality)| {
        boost(&Skill::new("s", "S").with_scores(*popularity, *quality))
    });
}
