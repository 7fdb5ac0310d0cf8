/// Multi-system triage classifier.
///
/// Maps a free-text referral summary to a primary priority/specialty
/// category plus a set of secondary specialty alerts, driven entirely by
/// the static keyword rule table. Pure and total: every input string,
/// including an empty one, produces a valid result.
use crate::model::{CategoryRule, Classification, Tier, TriageCategory};
use crate::rules::fallback_category;

/// Classify a referral summary against the rule table.
///
/// Matching is case-insensitive substring search over the lower-cased
/// summary. Rules are scanned tier by tier (`Urgent`, `Semi-Urgent`,
/// `Routine`) and, within a tier, in table declaration order. The first
/// matching rule becomes the primary category; every later matching rule
/// becomes a secondary alert unless its specialty equals the primary's.
/// Alerts are deduplicated and sorted lexicographically by label.
///
/// Single-pass semantics: a rule that matches *before* the primary is fixed
/// can only become the primary itself, never an alert. This mirrors the
/// shipped behavior and is relied on by downstream consumers.
pub fn classify(summary: &str, rules: &[CategoryRule]) -> Classification {
    let summary = summary.to_lowercase();

    let mut primary: Option<TriageCategory> = None;
    let mut secondary: Vec<TriageCategory> = Vec::new();

    for tier in Tier::ALL {
        for rule in rules.iter().filter(|r| r.category.tier == tier) {
            let matched = rule.keywords.iter().any(|kw| summary.contains(kw.as_str()));
            if !matched {
                continue;
            }
            match &primary {
                None => primary = Some(rule.category.clone()),
                Some(p) => {
                    // Same-specialty suppression: a lower-tier match for the
                    // primary's own specialty is not an alert.
                    if rule.category.specialty != p.specialty {
                        secondary.push(rule.category.clone());
                    }
                }
            }
        }
    }

    secondary.sort_by_key(|c| c.label());
    secondary.dedup();

    Classification {
        primary: primary.unwrap_or_else(fallback_category),
        secondary_alerts: secondary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::default_rules;

    fn run(summary: &str) -> Classification {
        classify(summary, &default_rules())
    }

    #[test]
    fn urgent_keyword_becomes_primary_with_no_alerts() {
        let result = run("patient reports chest pain and shortness of breath");
        assert_eq!(result.primary.label(), "Urgent - Cardiology");
        assert!(result.secondary_alerts.is_empty());
    }

    #[test]
    fn higher_tier_wins_regardless_of_keyword_position() {
        // Routine keyword first in the text, urgent keyword last.
        let result = run("longstanding knee pain, but now new rectal bleeding");
        assert_eq!(result.primary.label(), "Urgent - Gastroenterology");
        assert_eq!(result.secondary_labels(), vec!["Routine - Orthopedics"]);

        // Same keywords, reversed order in the text: identical outcome.
        let reversed = run("new rectal bleeding; longstanding knee pain");
        assert_eq!(reversed.primary, result.primary);
        assert_eq!(reversed.secondary_alerts, result.secondary_alerts);
    }

    #[test]
    fn no_match_falls_back_to_routine_general_medicine() {
        let result = run("entirely unremarkable correspondence");
        assert_eq!(result.primary.label(), "Routine - General Medicine");
        assert!(result.secondary_alerts.is_empty());
    }

    #[test]
    fn empty_summary_is_valid_input() {
        let result = run("");
        assert_eq!(result.primary.label(), "Routine - General Medicine");
        assert!(result.secondary_alerts.is_empty());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let result = run("PATIENT REPORTS CHEST PAIN");
        assert_eq!(result.primary.label(), "Urgent - Cardiology");
    }

    #[test]
    fn cross_specialty_cross_tier_alerts() {
        let result = run("intermittent numbness and tingling in the leg, also mild stiffness");
        assert_eq!(result.primary.label(), "Semi-Urgent - Neurology");
        let labels = result.secondary_labels();
        assert!(labels.contains(&"Routine - Orthopedics".to_string()));
        assert!(
            labels.iter().all(|l| !l.contains("Neurology")),
            "no Neurology label may appear as an alert: {labels:?}"
        );
    }

    #[test]
    fn same_specialty_lower_tier_match_is_suppressed() {
        // "chest pain" fixes Urgent - Cardiology; "ankle swelling" matches
        // Semi-Urgent - Cardiology and must be suppressed.
        let result = run("chest pain with ankle swelling and a new rash");
        assert_eq!(result.primary.label(), "Urgent - Cardiology");
        assert_eq!(result.secondary_labels(), vec!["Routine - Dermatology"]);
    }

    #[test]
    fn alerts_are_sorted_and_deduplicated() {
        let result = run("chest pain, stiffness, itching, wheeze");
        let labels = result.secondary_labels();
        let mut sorted = labels.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(labels, sorted);
        assert_eq!(
            labels,
            vec![
                "Routine - Dermatology",
                "Routine - Orthopedics",
                "Semi-Urgent - Respiratory",
            ]
        );
    }

    #[test]
    fn multiple_keywords_of_one_rule_count_once() {
        let result = run("numbness, tingling and tremor for three weeks");
        assert_eq!(result.primary.label(), "Semi-Urgent - Neurology");
        assert!(result.secondary_alerts.is_empty());
    }

    #[test]
    fn deterministic_for_identical_input() {
        let a = run("abdominal pain and fatigue");
        let b = run("abdominal pain and fatigue");
        assert_eq!(a, b);
    }
}

#[cfg(test)]
mod properties {
    use proptest::prelude::*;

    use super::classify;
    use crate::rules::default_rules;

    /// Every keyword phrase from the default table.
    fn keyword_pool() -> Vec<String> {
        default_rules()
            .iter()
            .flat_map(|r| r.keywords.iter().cloned())
            .collect()
    }

    fn summary_strategy() -> impl Strategy<Value = String> {
        let pool = keyword_pool();
        let n = pool.len();
        prop::collection::vec(0..n, 0..6).prop_map(move |indices| {
            indices
                .iter()
                .map(|&i| pool[i].clone())
                .collect::<Vec<_>>()
                .join(", patient also notes ")
        })
    }

    proptest! {
        #[test]
        fn primary_specialty_never_appears_in_alerts(summary in summary_strategy()) {
            let rules = default_rules();
            let result = classify(&summary, &rules);
            prop_assert!(
                result
                    .secondary_alerts
                    .iter()
                    .all(|c| c.specialty != result.primary.specialty),
                "primary {} leaked into alerts {:?}",
                result.primary,
                result.secondary_labels()
            );
        }

        #[test]
        fn alerts_are_sorted_unique(summary in summary_strategy()) {
            let result = classify(&summary, &default_rules());
            let labels = result.secondary_labels();
            let mut expected = labels.clone();
            expected.sort();
            expected.dedup();
            prop_assert_eq!(labels, expected);
        }

        #[test]
        fn total_over_arbitrary_text(summary in ".{0,400}") {
            // Never panics, always yields exactly one primary.
            let result = classify(&summary, &default_rules());
            prop_assert!(!result.primary.specialty.is_empty());
        }
    }
}
