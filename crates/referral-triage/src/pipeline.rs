/// End-to-end referral processing.
///
/// One document per invocation: summarize, classify, derive query terms,
/// fetch guideline sources, select snippets from the successful fetches,
/// then synthesize a recommendation. Request-scoped; nothing is cached or
/// persisted between runs.
use tracing::info;

use crate::classify::classify;
use crate::config::Config;
use crate::error::AppError;
use crate::fetch::{partition_outcomes, FailedFetch, GuidelineFetcher};
use crate::llm::TriageAssistant;
use crate::model::{CategoryRule, Classification, SnippetRecord};
use crate::snippet::select_snippets;

/// Upper bound on derived query terms handed to the snippet selector.
const MAX_QUERY_TERMS: usize = 8;

/// Everything produced for one referral document.
#[derive(Debug, Clone)]
pub struct TriageReport {
    pub summary: String,
    pub classification: Classification,
    pub snippets: Vec<SnippetRecord>,
    pub failed_sources: Vec<FailedFetch>,
    pub recommendation: String,
}

pub struct TriagePipeline {
    config: Config,
    assistant: TriageAssistant,
    fetcher: GuidelineFetcher,
    rules: Vec<CategoryRule>,
}

impl TriagePipeline {
    pub fn new(
        config: Config,
        assistant: TriageAssistant,
        fetcher: GuidelineFetcher,
        rules: Vec<CategoryRule>,
    ) -> Self {
        Self {
            config,
            assistant,
            fetcher,
            rules,
        }
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn assistant(&self) -> &TriageAssistant {
        &self.assistant
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the full pipeline for one referral document.
    pub async fn run(&self, document_text: &str) -> Result<TriageReport, AppError> {
        let summary = self.assistant.summarize(document_text).await?;
        info!(chars = summary.chars().count(), "referral summarized");

        let classification = classify(&summary, &self.rules);
        info!(
            primary = %classification.primary,
            alerts = classification.secondary_alerts.len(),
            "summary classified"
        );

        let terms = derive_query_terms(&classification, &summary, &self.rules);
        let (snippets, failed_sources) = self
            .guideline_snippets(&terms, self.config.max_sites, self.config.per_site_snippets)
            .await;
        info!(
            terms = terms.len(),
            snippets = snippets.len(),
            failed_sources = failed_sources.len(),
            "guideline highlights collected"
        );

        let recommendation = self
            .assistant
            .recommend(&summary, &classification, &snippets)
            .await?;

        Ok(TriageReport {
            summary,
            classification,
            snippets,
            failed_sources,
            recommendation,
        })
    }

    /// Fetch the leading `max_sites` configured sources and select snippets
    /// from whatever fetched successfully.
    pub async fn guideline_snippets(
        &self,
        terms: &[String],
        max_sites: usize,
        per_site_snippets: usize,
    ) -> (Vec<SnippetRecord>, Vec<FailedFetch>) {
        let urls: Vec<String> = self
            .config
            .guideline_sources
            .iter()
            .take(max_sites)
            .cloned()
            .collect();

        let outcomes = self.fetcher.fetch_all(&urls).await;
        let (pages, failed) = partition_outcomes(outcomes);
        let snippets = select_snippets(terms, &pages, max_sites, per_site_snippets);
        (snippets, failed)
    }
}

/// Derive guideline query terms from a classification and the summary:
/// the primary specialty, then secondary specialties, then every rule
/// keyword present in the summary. Lower-cased, order-preserving dedup,
/// capped at `MAX_QUERY_TERMS`.
pub fn derive_query_terms(
    classification: &Classification,
    summary: &str,
    rules: &[CategoryRule],
) -> Vec<String> {
    let lowered = summary.to_lowercase();

    let mut candidates: Vec<String> = vec![classification.primary.specialty.to_lowercase()];
    candidates.extend(
        classification
            .secondary_alerts
            .iter()
            .map(|c| c.specialty.to_lowercase()),
    );
    for rule in rules {
        for keyword in &rule.keywords {
            if lowered.contains(keyword.as_str()) {
                candidates.push(keyword.clone());
            }
        }
    }

    let mut terms: Vec<String> = Vec::new();
    for candidate in candidates {
        if !terms.contains(&candidate) {
            terms.push(candidate);
        }
        if terms.len() == MAX_QUERY_TERMS {
            break;
        }
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::rules::default_rules;

    #[test]
    fn terms_start_with_primary_specialty() {
        let rules = default_rules();
        let summary = "patient reports chest pain and shortness of breath";
        let classification = classify(summary, &rules);
        let terms = derive_query_terms(&classification, summary, &rules);
        assert_eq!(terms[0], "cardiology");
        assert!(terms.contains(&"chest pain".to_string()));
        assert!(terms.contains(&"shortness of breath".to_string()));
    }

    #[test]
    fn terms_include_secondary_specialties() {
        let rules = default_rules();
        let summary = "intermittent numbness and tingling in the leg, also mild stiffness";
        let classification = classify(summary, &rules);
        let terms = derive_query_terms(&classification, summary, &rules);
        assert_eq!(terms[0], "neurology");
        assert!(terms.contains(&"orthopedics".to_string()));
        assert!(terms.contains(&"stiffness".to_string()));
    }

    #[test]
    fn terms_are_deduplicated_and_capped() {
        let rules = default_rules();
        let summary = "chest pain, palpitations, syncope, numbness, tingling, \
                       stiffness, rash, wheeze, fatigue";
        let classification = classify(summary, &rules);
        let terms = derive_query_terms(&classification, summary, &rules);
        assert!(terms.len() <= MAX_QUERY_TERMS);
        let mut sorted = terms.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), terms.len(), "terms must be unique: {terms:?}");
    }

    #[test]
    fn fallback_classification_still_yields_a_term() {
        let rules = default_rules();
        let summary = "nothing recognizable";
        let classification = classify(summary, &rules);
        let terms = derive_query_terms(&classification, summary, &rules);
        assert_eq!(terms, vec!["general medicine"]);
    }
}
