use std::time::Duration;

use crate::error::AppError;

/// Curated guideline sources consulted for every referral, in priority
/// order. Overridable via `GUIDELINE_SOURCES`.
const DEFAULT_GUIDELINE_SOURCES: &[&str] = &[
    "https://cks.nice.org.uk/topics/chest-pain/",
    "https://cks.nice.org.uk/topics/headache-assessment/",
    "https://cks.nice.org.uk/topics/osteoarthritis/",
    "https://www.nice.org.uk/guidance/ng12",
];

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 8;
const DEFAULT_MAX_SITES: usize = 4;
const DEFAULT_PER_SITE_SNIPPETS: usize = 2;
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Application configuration loaded explicitly from environment variables.
///
/// Everything has a working default; the LLM client reads its own settings
/// (`OPENAI_BASE_URL`, `OPENAI_API_KEY`, timeouts) separately.
#[derive(Debug, Clone)]
pub struct Config {
    /// Guideline source URLs, consulted in order.
    pub guideline_sources: Vec<String>,
    /// Per-request timeout for guideline page fetches.
    pub fetch_timeout: Duration,
    /// How many leading sources to consult per request.
    pub max_sites: usize,
    /// Snippet cap per source page.
    pub per_site_snippets: usize,
    /// Chat model used for summarization, Q&A, and recommendations.
    pub model: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `GUIDELINE_SOURCES`: comma-separated URL list replacing the
    ///   built-in curated set
    /// - `GUIDELINE_FETCH_TIMEOUT_SECS` (default 8)
    /// - `TRIAGE_MAX_SITES` (default 4)
    /// - `TRIAGE_PER_SITE_SNIPPETS` (default 2)
    /// - `TRIAGE_MODEL` (default "gpt-4o-mini")
    pub fn from_env() -> Result<Self, AppError> {
        let guideline_sources = match std::env::var("GUIDELINE_SOURCES") {
            Ok(raw) => {
                let sources = parse_source_list(&raw);
                if sources.is_empty() {
                    return Err(AppError::Config(
                        "GUIDELINE_SOURCES is set but contains no URLs".to_string(),
                    ));
                }
                sources
            }
            Err(_) => DEFAULT_GUIDELINE_SOURCES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };

        let fetch_timeout = std::env::var("GUIDELINE_FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS));

        let max_sites = std::env::var("TRIAGE_MAX_SITES")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_SITES);

        let per_site_snippets = std::env::var("TRIAGE_PER_SITE_SNIPPETS")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(DEFAULT_PER_SITE_SNIPPETS);

        let model =
            std::env::var("TRIAGE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Self {
            guideline_sources,
            fetch_timeout,
            max_sites,
            per_site_snippets,
            model,
        })
    }
}

fn parse_source_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
