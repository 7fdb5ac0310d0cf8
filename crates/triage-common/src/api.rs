use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TriageReferralParams {
    /// Full text of the referral document (already extracted from its file format).
    pub document_text: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ClassifySummaryParams {
    /// Referral summary text to classify into a priority/specialty bucket.
    pub summary: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FetchSnippetsParams {
    /// Query terms to match against the configured guideline sources.
    pub terms: Vec<String>,
    /// Maximum number of guideline sources to consult (default: configured cap).
    pub max_sites: Option<u32>,
    /// Maximum snippets to extract per source (default: configured cap).
    pub per_site_snippets: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct IngestDocumentParams {
    /// Filesystem path to the referral document (.txt, .md, .pdf, .html).
    pub path: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SummarizeReferralParams {
    /// Referral letter text to summarize.
    pub text: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AnswerQuestionParams {
    /// The question to answer.
    pub question: String,
    /// Referral letter text providing the context.
    pub context: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClassificationResponse {
    /// Primary category label, e.g. "Urgent - Cardiology".
    pub primary: String,
    /// Distinct other-specialty category labels, sorted lexicographically.
    pub secondary_alerts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SnippetResult {
    pub source: String,
    pub title: String,
    pub snippet: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FailedSource {
    pub url: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FetchSnippetsResponse {
    pub snippets: Vec<SnippetResult>,
    /// Sources that could not be fetched or parsed; never fatal.
    pub failed_sources: Vec<FailedSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TriageReportResponse {
    pub summary: String,
    pub classification: ClassificationResponse,
    pub snippets: Vec<SnippetResult>,
    pub failed_sources: Vec<FailedSource>,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TextResponse {
    pub text: String,
}
