/// MCP server implementation for the referral triage assistant.
///
/// Exposes six tools:
/// - `triage_referral`: Full pipeline over a referral document's text
/// - `classify_summary`: Keyword triage of a summary only
/// - `fetch_guideline_snippets`: Fetch sources and extract matching snippets
/// - `summarize_referral`: LLM summarization only
/// - `answer_question`: Concise Q&A grounded in the referral text
/// - `ingest_document`: Extract text from a document on disk
use std::path::Path;
use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};

use crate::classify::classify;
use crate::fetch::FailedFetch;
use crate::ingest::ingest_file;
use crate::model::{Classification, SnippetRecord};
use crate::pipeline::TriagePipeline;
use triage_common::api::{
    AnswerQuestionParams, ClassificationResponse, ClassifySummaryParams, FailedSource,
    FetchSnippetsParams, FetchSnippetsResponse, IngestDocumentParams, SnippetResult,
    SummarizeReferralParams, TextResponse, TriageReferralParams, TriageReportResponse,
};

/// Hard ceilings for caller-supplied snippet caps.
const MAX_SITES_CEILING: usize = 8;
const PER_SITE_SNIPPETS_CEILING: usize = 10;

#[derive(Clone)]
pub struct ReferralTriageServer {
    pipeline: Arc<TriagePipeline>,
    tool_router: ToolRouter<ReferralTriageServer>,
}

impl ReferralTriageServer {
    pub fn new(pipeline: Arc<TriagePipeline>) -> Self {
        Self {
            pipeline,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl ReferralTriageServer {
    #[tool(description = "Run the full triage pipeline over a referral document's text: summarize, classify priority/specialty, collect guideline snippets, and synthesize a recommendation.")]
    async fn triage_referral(
        &self,
        Parameters(params): Parameters<TriageReferralParams>,
    ) -> Result<Json<TriageReportResponse>, String> {
        let document_text = params.document_text.trim().to_string();
        if document_text.is_empty() {
            return Err("document_text must not be empty".to_string());
        }

        let report = self
            .pipeline
            .run(&document_text)
            .await
            .map_err(|e| format!("triage failed: {e}"))?;

        Ok(Json(TriageReportResponse {
            summary: report.summary,
            classification: to_api_classification(&report.classification),
            snippets: to_api_snippets(report.snippets),
            failed_sources: to_api_failed(report.failed_sources),
            recommendation: report.recommendation,
        }))
    }

    #[tool(description = "Classify a referral summary into a priority/specialty bucket (e.g. 'Urgent - Cardiology') with secondary specialty alerts. Deterministic keyword triage; no LLM involved.")]
    async fn classify_summary(
        &self,
        Parameters(params): Parameters<ClassifySummaryParams>,
    ) -> Result<Json<ClassificationResponse>, String> {
        let summary = params.summary.trim().to_string();
        if summary.is_empty() {
            return Err("summary must not be empty".to_string());
        }

        let classification = classify(&summary, self.pipeline.rules());
        Ok(Json(to_api_classification(&classification)))
    }

    #[tool(description = "Fetch the configured guideline sources and extract short snippets matching the query terms. Sources that fail to fetch are reported, never fatal.")]
    async fn fetch_guideline_snippets(
        &self,
        Parameters(params): Parameters<FetchSnippetsParams>,
    ) -> Result<Json<FetchSnippetsResponse>, String> {
        let config = self.pipeline.config();
        let max_sites = params
            .max_sites
            .map(|n| n as usize)
            .unwrap_or(config.max_sites)
            .min(MAX_SITES_CEILING);
        let per_site_snippets = params
            .per_site_snippets
            .map(|n| n as usize)
            .unwrap_or(config.per_site_snippets)
            .min(PER_SITE_SNIPPETS_CEILING);

        let (snippets, failed) = self
            .pipeline
            .guideline_snippets(&params.terms, max_sites, per_site_snippets)
            .await;

        Ok(Json(FetchSnippetsResponse {
            snippets: to_api_snippets(snippets),
            failed_sources: to_api_failed(failed),
        }))
    }

    #[tool(description = "Summarize a GP referral letter succinctly.")]
    async fn summarize_referral(
        &self,
        Parameters(params): Parameters<SummarizeReferralParams>,
    ) -> Result<Json<TextResponse>, String> {
        let text = params.text.trim().to_string();
        if text.is_empty() {
            return Err("text must not be empty".to_string());
        }

        let summary = self
            .pipeline
            .assistant()
            .summarize(&text)
            .await
            .map_err(|e| format!("summarize failed: {e}"))?;
        Ok(Json(TextResponse { text: summary }))
    }

    #[tool(description = "Answer a question concisely, grounded in the supplied referral letter text.")]
    async fn answer_question(
        &self,
        Parameters(params): Parameters<AnswerQuestionParams>,
    ) -> Result<Json<TextResponse>, String> {
        let question = params.question.trim().to_string();
        if question.is_empty() {
            return Err("question must not be empty".to_string());
        }
        let context = params.context.trim().to_string();
        if context.is_empty() {
            return Err("context must not be empty".to_string());
        }

        let answer = self
            .pipeline
            .assistant()
            .answer_question(&question, &context)
            .await
            .map_err(|e| format!("answer failed: {e}"))?;
        Ok(Json(TextResponse { text: answer }))
    }

    #[tool(description = "Extract plain text from a referral document on disk (.txt, .md, .docx, .pdf, .html). Feed the result to triage_referral or summarize_referral.")]
    async fn ingest_document(
        &self,
        Parameters(params): Parameters<IngestDocumentParams>,
    ) -> Result<Json<TextResponse>, String> {
        let path = params.path.trim().to_string();
        if path.is_empty() {
            return Err("path must not be empty".to_string());
        }

        let text =
            ingest_file(Path::new(&path)).map_err(|e| format!("ingest failed: {e}"))?;
        Ok(Json(TextResponse { text }))
    }
}

fn to_api_classification(classification: &Classification) -> ClassificationResponse {
    ClassificationResponse {
        primary: classification.primary.label(),
        secondary_alerts: classification.secondary_labels(),
    }
}

fn to_api_snippets(snippets: Vec<SnippetRecord>) -> Vec<SnippetResult> {
    snippets
        .into_iter()
        .map(|s| SnippetResult {
            source: s.source,
            title: s.title,
            snippet: s.snippet,
            url: s.url,
        })
        .collect()
}

fn to_api_failed(failed: Vec<FailedFetch>) -> Vec<FailedSource> {
    failed
        .into_iter()
        .map(|f| FailedSource {
            url: f.url,
            reason: f.reason,
        })
        .collect()
}

#[tool_handler]
impl ServerHandler for ReferralTriageServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "referral-triage".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Referral triage MCP server. Use ingest_document to extract text from a \
                 referral file, triage_referral for the full summarize/classify/guideline/\
                 recommend pipeline, classify_summary for deterministic keyword triage of an \
                 existing summary, fetch_guideline_snippets for guideline highlights by query \
                 term, and summarize_referral/answer_question for standalone LLM operations."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ReferralTriageServer;

    #[test]
    fn tools_publish_output_schemas() {
        let tools = ReferralTriageServer::tool_router().list_all();
        for name in [
            "triage_referral",
            "classify_summary",
            "fetch_guideline_snippets",
            "summarize_referral",
            "answer_question",
            "ingest_document",
        ] {
            let tool = tools
                .iter()
                .find(|t| t.name == name)
                .unwrap_or_else(|| panic!("missing tool: {name}"));
            assert!(
                tool.output_schema.is_some(),
                "tool {name} should publish output_schema"
            );
        }
    }
}
