/// LLM collaborator: summarization, referral Q&A, and guideline-grounded
/// recommendation synthesis over the shared OpenAI-compatible client.
///
/// Prompt construction is deterministic and unit-tested here; the model
/// itself is an opaque text-completion collaborator.
use std::fmt::Write as _;

use triage_common::error::CommonError;
use triage_common::openai::{ChatCompletionRequest, Message, OpenAiClient};

use crate::error::AppError;
use crate::model::{Classification, SnippetRecord};

const SUMMARY_MAX_TOKENS: u32 = 120;
const ANSWER_MAX_TOKENS: u32 = 180;
const RECOMMENDATION_MAX_TOKENS: u32 = 320;

/// Snippets embedded into the recommendation prompt are capped to keep it
/// compact.
const MAX_PROMPT_SNIPPETS: usize = 6;

pub struct TriageAssistant {
    client: OpenAiClient,
    model: String,
}

impl TriageAssistant {
    pub fn new(client: OpenAiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub async fn summarize(&self, text: &str) -> Result<String, AppError> {
        self.complete(summary_prompt(text), SUMMARY_MAX_TOKENS).await
    }

    pub async fn answer_question(&self, question: &str, context: &str) -> Result<String, AppError> {
        self.complete(question_prompt(question, context), ANSWER_MAX_TOKENS)
            .await
    }

    pub async fn recommend(
        &self,
        summary: &str,
        classification: &Classification,
        snippets: &[SnippetRecord],
    ) -> Result<String, AppError> {
        self.complete(
            recommendation_prompt(summary, classification, snippets),
            RECOMMENDATION_MAX_TOKENS,
        )
        .await
    }

    async fn complete(&self, prompt: String, max_tokens: u32) -> Result<String, AppError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![Message::user(prompt)],
            temperature: None,
            max_tokens: Some(max_tokens),
        };
        let text = self
            .client
            .complete_text(request, None)
            .await
            .map_err(CommonError::from)?;
        Ok(text)
    }
}

fn summary_prompt(text: &str) -> String {
    format!("Summarize the following GP referral letter succinctly:\n\n{text}")
}

fn question_prompt(question: &str, context: &str) -> String {
    format!("Referral letter:\n{context}\n\nAnswer concisely:\nQuestion: {question}")
}

fn recommendation_prompt(
    summary: &str,
    classification: &Classification,
    snippets: &[SnippetRecord],
) -> String {
    let mut guideline_text = String::new();
    for record in snippets.iter().take(MAX_PROMPT_SNIPPETS) {
        let _ = writeln!(
            guideline_text,
            "- [{}] {} (Source: {})",
            record.source, record.snippet, record.url
        );
    }
    if guideline_text.is_empty() {
        guideline_text.push_str("- No guideline snippets retrieved.\n");
    }

    let secondary = if classification.secondary_alerts.is_empty() {
        "none".to_string()
    } else {
        classification.secondary_labels().join(", ")
    };

    format!(
        "Referral summary:\n{summary}\n\n\
         Primary triage: {primary}\n\
         Secondary alerts: {secondary}\n\n\
         Guideline highlights:\n{guideline_text}\n\
         As an agentic clinical assistant, provide:\n\
         1. Next-step recommendations (appointment timing windows, conservative measures, investigations).\n\
         2. Rationale referencing the guideline highlights above (general guidance, not patient-specific medical advice).\n\
         3. A short, structured care pathway summary (Primary specialty focus + Secondary considerations).\n\
         Keep it concise, clinical, and practical.",
        primary = classification.primary.label(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Tier, TriageCategory};

    fn classification() -> Classification {
        Classification {
            primary: TriageCategory::new(Tier::Urgent, "Cardiology"),
            secondary_alerts: vec![TriageCategory::new(Tier::Routine, "Orthopedics")],
        }
    }

    fn snippet(source: &str) -> SnippetRecord {
        SnippetRecord {
            source: source.to_string(),
            title: source.to_string(),
            snippet: "refer within two weeks".to_string(),
            url: format!("https://example.org/{source}"),
        }
    }

    #[test]
    fn summary_prompt_embeds_letter() {
        let prompt = summary_prompt("Dear colleague, ...");
        assert!(prompt.starts_with("Summarize the following GP referral letter"));
        assert!(prompt.ends_with("Dear colleague, ..."));
    }

    #[test]
    fn question_prompt_orders_context_then_question() {
        let prompt = question_prompt("When to refer?", "letter body");
        let context_pos = prompt.find("letter body").unwrap();
        let question_pos = prompt.find("When to refer?").unwrap();
        assert!(context_pos < question_pos);
    }

    #[test]
    fn recommendation_prompt_lists_snippets() {
        let prompt = recommendation_prompt("summary", &classification(), &[snippet("CKS")]);
        assert!(prompt.contains("Primary triage: Urgent - Cardiology"));
        assert!(prompt.contains("Secondary alerts: Routine - Orthopedics"));
        assert!(prompt.contains("- [CKS] refer within two weeks (Source: https://example.org/CKS)"));
        assert!(!prompt.contains("No guideline snippets retrieved"));
    }

    #[test]
    fn recommendation_prompt_caps_snippets() {
        let snippets: Vec<SnippetRecord> = (0..10).map(|i| snippet(&format!("s{i}"))).collect();
        let prompt = recommendation_prompt("summary", &classification(), &snippets);
        assert!(prompt.contains("[s5]"));
        assert!(!prompt.contains("[s6]"));
    }

    #[test]
    fn recommendation_prompt_placeholder_when_no_snippets() {
        let mut classification = classification();
        classification.secondary_alerts.clear();
        let prompt = recommendation_prompt("summary", &classification, &[]);
        assert!(prompt.contains("- No guideline snippets retrieved."));
        assert!(prompt.contains("Secondary alerts: none"));
    }
}
