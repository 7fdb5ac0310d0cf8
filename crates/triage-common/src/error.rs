/// Error types shared across the triage server crates.
///
/// These errors represent failures in infrastructure components (HTTP fetches,
/// the upstream LLM API) that sit underneath the triage pipeline.
/// Application-specific errors should be defined in the server crate and wrap
/// `CommonError` via `#[from]`.

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("llm error: {0}")]
    Llm(#[from] crate::openai::OpenAiClientError),
}
