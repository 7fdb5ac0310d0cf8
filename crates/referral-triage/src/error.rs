use triage_common::error::CommonError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("config error: {0}")]
    Config(String),

    #[error("failed to ingest {path}: {message}")]
    Ingest { path: String, message: String },

    #[error("unsupported document type: {0}")]
    Unsupported(String),
}
