use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("docx parse error: {0}")]
    DocxParse(String),

    #[error("invalid chunking config: {0}")]
    InvalidChunkConfig(String),
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid response from {backend}: {details}")]
    BackendResponse { backend: String, details: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("backend request failed: {0}")]
    Request(String),
}

#[derive(Debug, Error)]
pub enum RebuildError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
