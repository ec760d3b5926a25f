//! Error types for the LandAI pipeline.

use thiserror::Error;
use uuid::Uuid;

/// Result type alias using LandAI's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for pipeline operations.
///
/// The coordinator branches on these variants to pick the user-facing
/// outcome of a pipeline run, so every external boundary (AI provider,
/// county records, database) must classify its failures into this closed
/// set rather than surfacing raw messages.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found, or not owned by the requesting user
    #[error("Not found: {0}")]
    NotFound(String),

    /// Document exists but its initial pipeline never completed extraction
    #[error("Document {0} has no extracted text/terms to re-analyze")]
    IncompleteDocument(Uuid),

    /// PDF text extraction failed
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// Structured lease-term extraction failed
    #[error("Structured extraction error: {0}")]
    StructuredExtraction(String),

    /// Narrative report generation failed
    #[error("Report generation error: {0}")]
    ReportGeneration(String),

    /// AI provider rate/quota limit exhausted. Never retried.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Transient provider unavailability. The only retry-eligible class.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// County not covered by the market-data source
    #[error("County '{0}' is not supported")]
    UnsupportedCounty(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error (missing API key, bad credentials)
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors a bounded-backoff retry may resolve.
    ///
    /// Quota exhaustion is deliberately excluded: retrying a rate-limited
    /// call within the same request burns the remaining budget faster.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Unavailable(_))
    }

    /// True when the provider signalled rate/quota exhaustion.
    pub fn is_quota(&self) -> bool {
        matches!(self, Error::RateLimited(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
