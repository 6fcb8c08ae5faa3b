// Completion client trait and its error taxonomy.

use async_trait::async_trait;
use thiserror::Error;

/// Failure of one completion call. All variants are transport-level — the
/// model's reply content is never inspected here.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Network failure, or a transport response too broken to read.
    #[error("completion transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered HTTP 429 — back off before retrying.
    #[error("completion endpoint rate limited (HTTP 429): {body}")]
    RateLimited { body: String },

    /// Any other non-success HTTP status (quota exhausted, bad request, 5xx).
    #[error("completion endpoint returned HTTP {status}: {body}")]
    Http {
        status: reqwest::StatusCode,
        body: String,
    },

    /// A well-formed response that contained no completion at all.
    #[error("completion response contained no choices")]
    EmptyCompletion,
}

impl ServiceError {
    /// Whether this failure is a rate-limit signal worth backing off on.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ServiceError::RateLimited { .. })
    }
}

/// A single request/response call to the external model.
///
/// Implementations send one prompt and return the raw text reply. They do
/// not batch, retry, or pace — that is the runner's responsibility.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ServiceError>;
}
