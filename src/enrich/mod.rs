// Batch codification — turning stored text into LLM-derived annotations.
//
// The flow is one-directional: records -> batches -> prompts -> raw replies
// -> parsed id/value maps -> merged output. Each submodule owns one stage;
// the runner drives them in sequence.

pub mod batch;
pub mod pacing;
pub mod parser;
pub mod prompt;
pub mod runner;

use thiserror::Error;

use crate::llm::traits::ServiceError;

/// Failure kinds of the codification pipeline.
///
/// `Service` failures are transient (endpoint down, rate limited) and may
/// warrant retrying the same batch from outside. `MalformedResponse` means
/// the model's reply could not be recovered as a JSON object — retrying the
/// identical prompt rarely helps, so callers can choose to skip the batch
/// instead (see `runner::MalformedPolicy`).
#[derive(Debug, Error)]
pub enum EnrichError {
    /// The completion endpoint failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The model reply is not recoverable as a JSON object.
    #[error("model reply is not a JSON object: {0}")]
    MalformedResponse(String),

    /// The same record id was contributed by more than one batch. Batches
    /// partition the input, so this indicates a slicing bug or a model
    /// reply that invented ids belonging to another batch.
    #[error("record id {0:?} appears in more than one batch")]
    PartitionViolation(String),
}
