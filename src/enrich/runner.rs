// Batch runner — drives format -> prompt -> complete -> parse per batch.
//
// Strictly sequential and in input order: downstream consumers re-derive
// per-record results from batch boundaries, so the ordered raw-reply list
// is the primary artifact. Only two suspension points exist — the
// completion call itself and the pacing pause.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::batch::{format_batch, partition, Record};
use super::pacing::PacingPolicy;
use super::parser::{merge, parse_reply};
use super::prompt::{build_prompt, Task, TaskParams};
use super::EnrichError;
use crate::llm::traits::CompletionClient;

/// What to do when a batch's reply cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Abort the whole run (partial output is still returned in the failure).
    FailFast,
    /// Record the batch's ids as a gap and continue with the next batch.
    SkipBatch,
}

/// Options for one codification run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub task: Task,
    pub params: TaskParams,
    pub batch_size: usize,
    pub on_malformed: MalformedPolicy,
}

impl RunOptions {
    pub fn new(task: Task) -> Self {
        Self {
            task,
            params: TaskParams::default(),
            batch_size: 25,
            on_malformed: MalformedPolicy::SkipBatch,
        }
    }
}

/// Accumulated output of a run.
///
/// `replies` holds one raw model reply per contacted batch, in batch order —
/// including batches whose reply later failed to parse (the reply was
/// received; only its content was unusable). `results` is the merged
/// id-to-value map from every batch that parsed; `skipped` names the
/// batches (and their record ids) absent from that map, so gaps are
/// explicit rather than silently fabricated.
#[derive(Debug, Default)]
pub struct RunOutput {
    pub replies: Vec<String>,
    pub results: BTreeMap<String, Value>,
    pub skipped: Vec<SkippedBatch>,
}

/// A batch whose reply was received but not recovered as a JSON object.
#[derive(Debug, Clone)]
pub struct SkippedBatch {
    pub batch_index: usize,
    pub ids: Vec<String>,
    pub reason: String,
}

/// An aborted run. Carries everything accumulated before the failing batch
/// so hours of completed calls are not lost with the error.
#[derive(Debug, Error)]
#[error("codification aborted at batch {batch_index}: {error}")]
pub struct RunFailure {
    pub batch_index: usize,
    #[source]
    pub error: EnrichError,
    pub partial: RunOutput,
}

/// Sequential batch orchestrator over a completion client and pacing policy.
pub struct Enricher<'a> {
    client: &'a dyn CompletionClient,
    pacing: &'a dyn PacingPolicy,
}

impl<'a> Enricher<'a> {
    pub fn new(client: &'a dyn CompletionClient, pacing: &'a dyn PacingPolicy) -> Self {
        Self { client, pacing }
    }

    /// Codify `records` in batches of `opts.batch_size`, in input order.
    ///
    /// `progress` is invoked after each batch with (batches done, batches
    /// total). A `ServiceError` aborts the run; a malformed reply aborts or
    /// skips per `opts.on_malformed`. An empty input completes immediately
    /// with empty output.
    pub async fn run(
        &self,
        records: &[Record],
        opts: &RunOptions,
        progress: impl Fn(usize, usize),
    ) -> Result<RunOutput, RunFailure> {
        let batches = partition(records, opts.batch_size);
        let total = batches.len();
        let mut output = RunOutput::default();

        info!(
            task = opts.task.name(),
            records = records.len(),
            batches = total,
            batch_size = opts.batch_size,
            "Starting codification run"
        );

        for (batch_index, batch) in batches.into_iter().enumerate() {
            let block = format_batch(batch);
            let prompt = build_prompt(opts.task, &block, &opts.params);

            let raw = match self.client.complete(&prompt).await {
                Ok(raw) => raw,
                Err(err) => {
                    warn!(
                        batch_index,
                        completed = output.replies.len(),
                        error = %err,
                        "Completion call failed, aborting run"
                    );
                    return Err(RunFailure {
                        batch_index,
                        error: err.into(),
                        partial: output,
                    });
                }
            };

            match parse_reply(&raw) {
                Ok(parsed) => {
                    debug!(batch_index, ids = parsed.len(), "Parsed batch reply");
                    if let Err(err) = merge(&mut output.results, parsed) {
                        return Err(RunFailure {
                            batch_index,
                            error: err,
                            partial: output,
                        });
                    }
                    output.replies.push(raw);
                }
                Err(err) => match opts.on_malformed {
                    MalformedPolicy::FailFast => {
                        return Err(RunFailure {
                            batch_index,
                            error: err,
                            partial: output,
                        });
                    }
                    MalformedPolicy::SkipBatch => {
                        warn!(batch_index, error = %err, "Unparseable reply, skipping batch");
                        output.skipped.push(SkippedBatch {
                            batch_index,
                            ids: batch.iter().map(|r| r.id.clone()).collect(),
                            reason: err.to_string(),
                        });
                        output.replies.push(raw);
                    }
                },
            }

            progress(batch_index + 1, total);

            if let Some(delay) = self.pacing.delay_after(batch_index) {
                info!(
                    batch_index,
                    delay_secs = delay.as_secs_f64(),
                    done = batch_index + 1,
                    total,
                    "Pacing pause"
                );
                tokio::time::sleep(delay).await;
            }
        }

        info!(
            replies = output.replies.len(),
            results = output.results.len(),
            skipped = output.skipped.len(),
            "Codification run complete"
        );

        Ok(output)
    }
}
