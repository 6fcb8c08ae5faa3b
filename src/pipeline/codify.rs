// Codification pipeline: load dataset -> normalize -> batch-run -> persist.
//
// The batch runner does the protocol work; this pipeline wires it to the
// filesystem and the terminal. Outputs land next to the dataset's CSV
// parts: the raw-reply list and merged map as JSON, plus a joined
// id/text/value table as CSV. An aborted run still persists everything
// accumulated before the failing batch, under a _partial suffix.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use crate::clean;
use crate::config::Config;
use crate::enrich::batch::Record;
use crate::enrich::prompt::{Task, TaskParams};
use crate::enrich::runner::{Enricher, MalformedPolicy, RunOptions, RunOutput};
use crate::llm::openai::OpenAiClient;
use crate::store::dataset::Dataset;
use crate::store::save;

pub struct CodifyArgs {
    /// Dataset name (subfolder under the data dir).
    pub name: String,
    pub task: Task,
    pub batch_size: usize,
    pub max_topics: usize,
    pub target_language: String,
    pub id_column: String,
    pub text_column: String,
    /// Abort the whole run on the first unparseable reply instead of
    /// skipping that batch.
    pub fail_fast: bool,
}

pub async fn run(config: &Config, args: &CodifyArgs) -> Result<()> {
    config.require_openai()?;

    // Step 1: Load the dataset folder
    let folder = Path::new(&config.data_dir).join(&args.name);
    let dataset = Dataset::read_folder(&folder)?;
    println!("Loaded {} rows from {}", dataset.len(), folder.display());

    // Step 2: Project and normalize the text column. The wire format is
    // line-based, so text must be single-line before batching.
    let mut records = dataset.records(&args.id_column, &args.text_column)?;
    for record in &mut records {
        record.text = clean::normalize_single_line(&record.text);
    }
    let before = records.len();
    records.retain(|record| !record.text.is_empty());
    if records.len() < before {
        println!("  Dropped {} rows with empty text", before - records.len());
    }
    if records.is_empty() {
        anyhow::bail!("Nothing to codify — every row has empty text");
    }

    // Step 3: Run the batches sequentially with task-default pacing
    let client = OpenAiClient::new(
        &config.openai_api_url,
        config.openai_api_key.clone(),
        config.openai_model.clone(),
    )?;
    let pacing = args.task.default_pacing();

    let mut opts = RunOptions::new(args.task);
    opts.batch_size = args.batch_size;
    opts.params = TaskParams {
        max_topics: args.max_topics,
        target_language: args.target_language.clone(),
    };
    opts.on_malformed = if args.fail_fast {
        MalformedPolicy::FailFast
    } else {
        MalformedPolicy::SkipBatch
    };

    let batch_count = records.len().div_ceil(opts.batch_size.max(1));
    println!(
        "Codifying {} records in {} batches ({} task, model {})...",
        records.len(),
        batch_count,
        args.task.name(),
        config.openai_model,
    );

    let pb = ProgressBar::new(batch_count as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Batches [{bar:30}] {pos}/{len} ({eta})")
            .unwrap(),
    );

    let enricher = Enricher::new(&client, &pacing);
    let result = enricher
        .run(&records, &opts, |done, _total| pb.set_position(done as u64))
        .await;
    pb.finish_and_clear();

    // Step 4: Persist — an aborted run still saves its partial output
    match result {
        Ok(output) => {
            persist(config, args, &records, &output, "")?;
            summarize(&output);
            Ok(())
        }
        Err(failure) => {
            persist(config, args, &records, &failure.partial, "_partial")?;
            println!(
                "{}",
                format!(
                    "Run aborted at batch {}: {} ({} batches completed first)",
                    failure.batch_index,
                    failure.error,
                    failure.partial.replies.len(),
                )
                .red()
            );
            println!("  Partial output saved with the _partial suffix.");
            Err(anyhow::Error::new(failure).context("Codification aborted"))
        }
    }
}

/// Write the raw replies, the merged map, and the joined table.
fn persist(
    config: &Config,
    args: &CodifyArgs,
    records: &[Record],
    output: &RunOutput,
    suffix: &str,
) -> Result<()> {
    let task = args.task.name();
    let replies = save::save_json(
        &config.data_dir,
        &args.name,
        &format!("{task}_replies{suffix}"),
        &output.replies,
    )?;
    let results = save::save_json(
        &config.data_dir,
        &args.name,
        &format!("{task}_results{suffix}"),
        &output.results,
    )?;
    let table = save::save_results_csv(
        &config.data_dir,
        &args.name,
        &format!("{task}{suffix}"),
        records,
        &output.results,
        task,
    )?;

    println!("  Replies: {}", replies.display());
    println!("  Results: {}", results.display());
    println!("  Table:   {}", table.display());
    Ok(())
}

fn summarize(output: &RunOutput) {
    println!(
        "{}",
        format!(
            "Codified {} records across {} batches",
            output.results.len(),
            output.replies.len(),
        )
        .green()
    );

    if !output.skipped.is_empty() {
        let record_count: usize = output.skipped.iter().map(|s| s.ids.len()).sum();
        println!(
            "{}",
            format!(
                "Skipped {} batches ({} records) with unparseable replies:",
                output.skipped.len(),
                record_count,
            )
            .yellow()
        );
        for skipped in &output.skipped {
            println!("  batch {}: {}", skipped.batch_index, skipped.reason);
        }
        warn!(
            skipped = output.skipped.len(),
            "Some batches produced unparseable replies"
        );
    }
}
