use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use magpie::config::Config;
use magpie::enrich::prompt::Task;
use magpie::pipeline::{codify, collect};

/// Magpie: social listening with LLM-batched text codification.
///
/// Collects Bluesky posts matching search terms into CSV datasets, then
/// codifies the stored text in batches (topics, sentiment, translation,
/// spelling correction) through a chat-completion endpoint.
#[derive(Parser)]
#[command(name = "magpie", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect posts matching a search query into a named dataset
    Collect {
        /// Search query (Bluesky full-text search syntax)
        #[arg(long)]
        query: String,

        /// Post language filter (default: es)
        #[arg(long, default_value = "es")]
        lang: String,

        /// Posts to collect per part (default: 100)
        #[arg(long, default_value = "100")]
        count: usize,

        /// Number of parts (search rounds) to collect (default: 3)
        #[arg(long, default_value = "3")]
        parts: usize,

        /// Dataset name — the subfolder the parts are saved under
        #[arg(long)]
        name: String,
    },

    /// Codify a collected dataset with an LLM task
    Enrich {
        /// Dataset name to codify
        #[arg(long)]
        name: String,

        /// Which codification to request
        #[arg(long, value_enum)]
        task: TaskArg,

        /// Records per batch (default: 25)
        #[arg(long, default_value = "25")]
        batch_size: usize,

        /// Max topics per record (topics task only)
        #[arg(long, default_value = "3")]
        max_topics: usize,

        /// Target language (translation task only)
        #[arg(long, default_value = "inglés")]
        lang: String,

        /// Column holding the record identifier
        #[arg(long, default_value = "id")]
        id_column: String,

        /// Column holding the text to codify
        #[arg(long, default_value = "text")]
        text_column: String,

        /// Abort the whole run on the first unparseable reply
        /// (default: skip the batch and report the gap)
        #[arg(long)]
        fail_fast: bool,
    },

    /// Show collected datasets and their codification artifacts
    Status,
}

#[derive(Clone, Copy, ValueEnum)]
enum TaskArg {
    Topics,
    Sentiment,
    Translation,
    Spelling,
}

impl From<TaskArg> for Task {
    fn from(arg: TaskArg) -> Self {
        match arg {
            TaskArg::Topics => Task::Topics,
            TaskArg::Sentiment => Task::Sentiment,
            TaskArg::Translation => Task::Translation,
            TaskArg::Spelling => Task::Spelling,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("magpie=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Collect {
            query,
            lang,
            count,
            parts,
            name,
        } => {
            collect::run(&config, &query, &lang, count, parts, &name).await?;
        }

        Commands::Enrich {
            name,
            task,
            batch_size,
            max_topics,
            lang,
            id_column,
            text_column,
            fail_fast,
        } => {
            let args = codify::CodifyArgs {
                name,
                task: task.into(),
                batch_size,
                max_topics,
                target_language: lang,
                id_column,
                text_column,
                fail_fast,
            };
            codify::run(&config, &args).await?;
        }

        Commands::Status => {
            magpie::status::show(&config.data_dir)?;
        }
    }

    Ok(())
}
