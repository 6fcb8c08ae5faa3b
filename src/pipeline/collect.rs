// Collection pipeline: search matching posts and store them in parts.
//
// Runs the search in `parts` rounds of up to `count` posts each, saving one
// CSV per round under <data_dir>/<name>/. The search cursor carries across
// rounds, so parts never re-collect the same posts within a run.

use anyhow::Result;
use tracing::info;

use crate::bluesky::client::PublicClient;
use crate::bluesky::search;
use crate::config::Config;
use crate::store::save;

pub async fn run(
    config: &Config,
    query: &str,
    lang: &str,
    count: usize,
    parts: usize,
    name: &str,
) -> Result<()> {
    let client = PublicClient::new(&config.public_api_url)?;

    println!("Collecting posts matching {query:?} ({count} per part, {parts} parts)...");

    let mut cursor: Option<String> = None;
    let mut total: u64 = 0;

    for part in 1..=parts {
        let (posts, next_cursor) =
            search::fetch_matching_posts(&client, query, lang, count, cursor, total).await?;

        if posts.is_empty() {
            println!("  No more matching posts — stopping at part {part}.");
            break;
        }

        let path = save::save_posts_csv(&config.data_dir, name, &format!("data_{part}"), &posts)?;
        total += posts.len() as u64;
        println!("  Part {part}: {} posts -> {}", posts.len(), path.display());
        info!(part, count = posts.len(), "Saved collection part");

        cursor = next_cursor;
        if cursor.is_none() {
            println!("  Search results exhausted after part {part}.");
            break;
        }
    }

    println!("Collected {total} posts into {}/{name}", config.data_dir);
    Ok(())
}
