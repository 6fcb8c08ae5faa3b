// Post search — paginated full-text search via the public API.
//
// Collection replaces a streaming listener with repeated searchPosts calls:
// each call pulls a page of matching posts, and the cursor carries across
// parts so consecutive parts don't re-collect the same posts.

use anyhow::{Context, Result};
use atrium_api::app::bsky::feed::search_posts;
use atrium_api::types::TryFromUnknown;
use serde::Serialize;
use tracing::{debug, info};

use super::client::PublicClient;

/// One collected post, flattened to the columns the dataset CSV carries.
///
/// `id` is a run-wide sequence number — the stable row identifier that
/// codification later uses to tag batch lines.
#[derive(Debug, Clone, Serialize)]
pub struct CollectedPost {
    pub id: u64,
    pub uri: String,
    pub author: String,
    pub created_at: String,
    pub collected_at: String,
    pub text: String,
    pub likes: i64,
    pub reposts: i64,
}

/// Fetch up to `max_posts` posts matching `query`, handling pagination.
///
/// `lang` filters posts by language tag. `first_id` seeds the sequence ids
/// so parts collected in one run number their rows contiguously. Returns
/// the collected posts plus the cursor to resume from (None when the
/// result set is exhausted).
pub async fn fetch_matching_posts(
    client: &PublicClient,
    query: &str,
    lang: &str,
    max_posts: usize,
    mut cursor: Option<String>,
    first_id: u64,
) -> Result<(Vec<CollectedPost>, Option<String>)> {
    let mut posts: Vec<CollectedPost> = Vec::new();
    let collected_at = chrono::Utc::now().to_rfc3339();

    // How many to request per page (API max is 100).
    let page_size = max_posts.min(100).to_string();

    loop {
        let mut params: Vec<(&str, &str)> = vec![
            ("q", query),
            ("lang", lang),
            ("limit", &page_size),
        ];
        if let Some(ref c) = cursor {
            params.push(("cursor", c));
        }

        let output: search_posts::Output = client
            .xrpc_get("app.bsky.feed.searchPosts", &params)
            .await
            .with_context(|| format!("Search failed for query {query:?}"))?;

        for post_view in &output.posts {
            // Decode the record to get the post text. The record field is
            // an untyped IPLD value — we deserialize it into the typed
            // post::Record to access the text.
            let text = atrium_api::app::bsky::feed::post::Record::try_from_unknown(
                post_view.record.clone(),
            )
            .map(|record| record.data.text.clone())
            .unwrap_or_default();

            // Skip empty and very short posts (likely just links/images).
            // Char count, not byte length — emoji sequences inflate bytes.
            if text.chars().count() < 15 {
                continue;
            }

            posts.push(CollectedPost {
                id: first_id + posts.len() as u64,
                uri: post_view.uri.clone(),
                author: post_view.author.handle.as_ref().to_string(),
                created_at: post_view.indexed_at.as_ref().to_string(),
                collected_at: collected_at.clone(),
                text,
                likes: post_view.like_count.unwrap_or(0),
                reposts: post_view.repost_count.unwrap_or(0),
            });

            if posts.len() >= max_posts {
                break;
            }
        }

        debug!(
            page_posts = output.posts.len(),
            total_collected = posts.len(),
            "Fetched search page for {:?}",
            query
        );

        cursor = output.data.cursor.clone();

        // Stop if we have enough posts or there are no more pages
        if posts.len() >= max_posts || cursor.is_none() || output.posts.is_empty() {
            break;
        }
    }

    info!(
        count = posts.len(),
        query = query,
        "Collected matching posts"
    );

    Ok((posts, cursor))
}
