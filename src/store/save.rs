// Writers for collection parts and codification outputs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::bluesky::search::CollectedPost;
use crate::enrich::batch::Record;

/// Create `<root>/<subfolder>` if missing and return its path.
pub fn ensure_folder(root: &str, subfolder: &str) -> Result<PathBuf> {
    let folder = Path::new(root).join(subfolder);
    if !folder.exists() {
        std::fs::create_dir_all(&folder)
            .with_context(|| format!("Failed to create {}", folder.display()))?;
        info!(folder = %folder.display(), "Created dataset folder");
    }
    Ok(folder)
}

/// Write one collection part as `<root>/<subfolder>/<name>.csv`.
pub fn save_posts_csv(
    root: &str,
    subfolder: &str,
    name: &str,
    posts: &[CollectedPost],
) -> Result<PathBuf> {
    let path = ensure_folder(root, subfolder)?.join(format!("{name}.csv"));

    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for post in posts {
        writer.serialize(post)?;
    }
    writer.flush()?;

    Ok(path)
}

/// Write codified records as `id,text,<value_column>` CSV.
///
/// Records missing from `results` (skipped batches) get an empty value cell
/// rather than being dropped, so gaps stay visible in the output table.
pub fn save_results_csv(
    root: &str,
    subfolder: &str,
    name: &str,
    records: &[Record],
    results: &BTreeMap<String, Value>,
    value_column: &str,
) -> Result<PathBuf> {
    let path = ensure_folder(root, subfolder)?.join(format!("{name}.csv"));

    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    writer.write_record(["id", "text", value_column])?;
    for record in records {
        let value = match results.get(&record.id) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        writer.write_record([&record.id, &record.text, &value])?;
    }
    writer.flush()?;

    Ok(path)
}

/// Serialize any value as pretty JSON at `<root>/<subfolder>/<name>.json`.
pub fn save_json<T: Serialize>(
    root: &str,
    subfolder: &str,
    name: &str,
    value: &T,
) -> Result<PathBuf> {
    let path = ensure_folder(root, subfolder)?.join(format!("{name}.json"));
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
