// Dataset overview — shows what has been collected and codified so far.

use std::path::Path;

use anyhow::{Context, Result};

/// List every dataset folder under the data dir with its stored artifacts.
pub fn show(data_dir: &str) -> Result<()> {
    let root = Path::new(data_dir);
    if !root.exists() {
        println!("Data directory: not created yet ({data_dir})");
        println!("\nRun `magpie collect` to gather a first dataset.");
        return Ok(());
    }

    let mut folders: Vec<_> = std::fs::read_dir(root)
        .with_context(|| format!("Failed to read {data_dir}"))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();
    folders.sort();

    if folders.is_empty() {
        println!("Data directory: {data_dir} (no datasets yet)");
        return Ok(());
    }

    println!("Datasets in {data_dir}:");
    for folder in folders {
        let name = folder.file_name().unwrap_or_default().to_string_lossy().to_string();

        let mut parts = 0usize;
        let mut rows = 0usize;
        let mut artifacts: Vec<String> = Vec::new();

        for entry in std::fs::read_dir(&folder)?.filter_map(|e| e.ok()) {
            let path = entry.path();
            match path.extension().and_then(|e| e.to_str()) {
                Some("csv") => {
                    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
                    if stem.starts_with("data_") {
                        parts += 1;
                        rows += count_rows(&path);
                    } else {
                        artifacts.push(stem.to_string());
                    }
                }
                Some("json") => {
                    artifacts.push(path.file_stem().unwrap_or_default().to_string_lossy().to_string());
                }
                _ => {}
            }
        }

        println!("  {name}: {parts} parts, {rows} rows");
        if !artifacts.is_empty() {
            artifacts.sort();
            println!("    codified: {}", artifacts.join(", "));
        }
    }

    Ok(())
}

/// Data rows in a CSV part (header excluded). Zero if unreadable.
fn count_rows(path: &Path) -> usize {
    csv::Reader::from_path(path)
        .map(|mut reader| reader.records().filter_map(|r| r.ok()).count())
        .unwrap_or(0)
}
