// In-memory table loaded from a dataset folder's CSV parts.

use std::path::Path;

use anyhow::{Context, Result};

use crate::enrich::batch::Record;

/// A loaded dataset: named columns and string rows.
///
/// Columns are whatever the CSV parts carried — callers name the id and
/// text columns they want projected, so collection and codification agree
/// on schema only at the call site.
#[derive(Debug, Clone)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Read every `*.csv` part in `folder` and concatenate them in
    /// filename order. All parts must share the first part's header.
    pub fn read_folder(folder: &Path) -> Result<Self> {
        let mut part_paths: Vec<_> = std::fs::read_dir(folder)
            .with_context(|| format!("Failed to read dataset folder {}", folder.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "csv"))
            .collect();
        part_paths.sort();

        if part_paths.is_empty() {
            anyhow::bail!(
                "No CSV parts found in {} — run `magpie collect` first",
                folder.display()
            );
        }

        let mut headers: Vec<String> = Vec::new();
        let mut rows: Vec<Vec<String>> = Vec::new();

        for path in &part_paths {
            let mut reader = csv::Reader::from_path(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;

            let part_headers: Vec<String> = reader
                .headers()
                .with_context(|| format!("Failed to read header of {}", path.display()))?
                .iter()
                .map(str::to_string)
                .collect();

            if headers.is_empty() {
                headers = part_headers;
            } else if part_headers != headers {
                anyhow::bail!(
                    "Part {} has a different header than earlier parts \
                     (expected {:?}, got {:?})",
                    path.display(),
                    headers,
                    part_headers
                );
            }

            for record in reader.records() {
                let record =
                    record.with_context(|| format!("Malformed row in {}", path.display()))?;
                rows.push(record.iter().map(str::to_string).collect());
            }
        }

        Ok(Self { headers, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Project the table onto (id, text) records for codification.
    pub fn records(&self, id_column: &str, text_column: &str) -> Result<Vec<Record>> {
        let id_index = self.column_index(id_column)?;
        let text_index = self.column_index(text_column)?;

        Ok(self
            .rows
            .iter()
            .map(|row| Record::new(row[id_index].clone(), row[text_index].clone()))
            .collect())
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.headers.iter().position(|h| h == name).with_context(|| {
            format!(
                "Column {:?} not found — dataset has columns {:?}",
                name, self.headers
            )
        })
    }
}
