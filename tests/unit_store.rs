// Dataset storage round-trips under temporary directories.

use std::collections::BTreeMap;

use serde_json::{json, Value};

use magpie::bluesky::search::CollectedPost;
use magpie::enrich::batch::Record;
use magpie::store::dataset::Dataset;
use magpie::store::save;

fn post(id: u64, text: &str) -> CollectedPost {
    CollectedPost {
        id,
        uri: format!("at://did:plc:abc/app.bsky.feed.post/{id}"),
        author: "someone.bsky.social".to_string(),
        created_at: "2026-08-01T12:00:00Z".to_string(),
        collected_at: "2026-08-02T09:30:00Z".to_string(),
        text: text.to_string(),
        likes: 1,
        reposts: 0,
    }
}

#[test]
fn collection_parts_roundtrip_through_read_folder() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_str().unwrap();

    save::save_posts_csv(root, "demo", "data_1", &[post(0, "hola"), post(1, "adiós")]).unwrap();
    save::save_posts_csv(root, "demo", "data_2", &[post(2, "buenos días")]).unwrap();

    let dataset = Dataset::read_folder(&dir.path().join("demo")).unwrap();
    assert_eq!(dataset.len(), 3);

    let records = dataset.records("id", "text").unwrap();
    assert_eq!(records[0], Record::new("0", "hola"));
    assert_eq!(records[1], Record::new("1", "adiós"));
    assert_eq!(records[2], Record::new("2", "buenos días"));
}

#[test]
fn read_folder_without_parts_fails_with_hint() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("empty")).unwrap();

    let err = Dataset::read_folder(&dir.path().join("empty")).unwrap_err();
    assert!(err.to_string().contains("magpie collect"));
}

#[test]
fn read_folder_rejects_mismatched_part_headers() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join("broken");
    std::fs::create_dir(&folder).unwrap();
    std::fs::write(folder.join("data_1.csv"), "id,text\n0,hola\n").unwrap();
    std::fs::write(folder.join("data_2.csv"), "id,body\n1,adiós\n").unwrap();

    let err = Dataset::read_folder(&folder).unwrap_err();
    assert!(err.to_string().contains("different header"));
}

#[test]
fn results_csv_leaves_empty_cells_for_gaps() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_str().unwrap();

    let records = vec![Record::new("0", "great"), Record::new("1", "bad")];
    let mut results: BTreeMap<String, Value> = BTreeMap::new();
    results.insert("0".to_string(), json!("positivo"));
    // id 1 was in a skipped batch — no value.

    let path =
        save::save_results_csv(root, "demo", "sentiment", &records, &results, "sentiment").unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    assert_eq!(
        reader.headers().unwrap().iter().collect::<Vec<_>>(),
        vec!["id", "text", "sentiment"]
    );
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][2], "positivo");
    assert_eq!(&rows[1][2], "");
}

#[test]
fn results_csv_serializes_list_values_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_str().unwrap();

    let records = vec![Record::new("0", "rust is fast")];
    let mut results: BTreeMap<String, Value> = BTreeMap::new();
    results.insert("0".to_string(), json!(["rust", "performance"]));

    let path = save::save_results_csv(root, "demo", "topics", &records, &results, "topics").unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let row = reader.records().next().unwrap().unwrap();
    assert_eq!(&row[2], r#"["rust","performance"]"#);
}

#[test]
fn save_json_writes_the_merged_map() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_str().unwrap();

    let mut results: BTreeMap<String, Value> = BTreeMap::new();
    results.insert("0".to_string(), json!("positivo"));

    let path = save::save_json(root, "demo", "sentiment_results", &results).unwrap();
    let contents = std::fs::read_to_string(&path).unwrap();
    let parsed: Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(parsed["0"], json!("positivo"));
}
