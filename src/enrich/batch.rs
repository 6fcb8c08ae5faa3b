// Batch slicing and wire formatting.
//
// A batch of records travels to the model as a single text block, one line
// per record, each line tagged with the record's id so the reply can be
// mapped back. The tag token is part of the prompt contract — the model is
// told to key its JSON reply by these tagged ids.

/// Literal token prepended to a record id when embedding it in prompt and
/// reply text. Distinguishes a tagged line from ordinary text.
pub const TAG_PREFIX: &str = "Frase";

/// One unit of text to codify, with an externally-stable identifier.
///
/// Ids are rendered as text and only need to be unique within the input
/// table — typically they are row sequence numbers from collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub text: String,
}

impl Record {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Slice records into consecutive batches of at most `batch_size`.
///
/// Batches partition the input exactly: no record is skipped or duplicated,
/// order is preserved, and only the final batch may be shorter. A
/// `batch_size` of zero is treated as one.
pub fn partition(records: &[Record], batch_size: usize) -> Vec<&[Record]> {
    records.chunks(batch_size.max(1)).collect()
}

/// Render a non-empty batch as one tagged line per record.
///
/// Lines have the exact shape `Frase<id>: <text>` and preserve batch order.
/// Embedded newlines are not escaped — record text must already be
/// single-line (see `clean::normalize_single_line`).
pub fn format_batch(batch: &[Record]) -> String {
    batch
        .iter()
        .map(|record| format!("{TAG_PREFIX}{}: {}", record.id, record.text))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<Record> {
        (0..n).map(|i| Record::new(i.to_string(), format!("text {i}"))).collect()
    }

    #[test]
    fn format_emits_one_line_per_record() {
        let batch = records(4);
        let block = format_batch(&batch);
        assert_eq!(block.lines().count(), 4);
    }

    #[test]
    fn format_lines_carry_id_and_text_verbatim() {
        let batch = vec![
            Record::new("7", "great product"),
            Record::new("12", "terrible service"),
        ];
        let block = format_batch(&batch);
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines[0], "Frase7: great product");
        assert_eq!(lines[1], "Frase12: terrible service");
    }

    #[test]
    fn format_preserves_batch_order() {
        let batch = vec![Record::new("9", "b"), Record::new("1", "a")];
        let block = format_batch(&batch);
        assert!(block.find("Frase9").unwrap() < block.find("Frase1").unwrap());
    }

    #[test]
    fn partition_covers_every_record_exactly_once() {
        let all = records(250);
        let batches = partition(&all, 100);

        let total: usize = batches.iter().map(|b| b.len()).sum();
        assert_eq!(total, 250, "partition must not drop or duplicate records");

        let mut seen = std::collections::HashSet::new();
        for batch in &batches {
            for record in *batch {
                assert!(
                    seen.insert(record.id.clone()),
                    "id {} appears in more than one batch",
                    record.id
                );
            }
        }
    }

    #[test]
    fn partition_last_batch_may_be_short() {
        let all = records(250);
        let batches = partition(&all, 100);
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].len(), 100);
        assert_eq!(batches[1].len(), 100);
        assert_eq!(batches[2].len(), 50);
    }

    #[test]
    fn partition_preserves_input_order_across_batches() {
        let all = records(10);
        let batches = partition(&all, 3);
        let flattened: Vec<&str> = batches
            .iter()
            .flat_map(|b| b.iter().map(|r| r.id.as_str()))
            .collect();
        let expected: Vec<String> = (0..10).map(|i| i.to_string()).collect();
        assert_eq!(flattened, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn partition_zero_batch_size_treated_as_one() {
        let all = records(3);
        let batches = partition(&all, 0);
        assert_eq!(batches.len(), 3);
        assert!(batches.iter().all(|b| b.len() == 1));
    }

    #[test]
    fn partition_empty_input_yields_no_batches() {
        let batches = partition(&[], 10);
        assert!(batches.is_empty());
    }
}
