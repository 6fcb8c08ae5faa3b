// Reply parsing — recovering an id/value map from free-form model output.
//
// The model is instructed to answer with a single JSON object keyed by
// tagged record ids, but replies routinely arrive wrapped in markdown
// fences or pretty-printed across many lines. This module owns all of that
// fragility: `parse_reply` either returns a well-formed map or a typed
// error, so no caller ever hand-parses model text.

use std::collections::BTreeMap;

use serde_json::Value;

use super::batch::TAG_PREFIX;
use super::EnrichError;

/// Parse one raw model reply into a map from bare record id to value.
///
/// Normalization is best-effort, not JSON repair: markdown code fences are
/// stripped if present, then all line breaks are removed (the reply is
/// expected to be valid JSON once cosmetic line breaks are gone). The
/// decoded object's keys have the `Frase` tag prefix stripped; keys that
/// never carried the prefix pass through unchanged. If two keys collapse to
/// the same bare id, one silently overwrites the other — within one reply
/// that can only happen if the model disobeyed the tag scheme, and
/// overwriting is the documented merge policy rather than an error.
pub fn parse_reply(raw: &str) -> Result<BTreeMap<String, Value>, EnrichError> {
    let joined: String = strip_code_fences(raw).lines().collect();

    let value: Value = serde_json::from_str(&joined)
        .map_err(|err| EnrichError::MalformedResponse(err.to_string()))?;

    let object = match value {
        Value::Object(object) => object,
        other => {
            return Err(EnrichError::MalformedResponse(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            )))
        }
    };

    let mut parsed = BTreeMap::new();
    for (key, value) in object {
        let id = key.strip_prefix(TAG_PREFIX).unwrap_or(&key).to_string();
        parsed.insert(id, value);
    }
    Ok(parsed)
}

/// Fold one reply's parsed map into the run-wide result map.
///
/// Batches partition disjoint id ranges, so a collision means either a
/// slicing bug or a model reply that invented another batch's ids. The
/// merge refuses to silently overwrite across batches.
pub fn merge(
    into: &mut BTreeMap<String, Value>,
    parsed: BTreeMap<String, Value>,
) -> Result<(), EnrichError> {
    for (id, value) in parsed {
        if into.contains_key(&id) {
            return Err(EnrichError::PartitionViolation(id));
        }
        into.insert(id, value);
    }
    Ok(())
}

/// Strip a surrounding markdown code fence (``` or ```json) if present.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the opening fence line (it may carry a language tag).
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_strips_tag_prefix_from_keys() {
        let parsed = parse_reply(r#"{"Frase7": "x", "Frase12": "y"}"#).unwrap();
        assert_eq!(parsed["7"], json!("x"));
        assert_eq!(parsed["12"], json!("y"));
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn parse_survives_pretty_printed_replies() {
        let raw = "{\n  \"Frase0\": \"positivo\",\n  \"Frase1\": \"negativo\"\n}";
        let parsed = parse_reply(raw).unwrap();
        assert_eq!(parsed["0"], json!("positivo"));
        assert_eq!(parsed["1"], json!("negativo"));
    }

    #[test]
    fn parse_strips_markdown_fences() {
        let raw = "```json\n{\"Frase3\": \"ok\"}\n```";
        let parsed = parse_reply(raw).unwrap();
        assert_eq!(parsed["3"], json!("ok"));
    }

    #[test]
    fn parse_accepts_list_values() {
        let raw = r#"{"Frase0": ["rust", "testing"]}"#;
        let parsed = parse_reply(raw).unwrap();
        assert_eq!(parsed["0"], json!(["rust", "testing"]));
    }

    #[test]
    fn parse_rejects_non_json_with_typed_error() {
        let err = parse_reply("not json").unwrap_err();
        assert!(
            matches!(err, EnrichError::MalformedResponse(_)),
            "expected MalformedResponse, got {err:?}"
        );
    }

    #[test]
    fn parse_rejects_non_object_json() {
        let err = parse_reply("[1, 2, 3]").unwrap_err();
        match err {
            EnrichError::MalformedResponse(detail) => assert!(detail.contains("array")),
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn parse_keeps_untagged_keys_as_is() {
        let parsed = parse_reply(r#"{"5": "value"}"#).unwrap();
        assert_eq!(parsed["5"], json!("value"));
    }

    #[test]
    fn parse_collapsing_keys_overwrite_instead_of_erroring() {
        // "Frase3" and "3" both become "3" after stripping — the collision
        // collapses to a single entry rather than failing the reply.
        let parsed = parse_reply(r#"{"Frase3": "first", "3": "second"}"#).unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(parsed["3"] == json!("first") || parsed["3"] == json!("second"));
    }

    #[test]
    fn merge_accumulates_disjoint_batches() {
        let mut all = BTreeMap::new();
        merge(&mut all, parse_reply(r#"{"Frase0": "a"}"#).unwrap()).unwrap();
        merge(&mut all, parse_reply(r#"{"Frase1": "b"}"#).unwrap()).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn merge_rejects_cross_batch_duplicates() {
        let mut all = BTreeMap::new();
        merge(&mut all, parse_reply(r#"{"Frase0": "a"}"#).unwrap()).unwrap();
        let err = merge(&mut all, parse_reply(r#"{"Frase0": "b"}"#).unwrap()).unwrap_err();
        match err {
            EnrichError::PartitionViolation(id) => assert_eq!(id, "0"),
            other => panic!("expected PartitionViolation, got {other:?}"),
        }
        // The earlier value must survive the refused merge.
        assert_eq!(all["0"], json!("a"));
    }
}
