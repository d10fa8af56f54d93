//! Response extraction — locates the JSON document inside raw completion
//! text. Models are instructed not to fence their output, but they sometimes
//! do anyway, so fence markers are stripped before parsing.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::errors::AppError;

/// Maximum cleaned-text prefix carried in a parse failure.
const SNIPPET_LEN: usize = 500;

/// A fence delimiter with an optional language tag, anywhere in the text.
static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[a-zA-Z0-9_-]*").expect("fence regex is valid"));

fn clean(raw: &str) -> String {
    FENCE_RE.replace_all(raw, "").trim().to_string()
}

/// Extracts the JSON value from raw completion text: strip fences, trim,
/// strict parse. Idempotent on already-clean JSON.
pub fn extract_json(raw: &str) -> Result<Value, AppError> {
    let cleaned = clean(raw);
    serde_json::from_str(&cleaned).map_err(|_| AppError::Parse {
        snippet: cleaned.chars().take(SNIPPET_LEN).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_plain_json() {
        let value = extract_json(r#"{"shots": []}"#).unwrap();
        assert_eq!(value["shots"], serde_json::json!([]));
    }

    #[test]
    fn test_strips_fences_with_language_tag() {
        let raw = "```json\n{\"metadata\": {\"confidence_score\": 0.9}}\n```";
        let value = extract_json(raw).unwrap();
        assert_eq!(value["metadata"]["confidence_score"], 0.9);
    }

    #[test]
    fn test_strips_bare_fences_and_whitespace() {
        let raw = "\n```\n  {\"a\": 1}  \n```\n";
        let value = extract_json(raw).unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_idempotent_on_clean_json() {
        let raw = r#"{"a": [1, 2], "b": "text"}"#;
        let once = extract_json(raw).unwrap();
        let twice = extract_json(&once.to_string()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unparseable_text_fails_with_snippet() {
        let raw = "I could not produce an architecture for this brief.";
        match extract_json(raw) {
            Err(AppError::Parse { snippet }) => {
                assert!(snippet.starts_with("I could not"));
            }
            other => panic!("expected parse failure, got {other:?}"),
        }
    }

    #[test]
    fn test_snippet_bounded_at_500_chars() {
        let raw = "x".repeat(2000);
        match extract_json(&raw) {
            Err(AppError::Parse { snippet }) => {
                assert_eq!(snippet.chars().count(), 500);
            }
            other => panic!("expected parse failure, got {other:?}"),
        }
    }
}
