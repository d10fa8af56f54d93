//! Architecture validation — checks document shape on the parsed JSON value
//! and applies defaults before typed deserialization.
//!
//! Validation runs on the raw `Value` so that EVERY violation can be
//! reported in one schema error, instead of failing on the first field the
//! way a typed deserialize would. Defaults are applied only to a
//! violation-free document; defaulting never masks a violation.

use serde_json::{Map, Value};

use crate::errors::AppError;
use crate::models::architecture::Architecture;

/// Top-level fields that must be present and non-null.
const REQUIRED_FIELDS: &[&str] = &["metadata", "project", "global_style", "shots"];

/// Top-level sequences that default to empty when absent.
const OPTIONAL_LISTS: &[&str] = &["characters", "environments", "interpretations", "missing_info"];

/// Confidence applied when the model omits the score or mistypes it.
const DEFAULT_CONFIDENCE: f64 = 0.8;

/// Validates a parsed completion as an architecture document.
pub fn validate_architecture(value: Value) -> Result<Architecture, AppError> {
    let mut root = match value {
        Value::Object(map) => map,
        _ => return Err(AppError::Schema("architecture is not a JSON object".to_string())),
    };

    let violations = collect_violations(&root);
    if !violations.is_empty() {
        return Err(AppError::Schema(violations.join("; ")));
    }

    apply_defaults(&mut root);

    serde_json::from_value(Value::Object(root))
        .map_err(|e| AppError::Schema(format!("architecture shape rejected: {e}")))
}

fn collect_violations(root: &Map<String, Value>) -> Vec<String> {
    let mut violations = Vec::new();

    // JSON null counts as missing.
    for field in REQUIRED_FIELDS {
        if root.get(*field).map_or(true, Value::is_null) {
            violations.push(format!("missing required field `{field}`"));
        }
    }

    if let Some(metadata) = root.get("metadata") {
        if !metadata.is_null() && !metadata.is_object() {
            violations.push("`metadata` is not an object".to_string());
        }
    }

    match root.get("shots") {
        Some(Value::Array(shots)) => {
            for (index, shot) in shots.iter().enumerate() {
                check_shot(index, shot, &mut violations);
            }
        }
        Some(shots) if !shots.is_null() => {
            violations.push("`shots` is not an array".to_string());
        }
        // Absence was already reported above.
        _ => {}
    }

    violations
}

/// Per-shot checks, reported against the shot's 1-based position.
fn check_shot(index: usize, shot: &Value, violations: &mut Vec<String>) {
    let position = index + 1;

    let Some(shot) = shot.as_object() else {
        violations.push(format!("shot {position}: not an object"));
        return;
    };

    // Shot numbering must be contiguous from 1.
    match shot.get("shot_number").and_then(Value::as_u64) {
        None => violations.push(format!(
            "shot {position}: missing or non-integer shot_number"
        )),
        Some(number) if number != position as u64 => violations.push(format!(
            "shot {position}: shot_number is {number}, expected {position}"
        )),
        Some(_) => {}
    }

    let full_prompt = shot
        .get("prompt")
        .and_then(Value::as_object)
        .and_then(|prompt| prompt.get("full_prompt"))
        .and_then(Value::as_str);
    match full_prompt {
        Some(text) if !text.trim().is_empty() => {}
        _ => violations.push(format!(
            "shot {position}: prompt.full_prompt is missing or empty"
        )),
    }
}

fn apply_defaults(root: &mut Map<String, Value>) {
    let confidence_is_numeric = root
        .get("metadata")
        .and_then(Value::as_object)
        .and_then(|metadata| metadata.get("confidence_score"))
        .is_some_and(Value::is_number);
    if !confidence_is_numeric {
        if let Some(metadata) = root.get_mut("metadata").and_then(Value::as_object_mut) {
            metadata.insert("confidence_score".to_string(), DEFAULT_CONFIDENCE.into());
        }
    }

    for field in OPTIONAL_LISTS {
        if root.get(*field).map_or(true, Value::is_null) {
            root.insert((*field).to_string(), Value::Array(Vec::new()));
        }
    }
}
