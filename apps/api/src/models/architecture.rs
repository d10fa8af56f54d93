//! Prompt-architecture document model — the JSON contract shared with the
//! rendering layer.
//!
//! The document is produced by an LLM, so every struct tolerates fields it
//! does not know about (`#[serde(flatten)]` passthrough maps) and advisory
//! fields are lenient. The hard requirements live in `pipeline::validator`,
//! which checks the raw JSON before it is deserialized into these types.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// The root prompt-architecture document: one full multi-shot prompt set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Architecture {
    pub metadata: ArchitectureMetadata,
    /// Free-form project description block. Shape is owned by the generation
    /// instructions; the pipeline never introspects it.
    pub project: Value,
    /// Free-form global style block (palette, grade, grain, aspect...).
    pub global_style: Value,
    #[serde(default)]
    pub characters: Vec<Value>,
    #[serde(default)]
    pub environments: Vec<Value>,
    pub shots: Vec<Shot>,
    #[serde(default)]
    pub interpretations: Vec<Interpretation>,
    #[serde(default)]
    pub missing_info: Vec<MissingInfoQuestion>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Document-level metadata. `confidence_score` is the model's overall
/// confidence in its reading of the brief (0.0–1.0); the validator replaces
/// it with 0.8 when absent or non-numeric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureMetadata {
    pub confidence_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_target: Option<String>,
    /// Set by refinement: the user feedback that produced this revision,
    /// truncated to 100 characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refinement_note: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One unit of generated-video output with its own composed prompt.
/// `shot_number` is 1-based and contiguous across the `shots` sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    pub shot_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shot_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative_beat: Option<String>,
    pub prompt: ShotPrompt,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The copy-ready prompt for a single shot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotPrompt {
    pub full_prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_components: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A recorded disambiguation decision with an attached confidence value.
///
/// Advisory data: missing fields never fail validation. A missing
/// `confidence` reads as 1.0 so an interpretation without a stated
/// confidence is never surfaced as a caveat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    #[serde(default)]
    pub element: String,
    #[serde(default)]
    pub interpretation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub alternatives: Vec<String>,
    #[serde(default = "full_confidence")]
    pub confidence: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn full_confidence() -> f64 {
    1.0
}

/// An open question the model could not answer from the brief.
/// `default_used` holds the default the model applied, or a falsy value
/// (null / false / "" / 0 / absent) when it applied none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingInfoQuestion {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub why_it_matters: String,
    #[serde(default, deserialize_with = "lenient_criticality")]
    pub criticality: Criticality,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub default_used: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// How badly an unanswered question hurts the architecture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criticality {
    High,
    #[default]
    Medium,
    Low,
}

/// Lenient criticality parse: the instructions pin {high, medium, low}, but
/// a disobedient model must not sink an otherwise valid document. Anything
/// unrecognized reads as medium.
fn lenient_criticality<'de, D>(deserializer: D) -> Result<Criticality, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value.as_str() {
        Some(s) if s.eq_ignore_ascii_case("high") => Criticality::High,
        Some(s) if s.eq_ignore_ascii_case("low") => Criticality::Low,
        _ => Criticality::Medium,
    })
}

/// JSON falsiness as the gating policy defines it: null, false, empty
/// string, or zero. Arrays and objects are always truthy.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_architecture_json() -> Value {
        json!({
            "metadata": {
                "confidence_score": 0.9,
                "schema_version": "1.0",
                "platform_target": "platform-agnostic"
            },
            "project": {"title": "Harbor Dawn", "duration_seconds": 30},
            "global_style": "Sun-bleached 16mm documentary look",
            "characters": [
                {"name": "Mara", "locked_attributes": {"coat": "yellow oilskin"}}
            ],
            "environments": [{"name": "fishing harbor"}],
            "shots": [
                {
                    "shot_number": 1,
                    "shot_id": "sh-001",
                    "narrative_beat": "arrival",
                    "prompt": {
                        "full_prompt": "Wide shot of a fishing harbor at dawn...",
                        "prompt_components": {"subject": "fishing harbor"},
                        "negative_prompt": "no text overlays"
                    }
                }
            ],
            "interpretations": [],
            "missing_info": []
        })
    }

    #[test]
    fn test_architecture_round_trips_without_loss() {
        let input = minimal_architecture_json();
        let arch: Architecture = serde_json::from_value(input.clone()).unwrap();
        let output = serde_json::to_value(&arch).unwrap();
        assert_eq!(input, output);
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let mut input = minimal_architecture_json();
        input["render_hints"] = json!({"codec": "prores"});
        input["metadata"]["generator"] = json!("v2");
        input["shots"][0]["duration_seconds"] = json!(4);
        input["shots"][0]["prompt"]["aspect_ratio"] = json!("16:9");

        let arch: Architecture = serde_json::from_value(input.clone()).unwrap();
        let output = serde_json::to_value(&arch).unwrap();
        assert_eq!(input, output, "passthrough fields must not be dropped");
    }

    #[test]
    fn test_optional_collections_default_to_empty() {
        let mut input = minimal_architecture_json();
        input.as_object_mut().unwrap().remove("interpretations");
        input.as_object_mut().unwrap().remove("missing_info");

        let arch: Architecture = serde_json::from_value(input).unwrap();
        assert!(arch.interpretations.is_empty());
        assert!(arch.missing_info.is_empty());
    }

    #[test]
    fn test_interpretation_confidence_defaults_to_full() {
        let json = json!({
            "element": "season",
            "interpretation": "late autumn",
            "alternatives": ["early spring"]
        });
        let interp: Interpretation = serde_json::from_value(json).unwrap();
        assert_eq!(interp.confidence, 1.0);
    }

    #[test]
    fn test_criticality_parses_known_values() {
        for (raw, expected) in [
            ("high", Criticality::High),
            ("medium", Criticality::Medium),
            ("low", Criticality::Low),
            ("HIGH", Criticality::High),
        ] {
            let q: MissingInfoQuestion =
                serde_json::from_value(json!({"question": "?", "criticality": raw})).unwrap();
            assert_eq!(q.criticality, expected, "criticality {raw}");
        }
    }

    #[test]
    fn test_criticality_unknown_reads_as_medium() {
        let q: MissingInfoQuestion =
            serde_json::from_value(json!({"question": "?", "criticality": "catastrophic"}))
                .unwrap();
        assert_eq!(q.criticality, Criticality::Medium);
    }

    #[test]
    fn test_criticality_absent_reads_as_medium() {
        let q: MissingInfoQuestion = serde_json::from_value(json!({"question": "?"})).unwrap();
        assert_eq!(q.criticality, Criticality::Medium);
    }

    #[test]
    fn test_default_used_absent_is_null() {
        let q: MissingInfoQuestion = serde_json::from_value(json!({"question": "?"})).unwrap();
        assert!(q.default_used.is_null());
    }

    #[test]
    fn test_is_falsy_table() {
        assert!(is_falsy(&Value::Null));
        assert!(is_falsy(&json!(false)));
        assert!(is_falsy(&json!("")));
        assert!(is_falsy(&json!(0)));
        assert!(is_falsy(&json!(0.0)));

        assert!(!is_falsy(&json!(true)));
        assert!(!is_falsy(&json!("16:9")));
        assert!(!is_falsy(&json!(1)));
        assert!(!is_falsy(&json!([])));
        assert!(!is_falsy(&json!({})));
    }
}
