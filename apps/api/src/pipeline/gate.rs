//! Confidence gating — the pure policy that classifies a validated
//! architecture as final, caveated, or needing clarification.
//!
//! Total function: exactly one outcome for any validated architecture,
//! never an error. Question selection preserves the model's original
//! ordering; the cap keeps the clarification round short enough to answer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::architecture::{is_falsy, Architecture, Criticality};

/// Confidence at or above which an architecture is final as-is.
pub const CONFIDENCE_THRESHOLD: f64 = 0.70;

/// Maximum clarifying questions surfaced in one pass.
pub const MAX_QUESTIONS: usize = 3;

/// A clarifying question surfaced to the caller, reduced to what they need
/// to answer it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClarifyingQuestion {
    pub question: String,
    pub why_it_matters: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub default_used: Value,
}

/// A low-confidence interpretation surfaced alongside a caveated result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Caveat {
    pub element: String,
    pub interpretation: String,
    pub alternatives: Vec<String>,
}

/// The gate's classification, carrying the architecture either way.
/// Serialized with a SCREAMING_SNAKE `status` tag the rendering layer
/// switches on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateOutcome {
    Complete {
        architecture: Architecture,
    },
    NeedsClarification {
        architecture: Architecture,
        questions: Vec<ClarifyingQuestion>,
    },
    CompleteWithCaveats {
        architecture: Architecture,
        caveats: Vec<Caveat>,
    },
}

impl GateOutcome {
    /// The status tag, for log lines.
    pub fn status(&self) -> &'static str {
        match self {
            GateOutcome::Complete { .. } => "COMPLETE",
            GateOutcome::NeedsClarification { .. } => "NEEDS_CLARIFICATION",
            GateOutcome::CompleteWithCaveats { .. } => "COMPLETE_WITH_CAVEATS",
        }
    }

    pub fn architecture(&self) -> &Architecture {
        match self {
            GateOutcome::Complete { architecture }
            | GateOutcome::NeedsClarification { architecture, .. }
            | GateOutcome::CompleteWithCaveats { architecture, .. } => architecture,
        }
    }
}

/// Classifies a validated architecture.
///
/// At or above the threshold the architecture is COMPLETE regardless of what
/// `missing_info` or `interpretations` contain. Below it, questions that are
/// high-criticality or went undefaulted win over caveats; the caveated path
/// is the fallback and may carry an empty caveat list.
pub fn gate_architecture(architecture: Architecture) -> GateOutcome {
    if architecture.metadata.confidence_score >= CONFIDENCE_THRESHOLD {
        return GateOutcome::Complete { architecture };
    }

    let questions: Vec<ClarifyingQuestion> = architecture
        .missing_info
        .iter()
        .filter(|q| q.criticality == Criticality::High || is_falsy(&q.default_used))
        .take(MAX_QUESTIONS)
        .map(|q| ClarifyingQuestion {
            question: q.question.clone(),
            why_it_matters: q.why_it_matters.clone(),
            default_used: q.default_used.clone(),
        })
        .collect();

    if !questions.is_empty() {
        return GateOutcome::NeedsClarification {
            architecture,
            questions,
        };
    }

    let caveats: Vec<Caveat> = architecture
        .interpretations
        .iter()
        .filter(|i| i.confidence < CONFIDENCE_THRESHOLD)
        .map(|i| Caveat {
            element: i.element.clone(),
            interpretation: i.interpretation.clone(),
            alternatives: i.alternatives.clone(),
        })
        .collect();

    GateOutcome::CompleteWithCaveats {
        architecture,
        caveats,
    }
}
