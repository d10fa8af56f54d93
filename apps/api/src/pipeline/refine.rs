//! Refinement support — builds the refinement request around a prior
//! architecture, synthesizes regeneration feedback, and stamps revisions.
//!
//! Refinement always sends the ENTIRE prior architecture: the model needs
//! the untouched shots in view to keep continuity with the ones it reworks.

use anyhow::Context;
use chrono::Utc;

use crate::errors::AppError;
use crate::models::architecture::Architecture;
use crate::pipeline::prompts::{
    FULL_REFINEMENT_INSTRUCTION, REFINEMENT_PROMPT_TEMPLATE, REGENERATE_FRESH_TEMPLATE,
    REGENERATE_WITH_DIRECTION_TEMPLATE, SCOPED_REFINEMENT_INSTRUCTION,
};

/// Length bound for the refinement note stamped into metadata.
const REFINEMENT_NOTE_MAX_CHARS: usize = 100;

/// Builds the full refinement request: the prior architecture serialized in
/// full, the feedback, and the scope instruction.
pub fn build_refinement_prompt(
    architecture: &Architecture,
    feedback: &str,
    target_shots: Option<&[u32]>,
) -> Result<String, AppError> {
    let architecture_json = serde_json::to_string_pretty(architecture)
        .context("serializing prior architecture for refinement")?;

    let scope_instruction = match target_shots {
        Some(numbers) if !numbers.is_empty() => {
            SCOPED_REFINEMENT_INSTRUCTION.replace("{shot_numbers}", &format_shot_numbers(numbers))
        }
        _ => FULL_REFINEMENT_INSTRUCTION.to_string(),
    };

    Ok(REFINEMENT_PROMPT_TEMPLATE
        .replace("{architecture_json}", &architecture_json)
        .replace("{feedback}", feedback.trim())
        .replace("{scope_instruction}", &scope_instruction))
}

/// Synthesizes the feedback text for shot regeneration: names the shots and
/// either carries the caller's direction verbatim or asks for a fresh read.
pub fn synthesize_regeneration_feedback(shot_numbers: &[u32], direction: Option<&str>) -> String {
    let numbers = format_shot_numbers(shot_numbers);
    match direction.map(str::trim).filter(|d| !d.is_empty()) {
        Some(direction) => REGENERATE_WITH_DIRECTION_TEMPLATE
            .replace("{shot_numbers}", &numbers)
            .replace("{direction}", direction),
        None => REGENERATE_FRESH_TEMPLATE.replace("{shot_numbers}", &numbers),
    }
}

/// Stamps a freshly refined architecture: bumps `updated_at` and records the
/// feedback that produced this revision.
pub fn stamp_refinement(architecture: &mut Architecture, feedback: &str) {
    architecture.metadata.updated_at = Some(Utc::now().to_rfc3339());
    architecture.metadata.refinement_note = Some(truncate_note(feedback.trim()));
}

fn format_shot_numbers(numbers: &[u32]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Truncates to 100 characters, appending an ellipsis only when truncation
/// actually happened.
fn truncate_note(feedback: &str) -> String {
    if feedback.chars().count() <= REFINEMENT_NOTE_MAX_CHARS {
        feedback.to_string()
    } else {
        let truncated: String = feedback.chars().take(REFINEMENT_NOTE_MAX_CHARS).collect();
        format!("{truncated}...")
    }
}
