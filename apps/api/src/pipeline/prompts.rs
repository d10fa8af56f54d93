// All completion prompt constants for the pipeline.
// The system scaffold is a default: operators can override the rendered
// instructions wholesale via configuration.

use crate::pipeline::grammar::{CAMERA_MOVES, LIGHTING_STYLES, SHOT_TYPES, TONE_PALETTES};

/// System instructions scaffold. Film-grammar tables are rendered into the
/// placeholders at startup.
/// Replace: {shot_types}, {camera_moves}, {lighting_styles}, {tone_palettes}
const SYSTEM_SCAFFOLD: &str = r#"You are an expert film director and prompt architect for generative video models. You turn creative briefs into complete multi-shot prompt architectures.

You MUST respond with valid JSON only.
Do NOT include any text outside the JSON object.
Do NOT use markdown code fences.

Work like a director: break the brief into discrete shots, give every shot a complete self-contained prompt, and keep characters, lighting, and narrative progression consistent across shots.

When the brief is ambiguous, commit to a concrete interpretation, record it in `interpretations` with your confidence, and put genuinely open questions in `missing_info` with a criticality and the default you applied.

FILM GRAMMAR to compose with:
Shot types: {shot_types}
Camera moves: {camera_moves}
Lighting: {lighting_styles}

TONE PALETTES (anchors for global_style):
{tone_palettes}"#;

/// Renders the default system instructions from the scaffold plus the
/// film-grammar vocabulary tables.
pub fn default_system_instructions() -> String {
    let palettes = TONE_PALETTES
        .iter()
        .map(|p| format!("- {}: {}", p.name, p.descriptors.join(", ")))
        .collect::<Vec<_>>()
        .join("\n");

    SYSTEM_SCAFFOLD
        .replace("{shot_types}", &SHOT_TYPES.join(", "))
        .replace("{camera_moves}", &CAMERA_MOVES.join(", "))
        .replace("{lighting_styles}", &LIGHTING_STYLES.join(", "))
        .replace("{tone_palettes}", &palettes)
}

/// Appended to every assembled generation request: the exact output shape
/// and per-shot composition rules.
pub const OUTPUT_CONTRACT: &str = r#"Return a JSON object with EXACTLY this top-level shape:
{
  "metadata": {
    "schema_version": "1.0",
    "platform_target": "...",
    "confidence_score": 0.0
  },
  "project": { "title": "...", "logline": "...", "duration_estimate": "..." },
  "global_style": { "palette": "...", "grade": "...", "movement": "..." },
  "characters": [
    {
      "name": "...",
      "locked_attributes": { "face": "...", "wardrobe": "..." },
      "flexible_attributes": { "expression": "..." }
    }
  ],
  "environments": [ { "name": "...", "description": "..." } ],
  "shots": [
    {
      "shot_number": 1,
      "shot_id": "shot_001",
      "narrative_beat": "...",
      "prompt": {
        "full_prompt": "...",
        "prompt_components": {
          "subject": "...",
          "action": "...",
          "environment": "...",
          "lighting": "...",
          "camera": "...",
          "style": "..."
        },
        "negative_prompt": "..."
      }
    }
  ],
  "interpretations": [
    { "element": "...", "interpretation": "...", "reasoning": "...", "alternatives": ["..."], "confidence": 0.0 }
  ],
  "missing_info": [
    { "question": "...", "why_it_matters": "...", "criticality": "high|medium|low", "default_used": "..." }
  ]
}

HARD RULES:
1. Number shots contiguously from 1
2. EVERY full_prompt composes in this order: subject, then action, then environment, then lighting, then camera/framing, then style
3. full_prompt must be complete and self-contained: the renderer sees ONE shot at a time
4. A character's locked_attributes must appear VERBATIM in every shot prompt featuring that character
5. metadata.confidence_score is your confidence that the brief maps to this architecture, 0.0 to 1.0
6. Record every ambiguity you resolved in interpretations; never silently guess"#;

/// Refinement prompt template.
/// Replace: {architecture_json}, {feedback}, {scope_instruction}
pub const REFINEMENT_PROMPT_TEMPLATE: &str = r#"Here is the current prompt architecture:

{architecture_json}

CREATIVE FEEDBACK to apply:
{feedback}

{scope_instruction}

HARD RULES:
1. Elements the feedback does not address MUST be preserved exactly as they are
2. Character locked_attributes and cross-shot continuity MUST stay consistent
3. Return the COMPLETE updated architecture as a single JSON object with the same top-level shape, not a fragment or a diff"#;

/// Scope instruction when refinement targets specific shots.
/// Replace: {shot_numbers}
pub const SCOPED_REFINEMENT_INSTRUCTION: &str =
    "Apply the feedback ONLY to shots {shot_numbers}. Leave every other shot untouched, \
    and keep the refreshed shots continuous with the untouched shots around them.";

/// Scope instruction when refinement applies to the whole architecture.
pub const FULL_REFINEMENT_INSTRUCTION: &str =
    "Apply the feedback across the whole architecture wherever it is relevant.";

/// Synthesized feedback for shot regeneration with a creative direction.
/// Replace: {shot_numbers}, {direction}
pub const REGENERATE_WITH_DIRECTION_TEMPLATE: &str = "Regenerate shots {shot_numbers}: {direction}";

/// Synthesized feedback for shot regeneration without direction.
/// Replace: {shot_numbers}
pub const REGENERATE_FRESH_TEMPLATE: &str =
    "Regenerate shots {shot_numbers} with a fresh interpretation of their narrative beats. \
    Maintain the established global style, characters, and continuity with the surrounding shots.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_instructions_render_all_placeholders() {
        let instructions = default_system_instructions();
        assert!(!instructions.contains("{shot_types}"));
        assert!(!instructions.contains("{camera_moves}"));
        assert!(!instructions.contains("{lighting_styles}"));
        assert!(!instructions.contains("{tone_palettes}"));
    }

    #[test]
    fn test_default_instructions_carry_vocabulary() {
        let instructions = default_system_instructions();
        assert!(instructions.contains("wide shot"));
        assert!(instructions.contains("slow push-in"));
        assert!(instructions.contains("golden hour"));
        assert!(instructions.contains("moody noir"));
    }

    #[test]
    fn test_output_contract_names_all_top_level_fields() {
        for field in [
            "metadata",
            "project",
            "global_style",
            "characters",
            "environments",
            "shots",
            "interpretations",
            "missing_info",
        ] {
            assert!(
                OUTPUT_CONTRACT.contains(&format!("\"{field}\"")),
                "contract is missing {field}"
            );
        }
    }
}
