//! Prompt architect — orchestrates the full pipeline.
//!
//! Flow (generation): assemble_prompt → complete → extract_json →
//!       validate_architecture → gate_architecture.
//! Flow (refinement): build_refinement_prompt → complete → extract_json →
//!       validate_architecture → stamp_refinement → re-gate.
//!
//! Every invocation is single-flight: the only suspension point is the
//! completion call, nothing is cached, and a failed invocation leaves no
//! partial architecture behind.

use std::sync::Arc;

use tracing::{debug, info};

use crate::completion::CompletionClient;
use crate::errors::AppError;
use crate::models::architecture::Architecture;
use crate::pipeline::assembler::assemble_prompt;
use crate::pipeline::extractor::extract_json;
use crate::pipeline::gate::{gate_architecture, GateOutcome};
use crate::pipeline::input::{CreativeInput, GenerationOptions};
use crate::pipeline::refine::{
    build_refinement_prompt, stamp_refinement, synthesize_regeneration_feedback,
};
use crate::pipeline::validator::validate_architecture;

/// The pipeline's construction-time injection point: holds the completion
/// client, the system-instructions value, and the output-token bound.
/// Methods take `&self`, so independent invocations may run concurrently.
#[derive(Clone)]
pub struct PromptArchitect {
    client: Arc<dyn CompletionClient>,
    system_instructions: String,
    max_output_tokens: u32,
}

impl PromptArchitect {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        system_instructions: String,
        max_output_tokens: u32,
    ) -> Self {
        Self {
            client,
            system_instructions,
            max_output_tokens,
        }
    }

    /// Runs the full generation pipeline on one creative input.
    pub async fn generate(
        &self,
        input: &CreativeInput,
        options: &GenerationOptions,
    ) -> Result<GateOutcome, AppError> {
        let prompt = assemble_prompt(input, options);
        info!(
            "Assembled {} request ({} chars) for platform {}",
            input.kind(),
            prompt.len(),
            options.platform
        );

        let architecture = self.complete_and_validate(&prompt).await?;

        let outcome = gate_architecture(architecture);
        info!(
            "Gate decision: {} (confidence {:.2})",
            outcome.status(),
            outcome.architecture().metadata.confidence_score
        );
        Ok(outcome)
    }

    /// Refines a prior architecture with free-text feedback, optionally
    /// scoped to specific shots. The result replaces the prior architecture
    /// wholesale, is stamped, and is re-gated like a fresh generation.
    pub async fn refine(
        &self,
        prior: &Architecture,
        feedback: &str,
        target_shots: Option<&[u32]>,
    ) -> Result<GateOutcome, AppError> {
        let prompt = build_refinement_prompt(prior, feedback, target_shots)?;
        match target_shots {
            Some(numbers) if !numbers.is_empty() => {
                info!("Refining shots {:?}, feedback {} chars", numbers, feedback.len());
            }
            _ => info!("Refining full architecture, feedback {} chars", feedback.len()),
        }

        let mut architecture = self.complete_and_validate(&prompt).await?;
        stamp_refinement(&mut architecture, feedback);

        let outcome = gate_architecture(architecture);
        info!("Gate decision after refinement: {}", outcome.status());
        Ok(outcome)
    }

    /// Regenerates specific shots: synthesizes feedback naming them, then
    /// delegates to refinement scoped to exactly those shots.
    pub async fn regenerate_shots(
        &self,
        prior: &Architecture,
        shot_numbers: &[u32],
        direction: Option<&str>,
    ) -> Result<GateOutcome, AppError> {
        let feedback = synthesize_regeneration_feedback(shot_numbers, direction);
        self.refine(prior, &feedback, Some(shot_numbers)).await
    }

    /// The shared back half of both flows: completion call, extraction,
    /// validation.
    async fn complete_and_validate(&self, prompt: &str) -> Result<Architecture, AppError> {
        let completion = self
            .client
            .complete(&self.system_instructions, prompt, self.max_output_tokens)
            .await?;
        debug!(
            "Completion returned {} chars (model: {}, output tokens: {})",
            completion.text.len(),
            completion.model.as_deref().unwrap_or("unknown"),
            completion
                .usage
                .as_ref()
                .map(|u| u.output_tokens.to_string())
                .unwrap_or_else(|| "unreported".into())
        );

        let value = extract_json(&completion.text)?;
        let architecture = validate_architecture(value)?;
        info!(
            "Validated architecture: {} shots, {} interpretations, {} open questions",
            architecture.shots.len(),
            architecture.interpretations.len(),
            architecture.missing_info.len()
        );
        Ok(architecture)
    }
}
