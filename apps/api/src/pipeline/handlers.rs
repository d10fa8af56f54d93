//! Axum route handlers for the architecture API.
//!
//! Handlers stay thin: boundary input checks, a request id for log
//! correlation, then delegate to the `PromptArchitect`.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::architecture::Architecture;
use crate::pipeline::gate::GateOutcome;
use crate::pipeline::input::{CreativeInput, GenerationOptions};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateArchitectureRequest {
    pub input: CreativeInput,
    #[serde(default)]
    pub options: GenerationOptions,
}

#[derive(Debug, Deserialize)]
pub struct RefineArchitectureRequest {
    pub architecture: Architecture,
    pub feedback: String,
    #[serde(default)]
    pub target_shots: Option<Vec<u32>>,
}

#[derive(Debug, Deserialize)]
pub struct RegenerateShotsRequest {
    pub architecture: Architecture,
    pub shot_numbers: Vec<u32>,
    #[serde(default)]
    pub direction: Option<String>,
}

/// Response envelope for all three pipeline endpoints: a request id with the
/// gate outcome flattened beside it.
#[derive(Debug, Serialize)]
pub struct ArchitectureResponse {
    pub request_id: Uuid,
    #[serde(flatten)]
    pub outcome: GateOutcome,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/architectures
///
/// Full generation pipeline: assemble → complete → extract → validate → gate.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateArchitectureRequest>,
) -> Result<Json<ArchitectureResponse>, AppError> {
    if request.input.is_unusable() {
        return Err(AppError::Input(format!(
            "{} input carries no usable content",
            request.input.kind()
        )));
    }
    if request.options.shot_count == Some(0) {
        return Err(AppError::Input(
            "shot_count must be at least 1 when provided".to_string(),
        ));
    }

    let request_id = Uuid::new_v4();
    info!(
        "[{request_id}] generating architecture from {} input",
        request.input.kind()
    );

    let outcome = state
        .architect
        .generate(&request.input, &request.options)
        .await?;

    info!("[{request_id}] generation gated {}", outcome.status());
    Ok(Json(ArchitectureResponse {
        request_id,
        outcome,
    }))
}

/// POST /api/v1/architectures/refine
///
/// Applies free-text feedback to a prior architecture, optionally scoped to
/// specific shots. The returned architecture fully replaces the prior one.
pub async fn handle_refine(
    State(state): State<AppState>,
    Json(request): Json<RefineArchitectureRequest>,
) -> Result<Json<ArchitectureResponse>, AppError> {
    if request.feedback.trim().is_empty() {
        return Err(AppError::Input("feedback cannot be empty".to_string()));
    }
    if let Some(targets) = &request.target_shots {
        if targets.is_empty() {
            return Err(AppError::Input(
                "target_shots is empty; omit it to refine the whole architecture".to_string(),
            ));
        }
        if targets.contains(&0) {
            return Err(AppError::Input(
                "shot numbers are 1-based; 0 is not a valid shot".to_string(),
            ));
        }
    }

    let request_id = Uuid::new_v4();
    info!(
        "[{request_id}] refining architecture, target shots: {:?}",
        request.target_shots
    );

    let outcome = state
        .architect
        .refine(
            &request.architecture,
            &request.feedback,
            request.target_shots.as_deref(),
        )
        .await?;

    info!("[{request_id}] refinement gated {}", outcome.status());
    Ok(Json(ArchitectureResponse {
        request_id,
        outcome,
    }))
}

/// POST /api/v1/architectures/regenerate-shots
///
/// Regenerates specific shots while preserving continuity with the rest.
pub async fn handle_regenerate_shots(
    State(state): State<AppState>,
    Json(request): Json<RegenerateShotsRequest>,
) -> Result<Json<ArchitectureResponse>, AppError> {
    if request.shot_numbers.is_empty() {
        return Err(AppError::Input("shot_numbers cannot be empty".to_string()));
    }
    if request.shot_numbers.contains(&0) {
        return Err(AppError::Input(
            "shot numbers are 1-based; 0 is not a valid shot".to_string(),
        ));
    }

    let request_id = Uuid::new_v4();
    info!(
        "[{request_id}] regenerating shots {:?}",
        request.shot_numbers
    );

    let outcome = state
        .architect
        .regenerate_shots(
            &request.architecture,
            &request.shot_numbers,
            request.direction.as_deref(),
        )
        .await?;

    info!("[{request_id}] regeneration gated {}", outcome.status());
    Ok(Json(ArchitectureResponse {
        request_id,
        outcome,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::completion::{Completion, CompletionClient, ProviderError};
    use crate::pipeline::architect::PromptArchitect;

    /// Boundary-check tests must be rejected before any provider call.
    struct UnreachableClient;

    #[async_trait]
    impl CompletionClient for UnreachableClient {
        async fn complete(
            &self,
            _system: &str,
            _user_content: &str,
            _max_output_tokens: u32,
        ) -> Result<Completion, ProviderError> {
            panic!("input checks must reject before the provider is called")
        }
    }

    fn boundary_state() -> AppState {
        AppState {
            architect: PromptArchitect::new(
                Arc::new(UnreachableClient),
                "system".to_string(),
                1024,
            ),
        }
    }

    fn prior_architecture() -> Architecture {
        serde_json::from_value(json!({
            "metadata": {"confidence_score": 0.9},
            "project": {},
            "global_style": {},
            "shots": []
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_generate_rejects_zero_shot_count() {
        let request = GenerateArchitectureRequest {
            input: CreativeInput::Text {
                content: "a chase through fog".to_string(),
                references: vec![],
            },
            options: GenerationOptions {
                shot_count: Some(0),
                ..Default::default()
            },
        };
        match handle_generate(State(boundary_state()), Json(request)).await {
            Err(AppError::Input(message)) => assert!(message.contains("shot_count")),
            _ => panic!("expected an input error"),
        }
    }

    #[tokio::test]
    async fn test_refine_rejects_empty_target_shots() {
        let request = RefineArchitectureRequest {
            architecture: prior_architecture(),
            feedback: "tighter pacing".to_string(),
            target_shots: Some(vec![]),
        };
        match handle_refine(State(boundary_state()), Json(request)).await {
            Err(AppError::Input(message)) => assert!(message.contains("target_shots")),
            _ => panic!("expected an input error"),
        }
    }

    #[test]
    fn test_generate_request_options_default() {
        let request: GenerateArchitectureRequest = serde_json::from_value(json!({
            "input": {"type": "text", "content": "a harbor wakes up"}
        }))
        .unwrap();
        assert_eq!(request.input.kind(), "text");
        assert_eq!(request.options.platform, "platform-agnostic");
    }

    #[test]
    fn test_refine_request_deserialization() {
        let request: RefineArchitectureRequest = serde_json::from_value(json!({
            "architecture": {
                "metadata": {"confidence_score": 0.8},
                "project": {},
                "global_style": {},
                "shots": []
            },
            "feedback": "warmer palette",
            "target_shots": [2, 4]
        }))
        .unwrap();
        assert_eq!(request.feedback, "warmer palette");
        assert_eq!(request.target_shots, Some(vec![2, 4]));
    }

    #[test]
    fn test_response_envelope_flattens_outcome() {
        let architecture: Architecture = serde_json::from_value(json!({
            "metadata": {"confidence_score": 0.9},
            "project": {},
            "global_style": {},
            "shots": []
        }))
        .unwrap();
        let response = ArchitectureResponse {
            request_id: Uuid::new_v4(),
            outcome: GateOutcome::Complete { architecture },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["request_id"].is_string());
        assert_eq!(json["status"], "COMPLETE");
        assert!(json["architecture"].is_object());
    }
}
