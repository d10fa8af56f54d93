use crate::pipeline::architect::PromptArchitect;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// The architect already carries everything a request needs (completion
/// client, system instructions, token bound), so state stays this small.
#[derive(Clone)]
pub struct AppState {
    pub architect: PromptArchitect,
}
