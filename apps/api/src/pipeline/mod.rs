// The architecture pipeline: assembly, extraction, validation, gating, and
// refinement around one completion call.
// All provider calls go through completion::CompletionClient — no direct
// provider calls here.

pub mod architect;
pub mod assembler;
pub mod extractor;
pub mod gate;
pub mod grammar;
pub mod handlers;
pub mod input;
pub mod prompts;
pub mod refine;
pub mod validator;
