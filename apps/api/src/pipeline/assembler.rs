//! Prompt assembly — renders polymorphic creative input plus generation
//! options into the single text request sent to the completion provider.
//!
//! Total by contract: every input shape renders to something. Usability
//! checks (empty briefs and the like) belong to the handler boundary.

use crate::pipeline::grammar::platform_note;
use crate::pipeline::input::{CreativeInput, GenerationOptions, Reference};
use crate::pipeline::prompts::OUTPUT_CONTRACT;

/// Assembles the complete user-content block for a generation request:
/// rendered input, references, requirements, then the output contract.
pub fn assemble_prompt(input: &CreativeInput, options: &GenerationOptions) -> String {
    let mut sections: Vec<String> = Vec::new();

    sections.push(render_input(input));
    if let Some(references) = render_references(input.references()) {
        sections.push(references);
    }
    sections.push(render_requirements(options));
    sections.push(OUTPUT_CONTRACT.to_string());

    sections.join("\n\n")
}

fn render_input(input: &CreativeInput) -> String {
    match input {
        CreativeInput::Text { content, .. } => {
            format!("CREATIVE BRIEF:\n{}", content.trim())
        }
        CreativeInput::Deck {
            filename,
            parsed_content,
            ..
        } => {
            format!("PITCH DECK ({filename}):\n{}", parsed_content.trim())
        }
        CreativeInput::Structured { brief, .. } => {
            let mut out = String::from("STRUCTURED BRIEF:");
            push_field(&mut out, "Concept", brief.concept.as_deref());
            push_field(&mut out, "Tone", brief.tone.as_deref());
            push_field(&mut out, "Narrative", brief.narrative.as_deref());
            push_list(&mut out, "Characters", brief.characters.as_deref());
            push_list(&mut out, "Shots", brief.shots.as_deref());
            push_field(&mut out, "Style", brief.style.as_deref());
            push_field(&mut out, "Constraints", brief.constraints.as_deref());
            out
        }
    }
}

/// Appends a labeled line only when the field carries content. Unset fields
/// leave no trace, not even a placeholder.
fn push_field(out: &mut String, label: &str, value: Option<&str>) {
    if let Some(value) = value {
        let value = value.trim();
        if !value.is_empty() {
            out.push_str(&format!("\n{label}: {value}"));
        }
    }
}

fn push_list(out: &mut String, label: &str, values: Option<&[String]>) {
    let Some(values) = values else { return };
    let items: Vec<&str> = values
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("\n{label}:"));
    for item in items {
        out.push_str(&format!("\n- {item}"));
    }
}

fn render_references(references: &[Reference]) -> Option<String> {
    if references.is_empty() {
        return None;
    }
    let mut out = String::from("REFERENCES:");
    for (i, reference) in references.iter().enumerate() {
        match reference.url.as_deref() {
            Some(url) => out.push_str(&format!("\n{}. {} ({url})", i + 1, reference.description)),
            None => out.push_str(&format!("\n{}. {}", i + 1, reference.description)),
        }
    }
    Some(out)
}

fn render_requirements(options: &GenerationOptions) -> String {
    let mut out = String::from("REQUIREMENTS:");
    out.push_str(&format!("\nTarget platform: {}", options.platform));
    if let Some(note) = platform_note(&options.platform) {
        out.push_str(&format!("\nPlatform delivery notes: {note}"));
    }
    match options.shot_count {
        Some(count) => out.push_str(&format!("\nShot count: exactly {count} shots")),
        None => out.push_str("\nShot count: infer the natural number of shots from the content"),
    }
    if let Some(brand) = options
        .brand_context
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        out.push_str(&format!("\nBrand context: {brand}"));
    }
    out
}
