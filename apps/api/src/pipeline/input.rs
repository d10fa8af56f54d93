//! Creative input shapes accepted by the generation endpoint.
//!
//! The rendering layer states its input shape explicitly via a tagged union
//! rather than having the server sniff for fields. Deck parsing happens
//! upstream; by the time input reaches this service it is already text.

use serde::{Deserialize, Serialize};

/// Supporting reference material attached to any input shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A pre-structured brief. Every field is optional; unset fields are omitted
/// from the assembled request entirely, never rendered as placeholders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructuredBrief {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub characters: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shots: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<String>,
}

impl StructuredBrief {
    /// True when no field carries any usable content.
    pub fn is_empty(&self) -> bool {
        fn blank(field: &Option<String>) -> bool {
            field.as_deref().map_or(true, |s| s.trim().is_empty())
        }
        fn blank_list(field: &Option<Vec<String>>) -> bool {
            field
                .as_ref()
                .map_or(true, |v| v.iter().all(|s| s.trim().is_empty()))
        }

        blank(&self.concept)
            && blank(&self.tone)
            && blank(&self.narrative)
            && blank(&self.style)
            && blank(&self.constraints)
            && blank_list(&self.characters)
            && blank_list(&self.shots)
    }
}

/// The three input shapes the pipeline accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CreativeInput {
    Text {
        content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        references: Vec<Reference>,
    },
    Deck {
        filename: String,
        parsed_content: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        references: Vec<Reference>,
    },
    Structured {
        #[serde(flatten)]
        brief: StructuredBrief,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        references: Vec<Reference>,
    },
}

impl CreativeInput {
    /// Short label for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            CreativeInput::Text { .. } => "text",
            CreativeInput::Deck { .. } => "deck",
            CreativeInput::Structured { .. } => "structured",
        }
    }

    pub fn references(&self) -> &[Reference] {
        match self {
            CreativeInput::Text { references, .. }
            | CreativeInput::Deck { references, .. }
            | CreativeInput::Structured { references, .. } => references,
        }
    }

    /// True when the input carries nothing the model could work from.
    /// Checked at the handler boundary; the assembler itself accepts anything.
    pub fn is_unusable(&self) -> bool {
        match self {
            CreativeInput::Text { content, .. } => content.trim().is_empty(),
            CreativeInput::Deck { parsed_content, .. } => parsed_content.trim().is_empty(),
            CreativeInput::Structured { brief, references } => {
                brief.is_empty() && references.is_empty()
            }
        }
    }
}

/// Options shaping a generation run. All fields are defaultable so the
/// rendering layer can send `{}` or omit the block entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOptions {
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shot_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_context: Option<String>,
}

fn default_platform() -> String {
    "platform-agnostic".to_string()
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            platform: default_platform(),
            shot_count: None,
            brand_context: None,
        }
    }
}
