//! Film-grammar vocabulary — the shot, camera, lighting, and tone language
//! rendered into the default system instructions, plus per-platform delivery
//! notes folded into the assembled requirements.
//!
//! These tables are data, not policy: the model is free to go beyond them,
//! they exist so its vocabulary stays concrete and renderable.

/// Shot framings the model is encouraged to compose with.
pub const SHOT_TYPES: &[&str] = &[
    "extreme wide shot",
    "wide shot",
    "medium wide shot",
    "medium shot",
    "medium close-up",
    "close-up",
    "extreme close-up",
    "over-the-shoulder",
    "point-of-view",
    "two-shot",
    "insert shot",
    "aerial shot",
];

/// Camera movement vocabulary.
pub const CAMERA_MOVES: &[&str] = &[
    "static tripod",
    "slow push-in",
    "slow pull-back",
    "pan",
    "tilt",
    "tracking shot",
    "dolly",
    "crane up",
    "crane down",
    "handheld",
    "orbit",
    "whip pan",
];

/// Lighting vocabulary.
pub const LIGHTING_STYLES: &[&str] = &[
    "golden hour",
    "blue hour",
    "high-key",
    "low-key",
    "hard noon sun",
    "overcast soft light",
    "neon-lit",
    "practical-lit interior",
    "candlelit",
    "moonlit",
    "backlit silhouette",
    "window light",
];

/// A named tone palette with the descriptors that evoke it.
#[derive(Debug, Clone, Copy)]
pub struct TonePalette {
    pub name: &'static str,
    pub descriptors: &'static [&'static str],
}

/// Tone palettes offered to the model as anchors for `global_style`.
pub const TONE_PALETTES: &[TonePalette] = &[
    TonePalette {
        name: "cinematic warm",
        descriptors: &["golden tones", "soft contrast", "gentle film grain", "anamorphic flare"],
    },
    TonePalette {
        name: "moody noir",
        descriptors: &["deep shadows", "hard key light", "desaturated palette", "wet streets"],
    },
    TonePalette {
        name: "vibrant pop",
        descriptors: &["saturated primaries", "crisp edges", "high energy", "bold graphic framing"],
    },
    TonePalette {
        name: "documentary natural",
        descriptors: &["available light", "true-to-life color", "handheld intimacy", "unstaged feel"],
    },
    TonePalette {
        name: "dreamlike soft",
        descriptors: &["diffused glow", "pastel wash", "slow drift", "shallow focus"],
    },
];

/// Per-platform delivery guidance, applied when the target platform matches
/// a known preset. Unknown platforms get no note, never an error.
pub const PLATFORM_NOTES: &[(&str, &str)] = &[
    (
        "youtube",
        "16:9 landscape, longer holds are acceptable, open on a strong establishing shot",
    ),
    (
        "tiktok",
        "9:16 vertical, hook inside the first second, fast cuts, faces large in frame",
    ),
    (
        "instagram-reels",
        "9:16 vertical, loop-friendly ending, bold color and constant motion",
    ),
    (
        "broadcast",
        "16:9 landscape, conservative pacing, keep action inside title-safe framing",
    ),
    (
        "film",
        "2.39:1 widescreen, deliberate pacing, compose for theatrical scale",
    ),
];

/// Looks up the delivery note for a platform, tolerant of case and of
/// underscore/hyphen spelling differences.
pub fn platform_note(platform: &str) -> Option<&'static str> {
    let normalized = platform.trim().to_ascii_lowercase().replace('_', "-");
    PLATFORM_NOTES
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, note)| *note)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_framings_present() {
        assert!(SHOT_TYPES.contains(&"wide shot"));
        assert!(SHOT_TYPES.contains(&"close-up"));
        assert!(CAMERA_MOVES.contains(&"slow push-in"));
        assert!(LIGHTING_STYLES.contains(&"golden hour"));
    }

    #[test]
    fn test_every_palette_has_descriptors() {
        for palette in TONE_PALETTES {
            assert!(
                !palette.descriptors.is_empty(),
                "palette {} has no descriptors",
                palette.name
            );
        }
    }

    #[test]
    fn test_platform_note_known_platforms() {
        assert!(platform_note("tiktok").unwrap().contains("9:16"));
        assert!(platform_note("youtube").unwrap().contains("16:9"));
    }

    #[test]
    fn test_platform_note_normalizes_spelling() {
        assert_eq!(platform_note("Instagram_Reels"), platform_note("instagram-reels"));
        assert!(platform_note("  TikTok ").is_some());
    }

    #[test]
    fn test_unknown_platform_gets_no_note() {
        assert!(platform_note("platform-agnostic").is_none());
        assert!(platform_note("myspace").is_none());
    }
}
