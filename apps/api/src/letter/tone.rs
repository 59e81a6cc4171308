//! Tone calibration: the closed set of letter voices offered by the form.
//!
//! The label is inserted verbatim into the drafted letter and into the export
//! file name, so labels are part of the wire format and must not change.

use serde::{Deserialize, Serialize};

/// Requested voice of the cover letter. Serialized as its display label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    #[default]
    #[serde(rename = "Confident and Strategic")]
    ConfidentStrategic,
    #[serde(rename = "Enthusiastic and Collaborative")]
    EnthusiasticCollaborative,
    #[serde(rename = "Formal and Results-Driven")]
    FormalResultsDriven,
    #[serde(rename = "Creative and Forward-Thinking")]
    CreativeForwardThinking,
}

impl Tone {
    pub const ALL: [Tone; 4] = [
        Tone::ConfidentStrategic,
        Tone::EnthusiasticCollaborative,
        Tone::FormalResultsDriven,
        Tone::CreativeForwardThinking,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tone::ConfidentStrategic => "Confident and Strategic",
            Tone::EnthusiasticCollaborative => "Enthusiastic and Collaborative",
            Tone::FormalResultsDriven => "Formal and Results-Driven",
            Tone::CreativeForwardThinking => "Creative and Forward-Thinking",
        }
    }

    /// Label with spaces removed, as used in export file names.
    pub fn file_fragment(self) -> String {
        self.label().replace(' ', "")
    }

    /// Phrasing hints handed to the LLM alongside the tone label.
    pub fn voice(self) -> ToneVoice {
        match self {
            Tone::ConfidentStrategic => ToneVoice {
                preferred_verbs: &["Led", "Drove", "Delivered", "Positioned"],
                avoid: &["hope", "try", "maybe"],
            },
            Tone::EnthusiasticCollaborative => ToneVoice {
                preferred_verbs: &["Partnered with", "Collaborated on", "Championed", "Supported"],
                avoid: &["solely", "single-handedly"],
            },
            Tone::FormalResultsDriven => ToneVoice {
                preferred_verbs: &["Achieved", "Increased", "Reduced", "Exceeded"],
                avoid: &["awesome", "super", "!"],
            },
            Tone::CreativeForwardThinking => ToneVoice {
                preferred_verbs: &["Pioneered", "Reimagined", "Prototyped", "Launched"],
                avoid: &["traditional", "standard"],
            },
        }
    }
}

/// Verb guidance for a tone.
#[derive(Debug, Clone, Copy)]
pub struct ToneVoice {
    pub preferred_verbs: &'static [&'static str],
    pub avoid: &'static [&'static str],
}
