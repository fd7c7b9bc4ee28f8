//! Emotion labels and keyword-based emotion detection
//!
//! Detection is a fixed, ordered keyword table matched case-insensitively as
//! plain substrings. Categories overlap ("wonderful" also contains "wonder"),
//! so the first matching rule wins and the table order is significant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mood category assigned to a memory.
///
/// Labels read back from storage that are not one of the seven known
/// categories are kept verbatim in `Other` so they survive a load/persist
/// cycle; they render as `neutral`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Emotion {
    Joy,
    Calm,
    Excited,
    Reflective,
    Grateful,
    Curious,
    Neutral,
    Other(String),
}

/// Ordered keyword rules; first hit wins.
const RULES: &[(&[&str], Emotion)] = &[
    (&["excited", "amazing", "awesome"], Emotion::Excited),
    (&["grateful", "thankful", "blessed"], Emotion::Grateful),
    (&["calm", "peaceful", "serene"], Emotion::Calm),
    (&["happy", "joy", "wonderful"], Emotion::Joy),
    (&["thinking", "realize", "reflect"], Emotion::Reflective),
    (&["curious", "wonder", "interesting"], Emotion::Curious),
];

impl Emotion {
    /// The selectable emotions, in picker order
    pub const ALL: [Emotion; 7] = [
        Emotion::Joy,
        Emotion::Calm,
        Emotion::Excited,
        Emotion::Reflective,
        Emotion::Grateful,
        Emotion::Curious,
        Emotion::Neutral,
    ];

    /// Parse a label case-insensitively. Unknown labels become `Other`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "joy" => Self::Joy,
            "calm" => Self::Calm,
            "excited" => Self::Excited,
            "reflective" => Self::Reflective,
            "grateful" => Self::Grateful,
            "curious" => Self::Curious,
            "neutral" => Self::Neutral,
            _ => Self::Other(label.to_string()),
        }
    }

    /// The stored label
    pub fn as_str(&self) -> &str {
        match self {
            Self::Joy => "joy",
            Self::Calm => "calm",
            Self::Excited => "excited",
            Self::Reflective => "reflective",
            Self::Grateful => "grateful",
            Self::Curious => "curious",
            Self::Neutral => "neutral",
            Self::Other(label) => label,
        }
    }

    /// Label used for rendering; unknown labels show as neutral
    pub fn display_label(&self) -> &'static str {
        match self {
            Self::Joy => "joy",
            Self::Calm => "calm",
            Self::Excited => "excited",
            Self::Reflective => "reflective",
            Self::Grateful => "grateful",
            Self::Curious => "curious",
            Self::Neutral | Self::Other(_) => "neutral",
        }
    }

    /// Capitalized display label, e.g. `Joy`
    pub fn title(&self) -> String {
        let label = self.display_label();
        let mut chars = label.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Whether this is one of the seven known categories
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    pub fn is_neutral(&self) -> bool {
        matches!(self, Self::Neutral)
    }
}

impl From<String> for Emotion {
    fn from(label: String) -> Self {
        Self::parse(&label)
    }
}

impl From<Emotion> for String {
    fn from(emotion: Emotion) -> Self {
        match emotion {
            Emotion::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Emotion {
    type Err = String;

    /// Strict parse for user input: only the seven known labels are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::parse(s) {
            Self::Other(label) => Err(format!(
                "unknown emotion '{}' (expected one of: {})",
                label,
                Self::ALL
                    .iter()
                    .map(Emotion::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
            known => Ok(known),
        }
    }
}

/// Detect the emotion of free text.
pub fn classify(text: &str) -> Emotion {
    let lower = text.to_lowercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, emotion)| emotion.clone())
        .unwrap_or(Emotion::Neutral)
}
