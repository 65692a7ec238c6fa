//! Outcome - What the agent did with a call

use serde::{Deserialize, Serialize};

/// Outcome category, compared case-insensitively
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum Outcome {
    Booked,
    Transferred,
    NoAction,
    /// Anything the backend sends that we do not recognise, kept verbatim
    Other(String),
}

/// Badge tone used when rendering an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Info,
    Neutral,
}

impl Outcome {
    pub fn label(&self) -> &str {
        match self {
            Outcome::Booked => "Booked",
            Outcome::Transferred => "Transferred",
            Outcome::NoAction => "No Action",
            Outcome::Other(raw) => raw,
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Outcome::Booked => Tone::Success,
            Outcome::Transferred => Tone::Info,
            _ => Tone::Neutral,
        }
    }
}

impl From<&str> for Outcome {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "booked" => Outcome::Booked,
            "transferred" => Outcome::Transferred,
            "no action" => Outcome::NoAction,
            _ => Outcome::Other(s.to_string()),
        }
    }
}

impl From<String> for Outcome {
    fn from(s: String) -> Self {
        Outcome::from(s.as_str())
    }
}

impl From<Outcome> for String {
    fn from(outcome: Outcome) -> Self {
        outcome.label().to_string()
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
