//! Speaker - Who said a transcript line

use serde::{Deserialize, Serialize};

/// One of the two fixed transcript roles
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Speaker {
    #[serde(rename = "AI Assistant")]
    AiAssistant,
    Patient,
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Speaker::AiAssistant => write!(f, "AI Assistant"),
            Speaker::Patient => write!(f, "Patient"),
        }
    }
}
