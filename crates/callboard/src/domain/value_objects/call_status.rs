//! CallStatus - Review state of a call

use serde::{Deserialize, Serialize};

/// Review status assigned server-side
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    #[default]
    Pending,
    Approved,
    Completed,
}

impl std::fmt::Display for CallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallStatus::Pending => write!(f, "pending"),
            CallStatus::Approved => write!(f, "approved"),
            CallStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for CallStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(CallStatus::Pending),
            "approved" => Ok(CallStatus::Approved),
            "completed" => Ok(CallStatus::Completed),
            _ => Err(format!("Unknown call status: {}", s)),
        }
    }
}
