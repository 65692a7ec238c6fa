//! StatusFilter - Status category selected in the dashboard

use serde::{Deserialize, Serialize};

/// Status category for narrowing the call list
///
/// Unrecognised categories are kept as [`StatusFilter::Other`] and do not
/// filter anything.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum StatusFilter {
    #[default]
    All,
    Attention,
    Approved,
    Completed,
    Other(String),
}

impl StatusFilter {
    pub fn as_str(&self) -> &str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Attention => "attention",
            StatusFilter::Approved => "approved",
            StatusFilter::Completed => "completed",
            StatusFilter::Other(raw) => raw,
        }
    }

    /// Human label used by the filter bar
    pub fn label(&self) -> &str {
        match self {
            StatusFilter::All => "All Status",
            StatusFilter::Attention => "Attention Needed",
            StatusFilter::Approved => "Approved",
            StatusFilter::Completed => "Completed",
            StatusFilter::Other(raw) => raw,
        }
    }
}

impl From<&str> for StatusFilter {
    fn from(s: &str) -> Self {
        match s {
            "all" => StatusFilter::All,
            "attention" => StatusFilter::Attention,
            "approved" => StatusFilter::Approved,
            "completed" => StatusFilter::Completed,
            _ => StatusFilter::Other(s.to_string()),
        }
    }
}

impl From<String> for StatusFilter {
    fn from(s: String) -> Self {
        StatusFilter::from(s.as_str())
    }
}

impl From<StatusFilter> for String {
    fn from(filter: StatusFilter) -> Self {
        filter.as_str().to_string()
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(StatusFilter::from(s))
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
