//! DateFilter - Date category selected in the dashboard

use serde::{Deserialize, Serialize};

/// Date category for narrowing the call list
///
/// Only [`DateFilter::Today`] narrows anything. `week` and `custom` are
/// offered by the filter bar but currently behave like `all`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum DateFilter {
    #[default]
    All,
    Today,
    LastWeek,
    Custom,
    Other(String),
}

impl DateFilter {
    pub fn as_str(&self) -> &str {
        match self {
            DateFilter::All => "all",
            DateFilter::Today => "today",
            DateFilter::LastWeek => "week",
            DateFilter::Custom => "custom",
            DateFilter::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            DateFilter::All => "All dates",
            DateFilter::Today => "Today",
            DateFilter::LastWeek => "Last 7 days",
            DateFilter::Custom => "Custom range",
            DateFilter::Other(raw) => raw,
        }
    }
}

impl From<&str> for DateFilter {
    fn from(s: &str) -> Self {
        match s {
            "all" => DateFilter::All,
            "today" => DateFilter::Today,
            "week" => DateFilter::LastWeek,
            "custom" => DateFilter::Custom,
            _ => DateFilter::Other(s.to_string()),
        }
    }
}

impl From<String> for DateFilter {
    fn from(s: String) -> Self {
        DateFilter::from(s.as_str())
    }
}

impl From<DateFilter> for String {
    fn from(filter: DateFilter) -> Self {
        filter.as_str().to_string()
    }
}

impl std::str::FromStr for DateFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(DateFilter::from(s))
    }
}

impl std::fmt::Display for DateFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
