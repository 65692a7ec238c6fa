//! Call filtering
//!
//! Narrows the in-memory call list by search text, status category and date
//! category. All active filters must match.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::domain::entities::Call;
use crate::domain::value_objects::{CallStatus, DateFilter, StatusFilter};

/// Filter state owned by the dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallFilter {
    /// Free text; empty matches everything
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: StatusFilter,
    #[serde(default)]
    pub date: DateFilter,
}

impl CallFilter {
    pub fn new(search: impl Into<String>, status: StatusFilter, date: DateFilter) -> Self {
        Self {
            search: search.into(),
            status,
            date,
        }
    }

    /// Visible calls relative to the current local time
    pub fn apply<'a>(&self, calls: &'a [Call]) -> Vec<&'a Call> {
        self.visible(calls, &Local::now())
    }

    /// Visible calls, preserving input order
    pub fn visible<'a, Tz: TimeZone>(&self, calls: &'a [Call], now: &DateTime<Tz>) -> Vec<&'a Call> {
        calls.iter().filter(|call| self.matches(call, now)).collect()
    }

    pub fn matches<Tz: TimeZone>(&self, call: &Call, now: &DateTime<Tz>) -> bool {
        self.matches_search(call) && self.matches_status(call) && self.matches_date(call, now)
    }

    fn matches_search(&self, call: &Call) -> bool {
        if self.search.is_empty() {
            return true;
        }

        let query = self.search.to_lowercase();
        call.patient_name.to_lowercase().contains(&query)
            || call.reason.to_lowercase().contains(&query)
            // phone numbers are compared raw, without case folding
            || call.phone_number.contains(&query)
    }

    fn matches_status(&self, call: &Call) -> bool {
        match &self.status {
            StatusFilter::All => true,
            StatusFilter::Attention => call.needs_attention,
            StatusFilter::Approved => call.status == CallStatus::Approved,
            StatusFilter::Completed => call.status == CallStatus::Completed,
            StatusFilter::Other(raw) => {
                tracing::debug!(status_filter = %raw, "Unrecognised status filter, not filtering");
                true
            }
        }
    }

    fn matches_date<Tz: TimeZone>(&self, call: &Call, now: &DateTime<Tz>) -> bool {
        match self.date {
            DateFilter::Today => {
                call.timestamp.with_timezone(&now.timezone()).date_naive() == now.date_naive()
            }
            // week and custom are not wired up yet and pass everything through
            _ => true,
        }
    }

    /// True when nothing narrows the list
    pub fn is_unfiltered(&self) -> bool {
        self.search.is_empty()
            && matches!(self.status, StatusFilter::All | StatusFilter::Other(_))
            && self.date != DateFilter::Today
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CallBuilder;
    use chrono::{Duration, FixedOffset, TimeZone};

    fn brisbane() -> FixedOffset {
        FixedOffset::east_opt(10 * 3600).unwrap()
    }

    fn now() -> DateTime<FixedOffset> {
        brisbane().with_ymd_and_hms(2024, 6, 14, 15, 0, 0).unwrap()
    }

    fn calls() -> Vec<Call> {
        let today = now().with_timezone(&chrono::Utc);
        vec![
            CallBuilder::new(1)
                .patient("Margaret Chen")
                .phone("+61412345678")
                .reason("Book a flu shot")
                .status(CallStatus::Approved)
                .at(today - Duration::hours(2))
                .build(),
            CallBuilder::new(2)
                .patient("Tom O'Brien")
                .phone("0298765432")
                .reason("Prescription refill")
                .needs_attention("ID failed")
                .at(today - Duration::days(1))
                .build(),
            CallBuilder::new(3)
                .patient("Priya Nair")
                .phone("+61400111222")
                .reason("Test results")
                .status(CallStatus::Completed)
                .at(today - Duration::minutes(5))
                .build(),
        ]
    }

    fn ids(visible: &[&Call]) -> Vec<i64> {
        visible.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let calls = calls();
        let filter = CallFilter::default();
        assert_eq!(ids(&filter.visible(&calls, &now())), vec![1, 2, 3]);
        assert!(filter.is_unfiltered());
    }

    #[test]
    fn test_search_is_case_insensitive_on_name_and_reason() {
        let calls = calls();
        let by_name = CallFilter::new("MARGARET", StatusFilter::All, DateFilter::All);
        assert_eq!(ids(&by_name.visible(&calls, &now())), vec![1]);

        let by_reason = CallFilter::new("refill", StatusFilter::All, DateFilter::All);
        assert_eq!(ids(&by_reason.visible(&calls, &now())), vec![2]);
    }

    #[test]
    fn test_search_matches_raw_phone_substring() {
        let calls = calls();
        let filter = CallFilter::new("+6140", StatusFilter::All, DateFilter::All);
        assert_eq!(ids(&filter.visible(&calls, &now())), vec![3]);
    }

    #[test]
    fn test_search_without_match_is_empty() {
        let calls = calls();
        let filter = CallFilter::new("zebra", StatusFilter::All, DateFilter::All);
        assert!(filter.visible(&calls, &now()).is_empty());
    }

    #[test]
    fn test_status_categories() {
        let calls = calls();

        let attention = CallFilter::new("", StatusFilter::Attention, DateFilter::All);
        let visible = attention.visible(&calls, &now());
        assert!(visible.iter().all(|c| c.needs_attention));
        assert_eq!(ids(&visible), vec![2]);

        let approved = CallFilter::new("", StatusFilter::Approved, DateFilter::All);
        let visible = approved.visible(&calls, &now());
        assert!(visible.iter().all(|c| c.status == CallStatus::Approved));
        assert_eq!(ids(&visible), vec![1]);

        let completed = CallFilter::new("", StatusFilter::Completed, DateFilter::All);
        assert_eq!(ids(&completed.visible(&calls, &now())), vec![3]);
    }

    #[test]
    fn test_unknown_status_passes_through() {
        let calls = calls();
        let filter = CallFilter::new("", StatusFilter::from("archived"), DateFilter::All);
        assert_eq!(ids(&filter.visible(&calls, &now())), vec![1, 2, 3]);
    }

    #[test]
    fn test_today_uses_local_calendar_day() {
        let calls = calls();
        let filter = CallFilter::new("", StatusFilter::All, DateFilter::Today);
        assert_eq!(ids(&filter.visible(&calls, &now())), vec![1, 3]);
    }

    #[test]
    fn test_today_respects_timezone_boundary() {
        // 23:30 UTC on the 13th is 09:30 on the 14th in Brisbane
        let call = CallBuilder::new(9)
            .at(chrono::Utc.with_ymd_and_hms(2024, 6, 13, 23, 30, 0).unwrap())
            .build();
        let filter = CallFilter::new("", StatusFilter::All, DateFilter::Today);
        assert!(filter.matches(&call, &now()));
        assert!(!filter.matches(&call, &now().with_timezone(&chrono::Utc)));
    }

    #[test]
    fn test_week_and_custom_do_not_filter() {
        let calls = calls();
        for date in [DateFilter::LastWeek, DateFilter::Custom, DateFilter::from("fortnight")] {
            let filter = CallFilter::new("", StatusFilter::All, date);
            assert_eq!(filter.visible(&calls, &now()).len(), 3);
        }
    }

    #[test]
    fn test_filters_combine_and_are_idempotent() {
        let calls = calls();
        let filter = CallFilter::new("o", StatusFilter::Attention, DateFilter::All);
        let first = filter.visible(&calls, &now());
        let again: Vec<Call> = first.iter().map(|c| (*c).clone()).collect();
        let second = filter.visible(&again, &now());

        assert_eq!(ids(&first), vec![2]);
        assert_eq!(ids(&first), ids(&second));
        assert!(first.iter().all(|c| calls.iter().any(|orig| orig.id == c.id)));
    }
}
