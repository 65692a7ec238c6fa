//! Dashboard view model
//!
//! Holds the fetched call collection, the filter state and the one call
//! whose detail panel is open. Owned by a single view and dropped with it.

use chrono::{DateTime, Local, TimeZone};

use crate::application::CallService;
use crate::domain::{ApiError, Call, CallFilter, DateFilter, StatusFilter};

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    calls: Vec<Call>,
    filter: CallFilter,
    selected_call_id: Option<i64>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(filter: CallFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Replace the collection with a fresh fetch. The selection is kept; it
    /// simply resolves to nothing if the call disappeared.
    pub fn set_calls(&mut self, calls: Vec<Call>) {
        self.calls = calls;
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn filter(&self) -> &CallFilter {
        &self.filter
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.filter.status = status;
    }

    pub fn set_date(&mut self, date: DateFilter) {
        self.filter.date = date;
    }

    /// Calls passing the current filter, relative to local time
    pub fn visible(&self) -> Vec<&Call> {
        self.filter.apply(&self.calls)
    }

    pub fn visible_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<&Call> {
        self.filter.visible(&self.calls, now)
    }

    pub fn visible_count(&self) -> usize {
        self.visible_at(&Local::now()).len()
    }

    /// Open the detail panel for `call_id`
    pub fn select(&mut self, call_id: i64) {
        self.selected_call_id = Some(call_id);
    }

    pub fn close_detail(&mut self) {
        self.selected_call_id = None;
    }

    /// The open call, looked up in the full collection.
    ///
    /// An id that is not in the collection means the panel is closed.
    pub fn selected_call(&self) -> Option<&Call> {
        let id = self.selected_call_id?;
        self.calls.iter().find(|call| call.id == id)
    }

    pub fn is_detail_open(&self) -> bool {
        self.selected_call().is_some()
    }

    /// Escalate `call_id`; on success the call list is invalidated by the
    /// service and the detail panel closes. Failures leave the panel as is.
    pub async fn escalate(
        &mut self,
        service: &CallService,
        call_id: i64,
        reason: Option<String>,
    ) -> Result<Option<Call>, ApiError> {
        let updated = service.escalate(call_id, reason).await?;
        self.close_detail();
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::cache::QueryCache;
    use crate::domain::CallStatus;
    use crate::ports::{HttpMethod, RawResponse};
    use crate::test_support::{calls_json, CallBuilder, FakeTransport};
    use std::sync::Arc;

    fn loaded() -> Dashboard {
        let mut dashboard = Dashboard::new();
        dashboard.set_calls(vec![
            CallBuilder::new(41).status(CallStatus::Completed).build(),
            CallBuilder::new(42).patient("Grace Hopper").build(),
        ]);
        dashboard
    }

    #[test]
    fn test_select_present_call_opens_detail() {
        let mut dashboard = loaded();
        dashboard.select(42);
        assert_eq!(dashboard.selected_call().map(|c| c.id), Some(42));
        assert!(dashboard.is_detail_open());
    }

    #[test]
    fn test_select_absent_call_keeps_detail_closed() {
        let mut dashboard = loaded();
        dashboard.select(999);
        assert!(dashboard.selected_call().is_none());
        assert!(!dashboard.is_detail_open());
    }

    #[test]
    fn test_selection_uses_full_collection_not_visible_subset() {
        let mut dashboard = loaded();
        dashboard.set_status(StatusFilter::Completed);
        assert_eq!(dashboard.visible().len(), 1);

        dashboard.select(42);
        assert_eq!(dashboard.selected_call().map(|c| c.id), Some(42));
    }

    #[test]
    fn test_refresh_without_selected_call_closes_detail() {
        let mut dashboard = loaded();
        dashboard.select(41);
        dashboard.set_calls(vec![CallBuilder::new(42).build()]);
        assert!(!dashboard.is_detail_open());
    }

    #[test]
    fn test_filter_setters() {
        let mut dashboard = loaded();
        dashboard.set_search("grace");
        assert_eq!(dashboard.visible_count(), 1);
        dashboard.set_search("");
        dashboard.set_date(DateFilter::LastWeek);
        assert_eq!(dashboard.visible_count(), 2);
    }

    #[tokio::test]
    async fn test_escalate_closes_detail_and_invalidates() {
        let transport = FakeTransport::new();
        transport.respond_json(HttpMethod::Get, "/api/calls", calls_json(&[CallBuilder::new(42).build()]));
        transport.respond(HttpMethod::Post, "/api/calls/42/escalate", RawResponse::new(200, ""));
        let cache = Arc::new(QueryCache::new(ApiClient::new(transport.clone())));
        let service = CallService::new(cache.clone());

        let mut dashboard = Dashboard::new();
        dashboard.set_calls(service.list().await.unwrap());
        dashboard.select(42);

        dashboard.escalate(&service, 42, None).await.unwrap();

        assert!(!dashboard.is_detail_open());
        assert!(!cache.is_cached("/api/calls").await);
    }

    #[tokio::test]
    async fn test_failed_escalate_keeps_detail_open() {
        let transport = FakeTransport::new();
        transport.respond(HttpMethod::Post, "/api/calls/42/escalate", RawResponse::new(500, "nope"));
        let cache = Arc::new(QueryCache::new(ApiClient::new(transport.clone())));
        let service = CallService::new(cache);

        let mut dashboard = loaded();
        dashboard.select(42);

        let err = dashboard.escalate(&service, 42, None).await.unwrap_err();
        assert_eq!(err.to_string(), "500: nope");
        assert!(dashboard.is_detail_open());
    }
}
