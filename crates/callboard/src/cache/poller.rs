//! Cache Poller - Keeps one cache key fresh
//!
//! Refetches a key on a fixed interval and whenever that key is invalidated,
//! publishing each result. Stops when the subscription is dropped.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use super::QueryCache;
use crate::domain::errors::ApiError;

/// Default refresh interval for the call list
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Poller configuration
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Interval between refetches
    pub interval: Duration,
    /// Also refetch when the key is invalidated
    pub refetch_on_invalidate: bool,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            refetch_on_invalidate: true,
        }
    }
}

/// Polls a single cache key
pub struct CachePoller<T> {
    cache: Arc<QueryCache>,
    key: String,
    config: PollerConfig,
    _marker: PhantomData<fn() -> T>,
}

impl<T> CachePoller<T>
where
    T: DeserializeOwned + Send + 'static,
{
    pub fn new(cache: Arc<QueryCache>, key: impl Into<String>, config: Option<PollerConfig>) -> Self {
        Self {
            cache,
            key: key.into(),
            config: config.unwrap_or_default(),
            _marker: PhantomData,
        }
    }

    /// Start polling in the background. The first fetch happens immediately.
    pub fn start(self) -> PollSubscription<T> {
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(async move {
            self.run(tx).await;
        });
        PollSubscription { rx, handle }
    }

    async fn run(self, tx: mpsc::Sender<Result<T, ApiError>>) {
        tracing::info!(
            key = %self.key,
            interval = ?self.config.interval,
            "Poller started"
        );

        let mut ticker = interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut invalidations = self.cache.subscribe();

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                received = invalidations.recv(), if self.config.refetch_on_invalidate => {
                    match received {
                        Ok(key) if key == self.key => {
                            tracing::debug!(key = %key, "Refetching after invalidation");
                        }
                        Ok(_) => continue,
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::debug!(skipped, "Missed invalidations, refetching");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            }

            let result = self.cache.refetch::<T>(&self.key).await;
            if let Err(e) = &result {
                tracing::warn!(key = %self.key, error = %e, "Poll failed");
            }

            if tx.send(result).await.is_err() {
                break;
            }
        }

        tracing::info!(key = %self.key, "Poller stopped");
    }
}

/// Receiving end of a poller. Dropping it stops the poller.
pub struct PollSubscription<T> {
    rx: mpsc::Receiver<Result<T, ApiError>>,
    handle: JoinHandle<()>,
}

impl<T> PollSubscription<T> {
    /// Next fetch result; `None` once the poller has stopped
    pub async fn next(&mut self) -> Option<Result<T, ApiError>> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl<T> Drop for PollSubscription<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::domain::Call;
    use crate::ports::HttpMethod;
    use crate::test_support::{calls_json, CallBuilder, FakeTransport};

    fn setup() -> (Arc<FakeTransport>, Arc<QueryCache>) {
        let transport = FakeTransport::new();
        transport.respond_json(HttpMethod::Get, "/api/calls", calls_json(&[CallBuilder::new(1).build()]));
        let cache = Arc::new(QueryCache::new(ApiClient::new(transport.clone())));
        (transport, cache)
    }

    #[tokio::test]
    async fn test_first_fetch_is_immediate() {
        let (transport, cache) = setup();
        let mut sub = CachePoller::<Vec<Call>>::new(cache.clone(), "/api/calls", None).start();

        let first = sub.next().await.unwrap().unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(transport.count(HttpMethod::Get, "/api/calls"), 1);
        assert!(cache.is_cached("/api/calls").await);
    }

    #[tokio::test]
    async fn test_polls_on_interval() {
        let (transport, cache) = setup();
        let config = PollerConfig {
            interval: Duration::from_millis(20),
            refetch_on_invalidate: false,
        };
        let mut sub = CachePoller::<Vec<Call>>::new(cache, "/api/calls", Some(config)).start();

        for _ in 0..3 {
            sub.next().await.unwrap().unwrap();
        }
        assert!(transport.count(HttpMethod::Get, "/api/calls") >= 3);
    }

    #[tokio::test]
    async fn test_invalidation_triggers_refetch() {
        let (transport, cache) = setup();
        let config = PollerConfig {
            interval: Duration::from_secs(3600),
            refetch_on_invalidate: true,
        };
        let mut sub = CachePoller::<Vec<Call>>::new(cache.clone(), "/api/calls", Some(config)).start();
        sub.next().await.unwrap().unwrap();

        cache.invalidate("/api/agent/config").await;
        cache.invalidate("/api/calls").await;

        sub.next().await.unwrap().unwrap();
        assert_eq!(transport.count(HttpMethod::Get, "/api/calls"), 2);
    }

    #[tokio::test]
    async fn test_dropping_subscription_stops_polling() {
        let (transport, cache) = setup();
        let config = PollerConfig {
            interval: Duration::from_millis(10),
            refetch_on_invalidate: false,
        };
        let mut sub = CachePoller::<Vec<Call>>::new(cache, "/api/calls", Some(config)).start();
        sub.next().await.unwrap().unwrap();
        drop(sub);

        tokio::time::sleep(Duration::from_millis(20)).await;
        let settled = transport.count(HttpMethod::Get, "/api/calls");
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(transport.count(HttpMethod::Get, "/api/calls"), settled);
    }

    #[tokio::test]
    async fn test_errors_are_published_and_polling_continues() {
        let transport = FakeTransport::new();
        transport.respond(
            HttpMethod::Get,
            "/api/calls",
            crate::ports::RawResponse::new(502, "bad gateway"),
        );
        transport.respond_json(HttpMethod::Get, "/api/calls", calls_json(&[]));
        let cache = Arc::new(QueryCache::new(ApiClient::new(transport.clone())));
        let config = PollerConfig {
            interval: Duration::from_millis(10),
            refetch_on_invalidate: false,
        };
        let mut sub = CachePoller::<Vec<Call>>::new(cache, "/api/calls", Some(config)).start();

        let first = sub.next().await.unwrap();
        assert_eq!(first.unwrap_err().status(), Some(502));
        let second = sub.next().await.unwrap();
        assert!(second.unwrap().is_empty());
    }
}
