// src/api/admission.rs
//! Global admission control for requests to the Notion API.
//!
//! One semaphore is shared by every request of a scan, whatever recursion
//! level issued it, so the ceiling holds for the traversal as a whole.
//! Requests beyond the ceiling wait for a permit in FIFO order.

use super::types::PaginatedResponse;
use super::BlockSource;
use crate::error::AppError;
use crate::model::Block;
use crate::types::NotionId;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// A [`BlockSource`] decorator that caps in-flight requests and applies a
/// per-request timeout.
pub struct AdmissionControl {
    inner: Arc<dyn BlockSource>,
    permits: Arc<Semaphore>,
    ceiling: usize,
    timeout: Duration,
    stats: Arc<AdmissionStats>,
}

impl AdmissionControl {
    /// Wraps `inner` with a ceiling of `ceiling` simultaneous requests.
    ///
    /// A ceiling of zero is treated as one.
    pub fn new(inner: Arc<dyn BlockSource>, ceiling: usize, timeout: Duration) -> Self {
        let ceiling = ceiling.max(1);
        Self {
            inner,
            permits: Arc::new(Semaphore::new(ceiling)),
            ceiling,
            timeout,
            stats: Arc::new(AdmissionStats::default()),
        }
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Live counters for this gate.
    pub fn stats(&self) -> Arc<AdmissionStats> {
        Arc::clone(&self.stats)
    }
}

#[async_trait::async_trait]
impl BlockSource for AdmissionControl {
    async fn list_children_page(
        &self,
        parent: &NotionId,
        cursor: Option<&str>,
    ) -> Result<PaginatedResponse<Block>, AppError> {
        // Both guards drop on every exit path: success, error, timeout, or
        // the caller abandoning this future.
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| AppError::Internal("admission semaphore closed".to_string()))?;
        let _slot = self.stats.enter();

        match tokio::time::timeout(self.timeout, self.inner.list_children_page(parent, cursor))
            .await
        {
            Ok(result) => result,
            Err(_) => {
                log::warn!(
                    "Listing children of {} timed out after {:?}",
                    parent,
                    self.timeout
                );
                Err(AppError::Timeout {
                    endpoint: format!("blocks/{}/children", parent.to_hyphenated()),
                    after: self.timeout,
                })
            }
        }
    }
}

/// Counters describing how a gate has been used.
#[derive(Debug, Default)]
pub struct AdmissionStats {
    admitted: AtomicU64,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl AdmissionStats {
    fn enter(&self) -> InFlightSlot<'_> {
        self.admitted.fetch_add(1, Ordering::Relaxed);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        InFlightSlot { stats: self }
    }

    /// Total requests that were admitted.
    pub fn admitted(&self) -> u64 {
        self.admitted.load(Ordering::Relaxed)
    }

    /// Requests currently holding a permit.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of requests ever in flight at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

struct InFlightSlot<'a> {
    stats: &'a AdmissionStats,
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        self.stats.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;

    /// Sleeps per request; optionally fails or hangs.
    struct SlowSource {
        delay: Duration,
        fail: AtomicBool,
    }

    #[async_trait::async_trait]
    impl BlockSource for SlowSource {
        async fn list_children_page(
            &self,
            _parent: &NotionId,
            _cursor: Option<&str>,
        ) -> Result<PaginatedResponse<Block>, AppError> {
            tokio::time::sleep(self.delay).await;
            if self.fail.load(Ordering::SeqCst) {
                Err(AppError::MalformedResponse("boom".to_string()))
            } else {
                Ok(PaginatedResponse::last(Vec::new()))
            }
        }
    }

    fn id() -> NotionId {
        NotionId::parse("550e8400e29b41d4a716446655440000").unwrap()
    }

    #[tokio::test]
    async fn test_timeout_releases_permit() {
        let gate = AdmissionControl::new(
            Arc::new(SlowSource {
                delay: Duration::from_millis(200),
                fail: AtomicBool::new(false),
            }),
            1,
            Duration::from_millis(10),
        );

        let err = gate.list_children_page(&id(), None).await.unwrap_err();
        assert!(matches!(err, AppError::Timeout { .. }));
        assert_eq!(gate.stats().in_flight(), 0);
        assert_eq!(gate.permits.available_permits(), 1);
    }

    #[tokio::test]
    async fn test_error_releases_permit() {
        let gate = AdmissionControl::new(
            Arc::new(SlowSource {
                delay: Duration::from_millis(1),
                fail: AtomicBool::new(true),
            }),
            2,
            Duration::from_secs(1),
        );

        for _ in 0..5 {
            assert!(gate.list_children_page(&id(), None).await.is_err());
        }
        assert_eq!(gate.permits.available_permits(), 2);
        assert_eq!(gate.stats().admitted(), 5);
    }

    #[tokio::test]
    async fn test_cancellation_releases_permit() {
        let gate = AdmissionControl::new(
            Arc::new(SlowSource {
                delay: Duration::from_secs(10),
                fail: AtomicBool::new(false),
            }),
            1,
            Duration::from_secs(30),
        );

        let parent = id();
        let abandoned =
            tokio::time::timeout(Duration::from_millis(10), gate.list_children_page(&parent, None))
                .await;
        assert!(abandoned.is_err());
        assert_eq!(gate.permits.available_permits(), 1);
        assert_eq!(gate.stats().in_flight(), 0);
    }

    #[test]
    fn test_zero_ceiling_is_one() {
        let gate = AdmissionControl::new(
            Arc::new(SlowSource {
                delay: Duration::ZERO,
                fail: AtomicBool::new(false),
            }),
            0,
            Duration::from_secs(1),
        );
        assert_eq!(gate.ceiling(), 1);
    }
}
