// src/api/retrying.rs
//! Bounded retry for transient transport failures.

use super::types::PaginatedResponse;
use super::BlockSource;
use crate::constants::{RETRY_INITIAL_DELAY, RETRY_MAX_DELAY};
use crate::error::AppError;
use crate::error_recovery::retry_with_backoff;
use crate::model::Block;
use crate::types::NotionId;
use std::sync::Arc;
use std::time::Duration;

/// A [`BlockSource`] decorator that retries retryable errors with
/// exponential backoff.
///
/// Sits outside [`super::admission::AdmissionControl`] so a request that is
/// backing off does not hold an admission permit.
pub struct RetryingSource {
    inner: Arc<dyn BlockSource>,
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
}

impl RetryingSource {
    pub fn new(inner: Arc<dyn BlockSource>, max_attempts: u32) -> Self {
        Self {
            inner,
            max_attempts,
            initial_delay: RETRY_INITIAL_DELAY,
            max_delay: RETRY_MAX_DELAY,
        }
    }

    /// Overrides the backoff schedule.
    pub fn with_backoff(mut self, initial_delay: Duration, max_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self.max_delay = max_delay;
        self
    }
}

#[async_trait::async_trait]
impl BlockSource for RetryingSource {
    async fn list_children_page(
        &self,
        parent: &NotionId,
        cursor: Option<&str>,
    ) -> Result<PaginatedResponse<Block>, AppError> {
        retry_with_backoff(
            || self.inner.list_children_page(parent, cursor),
            self.max_attempts,
            self.initial_delay,
            self.max_delay,
        )
        .await
    }
}
