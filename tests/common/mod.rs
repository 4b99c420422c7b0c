//! Shared fixtures: an in-memory workspace that serves block children the
//! way the API does and records every request it receives.

#![allow(dead_code)]

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use notion_activity::{AppError, Block, BlockSource, NotionErrorCode, NotionId, PaginatedResponse};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Builds a valid Notion ID from a small number.
pub fn id(n: u32) -> NotionId {
    NotionId::parse(&format!("{:032x}", n)).expect("fixture ids are valid hex")
}

/// 2024-01-01T00:00:00Z plus `minutes`.
pub fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + ChronoDuration::minutes(minutes)
}

pub fn page(n: u32, title: &str, minutes: i64, has_children: bool) -> Block {
    Block {
        id: id(n),
        block_type: "child_page".to_string(),
        has_children,
        last_edited_time: Some(at(minutes)),
        title: Some(title.to_string()),
    }
}

pub fn paragraph(n: u32, minutes: Option<i64>, has_children: bool) -> Block {
    Block {
        id: id(n),
        block_type: "paragraph".to_string(),
        has_children,
        last_edited_time: minutes.map(at),
        title: None,
    }
}

/// In-memory block tree with request instrumentation.
#[derive(Default)]
pub struct StubWorkspace {
    pages: HashMap<NotionId, Vec<Vec<Block>>>,
    failing: HashSet<NotionId>,
    slow: HashMap<NotionId, Duration>,
    delay: Duration,
    requests: Mutex<Vec<(NotionId, Option<String>)>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl StubWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `blocks` as the single page of `parent`'s children.
    pub fn children(self, parent: &NotionId, blocks: Vec<Block>) -> Self {
        self.paged_children(parent, vec![blocks])
    }

    /// Serves `chunks` as consecutive pages; the cursor for chunk `i` is
    /// `page{i + 1}`.
    pub fn paged_children(mut self, parent: &NotionId, chunks: Vec<Vec<Block>>) -> Self {
        self.pages.insert(parent.clone(), chunks);
        self
    }

    /// Every request for `parent`'s children fails with a 500.
    pub fn failing(mut self, parent: &NotionId) -> Self {
        self.failing.insert(parent.clone());
        self
    }

    /// Requests for `parent` take `delay` instead of the default.
    pub fn slow(mut self, parent: &NotionId, delay: Duration) -> Self {
        self.slow.insert(parent.clone(), delay);
        self
    }

    /// Each request sleeps this long while "in flight".
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn request_log(&self) -> Vec<(NotionId, Option<String>)> {
        self.requests.lock().clone()
    }

    pub fn requests_for(&self, parent: &NotionId) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|(p, _)| p == parent)
            .count()
    }

    pub fn total_requests(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl BlockSource for StubWorkspace {
    async fn list_children_page(
        &self,
        parent: &NotionId,
        cursor: Option<&str>,
    ) -> Result<PaginatedResponse<Block>, AppError> {
        self.requests
            .lock()
            .push((parent.clone(), cursor.map(str::to_string)));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let delay = self.slow.get(parent).copied().unwrap_or(self.delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        } else {
            tokio::task::yield_now().await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(parent) {
            return Err(AppError::NotionService {
                code: NotionErrorCode::InternalError,
                message: format!("stub failure for {}", parent),
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            });
        }

        let chunks = self.pages.get(parent).ok_or_else(|| AppError::NotionService {
            code: NotionErrorCode::ObjectNotFound,
            message: format!("no block {}", parent),
            status: reqwest::StatusCode::NOT_FOUND,
        })?;

        let index = match cursor {
            None => 0,
            Some(c) => c
                .strip_prefix("page")
                .and_then(|n| n.parse::<usize>().ok())
                .and_then(|n| n.checked_sub(1))
                .ok_or_else(|| AppError::MalformedResponse(format!("bad cursor {}", c)))?,
        };

        let results = chunks
            .get(index)
            .cloned()
            .ok_or_else(|| AppError::MalformedResponse(format!("cursor past end: {}", index)))?;

        Ok(if index + 1 < chunks.len() {
            PaginatedResponse::with_cursor(results, format!("page{}", index + 2))
        } else {
            PaginatedResponse::last(results)
        })
    }
}
