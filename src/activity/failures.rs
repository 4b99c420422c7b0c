// src/activity/failures.rs
//! Diagnostic channel for subtrees that were degraded instead of aborting
//! the scan.

use crate::error::{AppError, ErrorCategory};
use crate::types::NotionId;
use parking_lot::Mutex;
use std::fmt;

/// A subtree whose latest edit time could not be determined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtreeFailure {
    /// Root of the subtree that was dropped from its parent's reduction.
    pub block_id: NotionId,
    pub category: ErrorCategory,
    pub message: String,
}

impl fmt::Display for SubtreeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} error): {}",
            self.block_id.to_hyphenated(),
            self.category,
            self.message
        )
    }
}

/// Thread-safe collector of [`SubtreeFailure`]s.
#[derive(Debug, Default)]
pub struct FailureLog {
    entries: Mutex<Vec<SubtreeFailure>>,
}

impl FailureLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that the subtree under `block_id` was dropped because of `error`.
    pub fn record(&self, block_id: &NotionId, error: &AppError) {
        let failure = SubtreeFailure {
            block_id: block_id.clone(),
            category: error.category(),
            message: error.to_string(),
        };
        log::warn!("Skipping subtree {}", failure);
        self.entries.lock().push(failure);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Removes and returns everything recorded so far.
    pub fn drain(&self) -> Vec<SubtreeFailure> {
        std::mem::take(&mut *self.entries.lock())
    }
}
