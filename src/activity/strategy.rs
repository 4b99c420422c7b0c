// src/activity/strategy.rs
//! How a scan schedules its requests and what it does when one fails.

use crate::constants::{
    DEFAULT_MAX_IN_FLIGHT, DEFAULT_REQUEST_TIMEOUT, MAX_IN_FLIGHT_LIMIT, NOTION_MAX_FETCH_DEPTH,
};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Execution strategy for the traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalStrategy {
    /// Depth-first, one request at a time.
    Sequential,
    /// Sibling subtrees fan out together; results join in launch order.
    Concurrent,
}

impl TraversalStrategy {
    /// The failure policy a strategy uses unless told otherwise.
    ///
    /// Sequential scans stop at the first failure; concurrent scans degrade
    /// the failed subtree and keep going.
    pub fn default_failure_policy(self) -> FailurePolicy {
        match self {
            Self::Sequential => FailurePolicy::Abort,
            Self::Concurrent => FailurePolicy::Isolate,
        }
    }
}

impl fmt::Display for TraversalStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => write!(f, "sequential"),
            Self::Concurrent => write!(f, "concurrent"),
        }
    }
}

/// What happens to the aggregate when a descendant cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// The first failure aborts the aggregation for the whole subpage.
    Abort,
    /// A failed subtree contributes nothing; the failure is recorded.
    Isolate,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abort => write!(f, "abort"),
            Self::Isolate => write!(f, "isolate"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "isolate" => Ok(Self::Isolate),
            other => Err(format!(
                "unknown failure policy '{}' (expected 'abort' or 'isolate')",
                other
            )),
        }
    }
}

/// Everything that shapes one activity scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub strategy: TraversalStrategy,
    pub failure_policy: FailurePolicy,
    /// Ceiling on simultaneous requests across the whole traversal.
    /// Ignored (forced to 1) for sequential scans.
    pub max_in_flight: usize,
    pub request_timeout: Duration,
    /// Attempts per request, counting the first.
    pub max_attempts: u32,
    pub max_depth: usize,
}

impl ScanOptions {
    /// Options for `strategy` with its default failure policy.
    pub fn for_strategy(strategy: TraversalStrategy) -> Self {
        Self {
            strategy,
            failure_policy: strategy.default_failure_policy(),
            ..Self::default()
        }
    }

    /// The admission ceiling actually applied.
    pub fn effective_ceiling(&self) -> usize {
        match self.strategy {
            TraversalStrategy::Sequential => 1,
            TraversalStrategy::Concurrent => self.max_in_flight.clamp(1, MAX_IN_FLIGHT_LIMIT),
        }
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            strategy: TraversalStrategy::Concurrent,
            failure_policy: FailurePolicy::Isolate,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_attempts: 1,
            max_depth: NOTION_MAX_FETCH_DEPTH,
        }
    }
}
