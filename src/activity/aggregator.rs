// src/activity/aggregator.rs
//! Reduces a block subtree to the latest `last_edited_time` found in it.
//!
//! There is one traversal. [`TraversalStrategy`] only decides whether the
//! recursive calls for sibling subtrees are awaited one after another or
//! joined together, and [`FailurePolicy`] decides whether a failed subtree
//! aborts the reduction or is dropped from it.

use super::failures::FailureLog;
use super::strategy::{FailurePolicy, TraversalStrategy};
use crate::api::{fetch_children, BlockSource};
use crate::constants::NOTION_MAX_FETCH_DEPTH;
use crate::error::AppError;
use crate::model::Block;
use crate::types::NotionId;
use chrono::{DateTime, Utc};
use futures::future::{join_all, try_join_all, BoxFuture, FutureExt};
use std::sync::Arc;

type Latest = Option<DateTime<Utc>>;

/// Computes latest-activity timestamps over block subtrees.
///
/// Holds no per-scan state: isolated failures go to the [`FailureLog`] the
/// caller passes in, so overlapping scans never see each other's failures.
pub struct ActivityAggregator {
    source: Arc<dyn BlockSource>,
    strategy: TraversalStrategy,
    policy: FailurePolicy,
    max_depth: usize,
}

impl ActivityAggregator {
    /// Creates an aggregator using the strategy's default failure policy.
    pub fn new(source: Arc<dyn BlockSource>, strategy: TraversalStrategy) -> Self {
        Self {
            source,
            strategy,
            policy: strategy.default_failure_policy(),
            max_depth: NOTION_MAX_FETCH_DEPTH,
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Limits how many levels below a subtree root the traversal descends.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn strategy(&self) -> TraversalStrategy {
        self.strategy
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn source(&self) -> &dyn BlockSource {
        &*self.source
    }

    /// The latest `last_edited_time` among all descendants of `block_id`.
    ///
    /// `block_id`'s own timestamp is not included. Returns `None` when the
    /// block has no children or none of them carries a timestamp. A failure
    /// listing `block_id`'s own children is always returned as an error;
    /// deeper failures dropped under [`FailurePolicy::Isolate`] are recorded
    /// in `failures`.
    pub async fn latest_edit_time(
        &self,
        block_id: &NotionId,
        failures: &FailureLog,
    ) -> Result<Latest, AppError> {
        self.aggregate(block_id.clone(), 0, failures).await
    }

    /// [`latest_edit_time`](Self::latest_edit_time) for several subtree
    /// roots, fanned out per the strategy. Results are positional.
    ///
    /// Under [`FailurePolicy::Isolate`] a failed root yields `None` and an
    /// entry in `failures`; under [`FailurePolicy::Abort`] the first failure
    /// is returned.
    pub async fn latest_edit_times(
        &self,
        roots: &[NotionId],
        failures: &FailureLog,
    ) -> Result<Vec<Latest>, AppError> {
        self.aggregate_each(roots.to_vec(), 0, failures).await
    }

    fn aggregate<'a>(
        &'a self,
        id: NotionId,
        depth: usize,
        failures: &'a FailureLog,
    ) -> BoxFuture<'a, Result<Latest, AppError>> {
        async move {
            if depth > self.max_depth {
                return Err(AppError::RecursionLimitExceeded(self.max_depth));
            }

            let children = fetch_children(&*self.source, &id).await?;
            let own_latest = children.iter().filter_map(|b| b.last_edited_time).max();

            let nested: Vec<NotionId> = children
                .iter()
                .filter(|b| b.has_children)
                .map(|b: &Block| b.id.clone())
                .collect();
            if nested.is_empty() {
                return Ok(own_latest);
            }

            log::debug!(
                "{}: {} children, descending into {} at depth {}",
                id,
                children.len(),
                nested.len(),
                depth + 1
            );

            let descendant_latest = self
                .aggregate_each(nested, depth + 1, failures)
                .await?
                .into_iter()
                .flatten()
                .max();

            Ok(own_latest.max(descendant_latest))
        }
        .boxed()
    }

    /// Aggregates each id at `depth`, applying strategy and failure policy.
    async fn aggregate_each(
        &self,
        ids: Vec<NotionId>,
        depth: usize,
        failures: &FailureLog,
    ) -> Result<Vec<Latest>, AppError> {
        match (self.strategy, self.policy) {
            (TraversalStrategy::Sequential, _) => {
                let mut results = Vec::with_capacity(ids.len());
                for id in &ids {
                    let outcome = self.aggregate(id.clone(), depth, failures).await;
                    results.push(self.settle(id, outcome, failures)?);
                }
                Ok(results)
            }
            // First failure drops the remaining sibling futures.
            (TraversalStrategy::Concurrent, FailurePolicy::Abort) => {
                try_join_all(ids.into_iter().map(|id| self.aggregate(id, depth, failures))).await
            }
            (TraversalStrategy::Concurrent, FailurePolicy::Isolate) => {
                let outcomes = join_all(
                    ids.iter()
                        .map(|id| self.aggregate(id.clone(), depth, failures)),
                )
                .await;
                ids.iter()
                    .zip(outcomes)
                    .map(|(id, outcome)| self.settle(id, outcome, failures))
                    .collect()
            }
        }
    }

    /// Applies the failure policy to one subtree's outcome.
    fn settle(
        &self,
        id: &NotionId,
        outcome: Result<Latest, AppError>,
        failures: &FailureLog,
    ) -> Result<Latest, AppError> {
        match (outcome, self.policy) {
            (Ok(latest), _) => Ok(latest),
            (Err(e), FailurePolicy::Abort) => Err(e),
            (Err(e), FailurePolicy::Isolate) => {
                failures.record(id, &e);
                Ok(None)
            }
        }
    }
}
