// src/activity/enumerator.rs
//! Lists a page's direct subpages with the latest edit found under each.

use super::aggregator::ActivityAggregator;
use super::failures::{FailureLog, SubtreeFailure};
use super::strategy::{FailurePolicy, ScanOptions, TraversalStrategy};
use crate::api::{fetch_children, AdmissionControl, AdmissionStats, BlockSource, RetryingSource};
use crate::constants::UNTITLED_PAGE;
use crate::error::AppError;
use crate::formatting::LocalTimeFormatter;
use crate::model::{Block, SubpageSummary};
use crate::types::NotionId;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Outcome of one scan of a root page.
#[derive(Debug, Clone)]
pub struct ActivityReport {
    pub root: NotionId,
    /// One entry per subpage, in the order the API listed them.
    pub summaries: Vec<SubpageSummary>,
    /// Subtrees dropped from the reduction under the isolate policy.
    pub failures: Vec<SubtreeFailure>,
    pub strategy: TraversalStrategy,
    pub failure_policy: FailurePolicy,
    pub elapsed: Duration,
}

impl ActivityReport {
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Number of subpages whose latest edit could not be determined.
    pub fn unknown_count(&self) -> usize {
        self.summaries
            .iter()
            .filter(|s| s.latest_edited.is_none())
            .count()
    }
}

/// Builds [`ActivityReport`]s for root pages.
pub struct SubpageScanner {
    aggregator: ActivityAggregator,
    formatter: Arc<LocalTimeFormatter>,
    admission: Option<Arc<AdmissionStats>>,
}

impl SubpageScanner {
    /// Scanner over a ready-made aggregator.
    pub fn new(aggregator: ActivityAggregator, formatter: Arc<LocalTimeFormatter>) -> Self {
        Self {
            aggregator,
            formatter,
            admission: None,
        }
    }

    /// Wraps `transport` with the admission gate (and, when more than one
    /// attempt is allowed, the retry layer) described by `options`.
    pub fn from_options(
        transport: Arc<dyn BlockSource>,
        options: &ScanOptions,
        formatter: Arc<LocalTimeFormatter>,
    ) -> Self {
        let gate = AdmissionControl::new(
            transport,
            options.effective_ceiling(),
            options.request_timeout,
        );
        let stats = gate.stats();

        let mut source: Arc<dyn BlockSource> = Arc::new(gate);
        if options.max_attempts > 1 {
            source = Arc::new(RetryingSource::new(source, options.max_attempts));
        }

        log::info!(
            "Scan configured: {} traversal, {} policy, ceiling {}, timeout {:?}, {} attempt(s)",
            options.strategy,
            options.failure_policy,
            options.effective_ceiling(),
            options.request_timeout,
            options.max_attempts.max(1)
        );

        let aggregator = ActivityAggregator::new(source, options.strategy)
            .with_failure_policy(options.failure_policy)
            .with_max_depth(options.max_depth);

        Self {
            aggregator,
            formatter,
            admission: Some(stats),
        }
    }

    pub fn aggregator(&self) -> &ActivityAggregator {
        &self.aggregator
    }

    /// Request counters of the admission gate, when this scanner owns one.
    pub fn admission_stats(&self) -> Option<Arc<AdmissionStats>> {
        self.admission.clone()
    }

    /// Summarizes every direct subpage of `root`.
    ///
    /// Failing to list `root`'s own children is fatal under every policy:
    /// there is nothing to degrade to.
    pub async fn list_subpage_summaries(&self, root: &NotionId) -> Result<ActivityReport, AppError> {
        let started = Instant::now();
        let failures = FailureLog::new();

        let children = fetch_children(self.aggregator.source(), root).await?;
        let subpages: Vec<&Block> = children.iter().filter(|b| b.is_page()).collect();

        log::info!(
            "{} has {} children, {} of them subpages",
            root,
            children.len(),
            subpages.len()
        );

        // A subpage without children has nothing to aggregate; skip its fetch.
        let nested: Vec<NotionId> = subpages
            .iter()
            .filter(|b| b.has_children)
            .map(|b| b.id.clone())
            .collect();
        let mut latest = self
            .aggregator
            .latest_edit_times(&nested, &failures)
            .await?
            .into_iter();

        let summaries = subpages
            .into_iter()
            .map(|page| {
                let latest_edited = if page.has_children {
                    latest.next().flatten()
                } else {
                    None
                };
                SubpageSummary {
                    title: page.title_or(UNTITLED_PAGE).to_string(),
                    page_id: page.id.clone(),
                    latest_edited,
                    latest_edited_display: self.formatter.to_local_display(latest_edited),
                }
            })
            .collect();

        let report = ActivityReport {
            root: root.clone(),
            summaries,
            failures: failures.drain(),
            strategy: self.aggregator.strategy(),
            failure_policy: self.aggregator.failure_policy(),
            elapsed: started.elapsed(),
        };

        log::info!(
            "Scan of {} finished in {:.2?}: {} subpages, {} skipped subtrees",
            root,
            report.elapsed,
            report.summaries.len(),
            report.failures.len()
        );

        Ok(report)
    }
}
