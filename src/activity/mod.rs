// src/activity/mod.rs
//! The activity scan: walk each subpage's block tree and reduce it to the
//! latest edit time found anywhere inside.

pub mod aggregator;
pub mod enumerator;
pub mod failures;
pub mod strategy;

pub use aggregator::ActivityAggregator;
pub use enumerator::{ActivityReport, SubpageScanner};
pub use failures::{FailureLog, SubtreeFailure};
pub use strategy::{FailurePolicy, ScanOptions, TraversalStrategy};
