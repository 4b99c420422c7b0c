// src/lib.rs
//! notion-activity reports, for each subpage of a Notion page, the
//! latest edit made anywhere in its nested block tree.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `ErrorCategory`, `ValidationError`
//! - **Configuration**: `ActivityConfig`, `ScanOptions`
//! - **Domain model**: `Block`, `SubpageSummary`, `NotionId`, `ApiKey`
//! - **API client**: `BlockSource`, `NotionHttpClient`, `AdmissionControl`,
//!   `RetryingSource`, `fetch_children`
//! - **Activity scan**: `ActivityAggregator`, `SubpageScanner`, `ActivityReport`
//! - **Rendering & delivery**: `LocalTimeFormatter`, `render_csv`, `deliver`

pub mod activity;
pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod error_recovery;
pub mod formatting;
pub mod model;
pub mod output;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, ErrorCategory, NotionErrorCode};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{ActivityConfig, CommandLineInput, CsvDestination};

// --- Domain Model ---
pub use crate::model::{Block, SubpageSummary};
pub use crate::types::{ApiKey, NotionId};

// --- API Client ---
pub use crate::api::{
    fetch_all_pages, fetch_children, types::PaginatedResponse, AdmissionControl, AdmissionStats,
    BlockSource, NotionHttpClient, RetryingSource,
};

// --- Activity Scan ---
pub use crate::activity::{
    ActivityAggregator, ActivityReport, FailureLog, FailurePolicy, ScanOptions, SubpageScanner,
    SubtreeFailure, TraversalStrategy,
};

// --- Rendering & Delivery ---
pub use crate::formatting::{render_csv, render_table, LocalTimeFormatter};
pub use crate::output::{default_csv_filename, deliver, DeliveryTarget, OutputPlan, OutputReport};
