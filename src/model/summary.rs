// src/model/summary.rs
//! Per-subpage reduction results.

use crate::types::NotionId;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One row of the activity report: a top-level subpage and the latest edit
/// found anywhere beneath it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubpageSummary {
    #[serde(rename = "Page Name")]
    pub title: String,
    #[serde(rename = "Page ID")]
    pub page_id: NotionId,
    #[serde(skip)]
    pub latest_edited: Option<DateTime<Utc>>,
    /// `latest_edited` rendered in local time, or `"Unknown"`.
    #[serde(rename = "Latest Edited (IST)")]
    pub latest_edited_display: String,
}
