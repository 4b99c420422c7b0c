// src/api/types.rs
//! Wire-level types for the Notion API module.

use serde::Deserialize;

/// One page of a list endpoint.
///
/// `next_cursor` is opaque: callers only ever test it for presence and hand
/// it back unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginatedResponse<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    /// A final page carrying `results` and no continuation.
    pub fn last(results: Vec<T>) -> Self {
        Self {
            results,
            next_cursor: None,
            has_more: false,
        }
    }

    /// A page followed by more under `cursor`.
    pub fn with_cursor(results: Vec<T>, cursor: impl Into<String>) -> Self {
        Self {
            results,
            next_cursor: Some(cursor.into()),
            has_more: true,
        }
    }
}

/// Everything collected by following a cursor chain to its end.
#[derive(Debug, Clone)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub pages_fetched: u32,
}
