// src/api/mod.rs
//! Notion API interaction: the ability to list a block's children.
//!
//! The traversal depends only on [`BlockSource`]; the HTTP client, the
//! retry layer, and the admission gate are all implementations of it and
//! compose as decorators.

pub mod admission;
pub mod client;
pub mod pagination;
pub mod parser;
pub mod retrying;
pub mod types;

use crate::error::AppError;
use crate::model::Block;
use crate::types::NotionId;
use types::PaginatedResponse;

/// The ability to list one page of a block's children.
///
/// This is the transport capability the traversal is written against:
/// given a parent and an optional continuation cursor, return the next page
/// of blocks and the cursor for the page after it.
#[async_trait::async_trait]
pub trait BlockSource: Send + Sync {
    async fn list_children_page(
        &self,
        parent: &NotionId,
        cursor: Option<&str>,
    ) -> Result<PaginatedResponse<Block>, AppError>;
}

// Re-export the public interface
pub use admission::{AdmissionControl, AdmissionStats};
pub use client::NotionHttpClient;
pub use pagination::{fetch_all_pages, fetch_children};
pub use retrying::RetryingSource;
