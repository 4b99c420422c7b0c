// src/api/pagination.rs
//! Cursor-following retrieval of a parent's full child list.

use super::types::PaginationResult;
use super::BlockSource;
use crate::constants::NOTION_MAX_CHILD_PAGES;
use crate::error::AppError;
use crate::model::Block;
use crate::types::NotionId;

/// Fetches every child of `parent`, following continuation cursors.
///
/// The first request carries no cursor; each later one carries the cursor
/// from the previous response. Items keep arrival order. A failed page
/// aborts the whole listing, as does a cursor chain longer than
/// [`NOTION_MAX_CHILD_PAGES`].
pub async fn fetch_children(
    source: &dyn BlockSource,
    parent: &NotionId,
) -> Result<Vec<Block>, AppError> {
    Ok(fetch_all_pages(source, parent, Some(NOTION_MAX_CHILD_PAGES))
        .await?
        .items)
}

/// Same as [`fetch_children`] with an explicit page limit, also reporting
/// how many requests it took.
///
/// Hitting `max_pages` while the API still returns a cursor is an error
/// rather than a truncated listing, since a partial child list would make
/// the latest-edit reduction silently wrong.
pub async fn fetch_all_pages(
    source: &dyn BlockSource,
    parent: &NotionId,
    max_pages: Option<u32>,
) -> Result<PaginationResult<Block>, AppError> {
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages_fetched = 0u32;

    loop {
        let response = source
            .list_children_page(parent, cursor.as_deref())
            .await?;
        pages_fetched += 1;
        items.extend(response.results);

        match response.next_cursor {
            Some(next) => {
                if let Some(max) = max_pages {
                    if pages_fetched >= max {
                        log::debug!("Reached maximum page limit: {}", max);
                        return Err(AppError::MalformedResponse(format!(
                            "children of {} still paginating after {} pages",
                            parent, max
                        )));
                    }
                }
                cursor = Some(next);
            }
            None => break,
        }
    }

    log::debug!(
        "Fetched {} children of {} in {} page(s)",
        items.len(),
        parent,
        pages_fetched
    );

    Ok(PaginationResult {
        items,
        pages_fetched,
    })
}
