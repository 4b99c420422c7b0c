// src/api/parser.rs
//! Turns raw list-children responses into domain blocks.
//!
//! Success bodies are parsed into [`RawBlock`]s and validated into
//! [`Block`]s; error bodies go through notion-client's error object so the
//! API's error code survives into [`NotionErrorCode`].

use super::client::ApiResponse;
use super::types::PaginatedResponse;
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{AppError, NotionErrorCode};
use crate::model::{Block, RawBlock};
use notion_client::objects::error::Error as NotionError;
use reqwest::StatusCode;

/// Parses one page of `GET blocks/{id}/children`.
pub fn parse_blocks_pagination(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<Block>, AppError> {
    if !result.status.is_success() {
        return Err(parse_error_body(&result.data, result.status, &result.url));
    }

    let response: PaginatedResponse<RawBlock> =
        serde_json::from_str(&result.data).map_err(|e| {
            log::error!("Failed to parse response from {}: {}", result.url, e);
            AppError::MalformedResponse(format!("{} (body: {})", e, preview(&result.data)))
        })?;

    let blocks = response
        .results
        .into_iter()
        .map(Block::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PaginatedResponse {
        results: blocks,
        next_cursor: response.next_cursor.filter(|c| !c.is_empty()),
        has_more: response.has_more,
    })
}

/// Builds a transport error from a non-2xx response.
fn parse_error_body(body: &str, status: StatusCode, url: &str) -> AppError {
    if let Ok(notion_error) = serde_json::from_str::<NotionError>(body) {
        return AppError::NotionService {
            code: NotionErrorCode::from_api_response(&notion_error.code),
            message: notion_error.message,
            status,
        };
    }

    AppError::NotionService {
        code: NotionErrorCode::from_http_status(status.as_u16()),
        message: format!("HTTP {} from {}", status, url),
        status,
    }
}

fn preview(body: &str) -> String {
    match body.char_indices().nth(ERROR_BODY_PREVIEW_LENGTH) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
