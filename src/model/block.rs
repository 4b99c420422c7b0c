// src/model/block.rs
//! A snapshot of one node in the remote block tree.

use crate::error::AppError;
use crate::types::NotionId;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Type discriminators that mark a block as a page.
///
/// The blocks endpoint reports nested pages as `child_page`; `page` is the
/// discriminator used by page objects themselves.
const PAGE_TYPES: [&str; 2] = ["child_page", "page"];

/// Wire shape of a block in a list-children response.
///
/// Only the fields the activity scan reads are typed; the type-specific
/// payload is kept as raw JSON so unknown block types never fail parsing.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBlock {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub has_children: bool,
    #[serde(default)]
    pub last_edited_time: Option<String>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

/// An immutable block snapshot taken at traversal time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub id: NotionId,
    pub block_type: String,
    pub has_children: bool,
    pub last_edited_time: Option<DateTime<Utc>>,
    /// Display title from the type payload (`<type>.title`), when present.
    pub title: Option<String>,
}

impl Block {
    /// Whether this block is a (sub)page.
    pub fn is_page(&self) -> bool {
        PAGE_TYPES.contains(&self.block_type.as_str())
    }

    /// The page title, or `fallback` when the payload has none.
    pub fn title_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.title.as_deref().unwrap_or(fallback)
    }
}

impl TryFrom<RawBlock> for Block {
    type Error = AppError;

    fn try_from(raw: RawBlock) -> Result<Self, AppError> {
        let id = NotionId::parse(&raw.id).map_err(|e| {
            AppError::MalformedResponse(format!("block id {:?} is not a Notion ID: {}", raw.id, e))
        })?;

        let last_edited_time = raw
            .last_edited_time
            .as_deref()
            .map(|value| parse_instant(&raw.id, value))
            .transpose()?;

        let title = raw
            .payload
            .get(&raw.block_type)
            .and_then(|content| content.get("title"))
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(Block {
            id,
            block_type: raw.block_type,
            has_children: raw.has_children,
            last_edited_time,
            title,
        })
    }
}

/// Parses an RFC 3339 instant and normalizes it to UTC.
///
/// An explicit offset is required; local times without a zone designator
/// are rejected rather than guessed.
pub(crate) fn parse_instant(block_id: &str, value: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| AppError::InvalidTimestamp {
            block_id: block_id.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn parse(value: Value) -> Result<Block, AppError> {
        let raw: RawBlock = serde_json::from_value(value)?;
        Block::try_from(raw)
    }

    #[test]
    fn test_child_page_block() {
        let block = parse(json!({
            "object": "block",
            "id": "59833787-2cf9-4fdf-8782-e53db20768a5",
            "type": "child_page",
            "has_children": true,
            "last_edited_time": "2024-03-01T10:15:00.000Z",
            "child_page": { "title": "Roadmap" }
        }))
        .unwrap();

        assert!(block.is_page());
        assert!(block.has_children);
        assert_eq!(block.title_or("Untitled Page"), "Roadmap");
        assert_eq!(
            block.last_edited_time,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 0).unwrap())
        );
    }

    #[test]
    fn test_paragraph_without_timestamp() {
        let block = parse(json!({
            "id": "59833787-2cf9-4fdf-8782-e53db20768a5",
            "type": "paragraph",
            "paragraph": { "rich_text": [] }
        }))
        .unwrap();

        assert!(!block.is_page());
        assert!(!block.has_children);
        assert_eq!(block.last_edited_time, None);
        assert_eq!(block.title_or("Untitled Page"), "Untitled Page");
    }

    #[test]
    fn test_offset_is_normalized_to_utc() {
        let block = parse(json!({
            "id": "59833787-2cf9-4fdf-8782-e53db20768a5",
            "type": "paragraph",
            "last_edited_time": "2024-03-01T15:45:00+05:30"
        }))
        .unwrap();

        assert_eq!(
            block.last_edited_time,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 0).unwrap())
        );
    }

    #[test]
    fn test_missing_zone_designator_is_parse_error() {
        let err = parse(json!({
            "id": "59833787-2cf9-4fdf-8782-e53db20768a5",
            "type": "paragraph",
            "last_edited_time": "2024-03-01T10:15:00"
        }))
        .unwrap_err();

        assert!(matches!(err, AppError::InvalidTimestamp { .. }));
    }

    #[test]
    fn test_missing_required_field_is_parse_error() {
        let err = parse(json!({ "type": "paragraph" })).unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }
}
