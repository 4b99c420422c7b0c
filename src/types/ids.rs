use super::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A Notion object identifier (page or block).
///
/// Stored in the canonical non-hyphenated, lowercase form so that an ID
/// pasted from a URL and the same ID returned by the API compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotionId(String);

impl NotionId {
    /// Returns the canonical non-hyphenated ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the hyphenated UUID format used by the API and in reports.
    pub fn to_hyphenated(&self) -> String {
        format!(
            "{}-{}-{}-{}-{}",
            &self.0[0..8],
            &self.0[8..12],
            &self.0[12..16],
            &self.0[16..20],
            &self.0[20..32]
        )
    }

    /// Creates a NotionId from a validated hex string.
    fn from_hex(hex: &str) -> Result<Self, ValidationError> {
        if hex.len() == 32 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(NotionId(hex.to_lowercase()))
        } else {
            Err(ValidationError::InvalidId(format!(
                "Invalid Notion ID format: {}",
                hex
            )))
        }
    }

    /// Parses a bare ID, a dashed UUID, or a notion.so page URL.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let cleaned = input.trim().trim_end_matches('/');

        if cleaned.is_empty() {
            return Err(ValidationError::EmptyField("page id"));
        }

        if let Ok(uuid) = Uuid::parse_str(cleaned) {
            return Ok(NotionId(uuid.as_simple().to_string()));
        }

        if cleaned.len() == 32 && cleaned.chars().all(|c| c.is_ascii_hexdigit()) {
            return Self::from_hex(cleaned);
        }

        if cleaned.contains("notion") {
            return Self::extract_from_url(cleaned);
        }

        Err(ValidationError::InvalidId(format!(
            "Could not parse Notion ID from: {}",
            input
        )))
    }

    /// Extracts the trailing ID from a Notion page URL.
    fn extract_from_url(url: &str) -> Result<Self, ValidationError> {
        lazy_static::lazy_static! {
            static ref ID_REGEX: Regex = Regex::new(
                r"(?:[/-])([a-fA-F0-9]{32}|[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{12})(?:[/?#]|$)"
            ).expect("Failed to compile Notion ID regex - this is a bug in the code");
        }

        if let Some(id_match) = ID_REGEX.captures(url).and_then(|c| c.get(1)) {
            let id = id_match.as_str().replace('-', "");
            return Self::from_hex(&id);
        }

        Err(ValidationError::InvalidId(format!(
            "No valid ID found in URL: {}",
            url
        )))
    }
}

impl fmt::Display for NotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for NotionId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for NotionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_hyphenated().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NotionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NotionId::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_parsing() {
        let id = NotionId::parse("550e8400e29b41d4a716446655440000").unwrap();
        assert_eq!(id.as_str(), "550e8400e29b41d4a716446655440000");

        let id = NotionId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(id.as_str(), "550e8400e29b41d4a716446655440000");

        let id = NotionId::parse(
            "https://www.notion.so/acme/Roadmap-550e8400e29b41d4a716446655440000?pvs=4",
        )
        .unwrap();
        assert_eq!(id.as_str(), "550e8400e29b41d4a716446655440000");
    }

    #[test]
    fn test_invalid_ids() {
        assert!(NotionId::parse("too-short").is_err());
        assert!(NotionId::parse("zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz").is_err());
        assert!(matches!(
            NotionId::parse("   "),
            Err(ValidationError::EmptyField(_))
        ));
    }

    #[test]
    fn test_to_hyphenated() {
        let id = NotionId::parse("550E8400E29B41D4A716446655440000").unwrap();
        assert_eq!(id.to_hyphenated(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn test_serde_uses_api_form() {
        let id = NotionId::parse("550e8400e29b41d4a716446655440000").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"550e8400-e29b-41d4-a716-446655440000\"");
        let back: NotionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
