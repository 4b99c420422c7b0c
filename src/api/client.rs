// src/api/client.rs
//! Thin HTTP client for the Notion API.
//!
//! Handles authentication headers and request/response plumbing; parsing
//! lives in [`super::parser`] and traversal logic never sees HTTP types.

use super::types::PaginatedResponse;
use super::BlockSource;
use crate::constants::NOTION_API_PAGE_SIZE;
use crate::error::AppError;
use crate::model::Block;
use crate::types::{ApiKey, NotionId};
use reqwest::{header, Client, Response};
use std::time::Duration;

const NOTION_VERSION: &str = "2022-06-28";
const API_BASE_URL: &str = "https://api.notion.com/v1";

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl NotionHttpClient {
    /// Creates a new HTTP client with Notion API authentication.
    ///
    /// `timeout` bounds each individual request, connect through body.
    pub fn new(api_key: &ApiKey, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
            timeout,
        })
    }

    /// Points the client at a different API root (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Creates the default headers for Notion API requests.
    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    /// Makes a GET request to `endpoint` (relative to the API root).
    pub async fn get(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Response, AppError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        log::debug!("GET {} {:?}", url, query);

        self.client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.classify(endpoint, e))
    }

    /// Maps reqwest's timeout into the domain's timeout error.
    fn classify(&self, endpoint: &str, err: reqwest::Error) -> AppError {
        if err.is_timeout() {
            AppError::Timeout {
                endpoint: endpoint.to_string(),
                after: self.timeout,
            }
        } else {
            AppError::NetworkFailure(err)
        }
    }
}

#[async_trait::async_trait]
impl BlockSource for NotionHttpClient {
    async fn list_children_page(
        &self,
        parent: &NotionId,
        cursor: Option<&str>,
    ) -> Result<PaginatedResponse<Block>, AppError> {
        let endpoint = format!("blocks/{}/children", parent.to_hyphenated());
        let page_size = NOTION_API_PAGE_SIZE.to_string();

        let mut query = vec![("page_size", page_size.as_str())];
        if let Some(cursor) = cursor {
            query.push(("start_cursor", cursor));
        }

        let response = self.get(&endpoint, &query).await?;
        let result = extract_response_text(response)
            .await
            .map_err(|e| match e {
                AppError::NetworkFailure(inner) => self.classify(&endpoint, inner),
                other => other,
            })?;
        super::parser::parse_blocks_pagination(result)
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text along with status and URL metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds_with_valid_key() {
        let key = ApiKey::new("secret_abcdefghijklmnopqrs").unwrap();
        let client = NotionHttpClient::new(&key, Duration::from_secs(5))
            .unwrap()
            .with_base_url("http://localhost:9999/v1/");
        assert_eq!(client.base_url, "http://localhost:9999/v1");
    }
}
