// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role. Reading these constants should tell you how the
//! activity scan behaves: how deep it descends, how many requests it keeps
//! in flight, how it renders time.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// How many blocks the Notion API returns per page of children.
///
/// The Notion API maximum is 100. Using the maximum minimizes round-trips
/// on wide pages.
pub const NOTION_API_PAGE_SIZE: usize = 100;

/// Most list-children pages followed for a single parent.
///
/// At 100 blocks per page this is far beyond any real page; a cursor chain
/// still going at this point is treated as a malformed response.
pub const NOTION_MAX_CHILD_PAGES: u32 = 1_000;

/// Default ceiling on simultaneous in-flight requests.
///
/// Notion rate-limits integrations to roughly three requests per second on
/// average with short bursts allowed; five in flight keeps bursts short.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 5;

/// Hard upper bound for a user-supplied concurrency ceiling.
pub const MAX_IN_FLIGHT_LIMIT: usize = 32;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum nesting depth when descending into a block tree.
///
/// Notion blocks can nest arbitrarily deep (toggles in columns in synced
/// blocks in pages). The guard keeps a pathological tree from driving the
/// traversal forever.
pub const NOTION_MAX_FETCH_DEPTH: usize = 50;

// ---------------------------------------------------------------------------
// Retry boundaries
// ---------------------------------------------------------------------------

/// First delay before retrying a failed request.
pub const RETRY_INITIAL_DELAY: Duration = Duration::from_millis(500);

/// Upper bound on the exponential backoff delay.
pub const RETRY_MAX_DELAY: Duration = Duration::from_secs(8);

// ---------------------------------------------------------------------------
// Report rendering
// ---------------------------------------------------------------------------

/// Offset of Indian Standard Time from UTC, in seconds (+05:30).
pub const IST_OFFSET_SECONDS: i32 = 5 * 3600 + 30 * 60;

/// Label appended to every rendered local timestamp.
pub const LOCAL_ZONE_LABEL: &str = "IST";

/// Shown when no timestamp could be derived for a subpage.
pub const UNKNOWN_TIMESTAMP: &str = "Unknown";

/// Title used for page blocks that carry no title.
pub const UNTITLED_PAGE: &str = "Untitled Page";

/// Number of formatted timestamps kept in the formatter's memo.
pub const FORMATTER_CACHE_CAPACITY: usize = 1000;

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
