// src/config.rs
use crate::activity::{FailurePolicy, ScanOptions, TraversalStrategy};
use crate::constants::{
    DEFAULT_MAX_IN_FLIGHT, DEFAULT_REQUEST_TIMEOUT, MAX_IN_FLIGHT_LIMIT, NOTION_MAX_FETCH_DEPTH,
};
use crate::error::AppError;
use crate::types::{ApiKey, NotionId, ValidationError};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable holding the integration token.
pub const API_KEY_ENV: &str = "NOTION_API_KEY";

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Notion page URL or ID whose subpages are reported
    pub notion_input: String,

    /// Walk the tree one request at a time instead of concurrently
    #[arg(long, default_value_t = false)]
    pub sequential: bool,

    /// Maximum simultaneous API requests for concurrent scans
    #[arg(long, default_value_t = DEFAULT_MAX_IN_FLIGHT)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Extra attempts for rate-limited, 5xx, or timed-out requests
    #[arg(long, default_value_t = 0)]
    pub retries: u32,

    /// Maximum nesting depth to descend below each subpage
    #[arg(long, default_value_t = NOTION_MAX_FETCH_DEPTH)]
    pub max_depth: usize,

    /// What a failed subtree does: 'abort' the scan or 'isolate' it
    /// (default: abort when sequential, isolate when concurrent)
    #[arg(long)]
    pub failure_policy: Option<FailurePolicy>,

    /// Write the CSV export to this file
    #[arg(short, long)]
    pub output_file: Option<String>,

    /// Write the CSV export to a timestamped file in the current directory
    #[arg(long, default_value_t = false)]
    pub csv: bool,

    /// Pipe mode - print only the CSV to stdout
    #[arg(short = 'p', long, default_value_t = false)]
    pub pipe: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

/// Where the CSV export goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvDestination {
    /// Console table only.
    None,
    /// A file with a timestamped default name.
    DefaultFile,
    File(PathBuf),
    Stdout,
}

/// Resolved configuration, validated and ready to drive a scan.
#[derive(Debug, Clone)]
pub struct ActivityConfig {
    pub root_id: NotionId,
    pub api_key: ApiKey,
    pub scan: ScanOptions,
    pub csv: CsvDestination,
    pub verbose: bool,
}

impl ActivityConfig {
    /// Resolves configuration from CLI input and the environment.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            AppError::MissingConfiguration(format!("{} environment variable not set", API_KEY_ENV))
        })?;
        Self::resolve_with_key(cli, &api_key)
    }

    /// Resolves configuration with an explicitly supplied API key.
    pub fn resolve_with_key(cli: CommandLineInput, api_key: &str) -> Result<Self, AppError> {
        let api_key = ApiKey::new(api_key)?;
        let root_id = NotionId::parse(&cli.notion_input)?;

        if cli.concurrency == 0 || cli.concurrency > MAX_IN_FLIGHT_LIMIT {
            return Err(ValidationError::OutOfBounds {
                value: cli.concurrency,
                min: 1,
                max: MAX_IN_FLIGHT_LIMIT,
            }
            .into());
        }
        if cli.timeout == 0 {
            return Err(AppError::MissingConfiguration(
                "--timeout must be at least one second".to_string(),
            ));
        }

        let strategy = if cli.sequential {
            TraversalStrategy::Sequential
        } else {
            TraversalStrategy::Concurrent
        };

        let scan = ScanOptions {
            strategy,
            failure_policy: cli
                .failure_policy
                .unwrap_or_else(|| strategy.default_failure_policy()),
            max_in_flight: cli.concurrency,
            request_timeout: Duration::from_secs(cli.timeout),
            max_attempts: cli.retries.saturating_add(1),
            max_depth: cli.max_depth,
        };

        let csv = if cli.pipe {
            CsvDestination::Stdout
        } else if let Some(path) = cli.output_file {
            CsvDestination::File(PathBuf::from(path))
        } else if cli.csv {
            CsvDestination::DefaultFile
        } else {
            CsvDestination::None
        };

        Ok(ActivityConfig {
            root_id,
            api_key,
            scan,
            csv,
            verbose: cli.verbose,
        })
    }
}
