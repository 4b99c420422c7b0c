// src/output/paths.rs
//! Pure functions for output filename generation.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use std::path::PathBuf;

/// Default name of the CSV export, stamped with the local time of the scan.
pub fn default_csv_filename<Tz>(now: DateTime<Tz>) -> PathBuf
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    PathBuf::from(format!(
        "notion_subpages_{}.csv",
        now.format("%Y%m%d_%H%M%S")
    ))
}
