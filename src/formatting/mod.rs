// src/formatting/mod.rs
//! Renders timestamps and activity reports for people.

pub mod report;
pub mod timezone;

pub use report::{render_csv, render_table, REPORT_HEADERS};
pub use timezone::LocalTimeFormatter;
