// src/formatting/report.rs
//! Renders activity reports as CSV and as a terminal table.

use crate::model::SubpageSummary;
use std::fmt::Write;

/// Column headers shared by every rendering of the report.
pub const REPORT_HEADERS: [&str; 3] = ["Page Name", "Page ID", "Latest Edited (IST)"];

/// Renders the CSV export.
///
/// Only the page name is quoted (it is free text); IDs and timestamps never
/// contain separators.
pub fn render_csv(summaries: &[SubpageSummary]) -> String {
    let mut csv = String::with_capacity(64 * (summaries.len() + 1));
    csv.push_str(&REPORT_HEADERS.join(","));
    csv.push('\n');

    for summary in summaries {
        let _ = writeln!(
            csv,
            "\"{}\",{},{}",
            summary.title.replace('"', "\"\""),
            summary.page_id.to_hyphenated(),
            summary.latest_edited_display
        );
    }

    csv
}

/// Renders a markdown-style table for the terminal.
pub fn render_table(summaries: &[SubpageSummary]) -> String {
    let rows: Vec<[String; 3]> = summaries
        .iter()
        .map(|s| {
            [
                s.title.clone(),
                s.page_id.to_hyphenated(),
                s.latest_edited_display.clone(),
            ]
        })
        .collect();

    let mut widths = REPORT_HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut table = String::new();
    push_row(&mut table, REPORT_HEADERS.map(str::to_string).iter(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut table, rule.iter(), &widths);
    for row in &rows {
        push_row(&mut table, row.iter(), &widths);
    }
    table
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a String>, widths: &[usize]) {
    out.push('|');
    for (cell, width) in cells.zip(widths) {
        let pad = width.saturating_sub(cell.chars().count());
        let _ = write!(out, " {}{} |", cell, " ".repeat(pad));
    }
    out.push('\n');
}
