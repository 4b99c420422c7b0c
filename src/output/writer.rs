// src/output/writer.rs
//! Performs the I/O an [`OutputPlan`] describes.
//!
//! This module is the only place where the report reaches a file or stdout.

use super::types::{DeliveryTarget, FailedDelivery, OutputPlan, OutputReport};
use crate::error::AppError;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Delivers every target of `plan` in order.
///
/// A failing target does not stop the ones after it; failures are
/// collected in the returned report.
pub fn deliver(plan: OutputPlan) -> OutputReport {
    let mut report = OutputReport::default();

    for target in plan.targets {
        match write_target(&target) {
            Ok(()) => report.delivered.push(target),
            Err(e) => {
                log::error!("Could not write report to {}: {}", target.describe(), e);
                report.failed.push(FailedDelivery {
                    error: e.to_string(),
                    target,
                });
            }
        }
    }

    log::debug!(
        "Delivered {} bytes to {} target(s), {} failed",
        report.bytes_written(),
        report.delivered.len(),
        report.failed.len()
    );

    report
}

fn write_target(target: &DeliveryTarget) -> Result<(), AppError> {
    match target {
        DeliveryTarget::WriteFile { path, content } => write_file(path, content),
        DeliveryTarget::PrintToStdout { content } => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    log::info!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
