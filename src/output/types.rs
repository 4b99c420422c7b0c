// src/output/types.rs
//! Where a rendered report should go, and how delivery went.
//!
//! A plan is plain data; building one never touches the filesystem.

use std::path::PathBuf;

/// Ordered list of destinations for rendered report text.
#[derive(Debug, Clone, Default)]
pub struct OutputPlan {
    pub targets: Vec<DeliveryTarget>,
}

impl OutputPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(mut self, target: DeliveryTarget) -> Self {
        self.targets.push(target);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// One destination and the text it receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryTarget {
    /// Create or replace a file, creating missing parent directories.
    WriteFile { path: PathBuf, content: String },
    PrintToStdout { content: String },
}

impl DeliveryTarget {
    /// Human-readable destination, for log lines and error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::WriteFile { path, .. } => path.display().to_string(),
            Self::PrintToStdout { .. } => "stdout".to_string(),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::WriteFile { content, .. } | Self::PrintToStdout { content } => content,
        }
    }
}

/// Outcome of delivering a plan. Every target is attempted.
#[derive(Debug, Clone, Default)]
pub struct OutputReport {
    pub delivered: Vec<DeliveryTarget>,
    pub failed: Vec<FailedDelivery>,
}

impl OutputReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Bytes handed to destinations that accepted them.
    pub fn bytes_written(&self) -> usize {
        self.delivered.iter().map(|t| t.content().len()).sum()
    }
}

/// A target that could not be written.
#[derive(Debug, Clone)]
pub struct FailedDelivery {
    pub target: DeliveryTarget,
    pub error: String,
}
