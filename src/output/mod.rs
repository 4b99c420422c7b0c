// src/output/mod.rs
//! Report delivery, split into planning and execution.
//!
//! Planning (which targets receive which text) is pure; execution in
//! [`writer`] is the only place that touches the filesystem or stdout.

mod paths;
mod types;
mod writer;

pub use paths::default_csv_filename;
pub use types::{DeliveryTarget, FailedDelivery, OutputPlan, OutputReport};
pub use writer::deliver;
