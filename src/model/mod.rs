// src/model/mod.rs
//! Domain model for the block tree and the report built from it.

mod block;
mod summary;

pub use block::{Block, RawBlock};
pub use summary::SubpageSummary;
