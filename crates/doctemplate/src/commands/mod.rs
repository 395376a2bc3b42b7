//! CLI command implementations

pub mod cache;
pub mod fill;
pub mod scan;
