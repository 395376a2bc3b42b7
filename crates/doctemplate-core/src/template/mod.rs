//! Template module - placeholder discovery and rewriting
//!
//! Documents mark substitution points with a marker pair:
//!
//! - Literal placeholders: `!name!`, value supplied by the user or the cache
//! - Formula placeholders: `!=expression!`, value computed by the evaluator
//!
//! Placeholder content never contains the marker or angle brackets, which keeps
//! scanning inside XML document bodies from crossing element boundaries.

pub mod error;
pub mod render;
pub mod scan;
pub mod token;

pub use error::TemplateError;
pub use render::render;
pub use scan::{Occurrence, Occurrences};
pub use token::{scan, PlaceholderToken, TokenKind};

#[cfg(test)]
mod tests;
