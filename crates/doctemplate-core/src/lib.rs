// Core modules
pub mod cache;
pub mod config;
pub mod document;
pub mod error;
pub mod eval;
pub mod prompt;
pub mod resolve;
pub mod template;

// Re-export commonly used types
pub use error::{DoctemplateError, Result};
pub use resolve::{Driver, EnteredValues, FilledDocument};
