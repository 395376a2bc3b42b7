//! Template error types

use std::fmt;

/// Template rendering errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A placeholder occurrence has no resolved value
    UnresolvedPlaceholder {
        /// Raw content between the markers
        token: String,
        /// Line number of the occurrence
        line: usize,
    },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::UnresolvedPlaceholder { token, line } => {
                write!(f, "Placeholder '!{}!' at line {} has no value", token, line)
            }
        }
    }
}

impl std::error::Error for TemplateError {}
