use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DoctemplateError {
    // Evaluation errors
    #[error("EVALUATION_FAILED: '{expression}': {detail}")]
    EvaluationFailed { expression: String, detail: String },

    #[error(
        "RESOLUTION_STALLED: '{expression}' still reports '{name}' as unresolved after it was supplied"
    )]
    ResolutionStalled { expression: String, name: String },

    // Input errors
    #[error("INPUT_EXHAUSTED: input ended before a value for '{name}' was supplied")]
    InputExhausted { name: String },

    #[error("INPUT_FAILED: {0}")]
    InputFailed(String),

    // Cache errors
    #[error("CACHE_LOAD_FAILED: '{path}': {reason}")]
    CacheLoadFailed { path: PathBuf, reason: String },

    #[error("CACHE_WRITE_FAILED: '{path}': {reason}")]
    CacheWriteFailed { path: PathBuf, reason: String },

    // Document errors
    #[error("DOCUMENT_READ_FAILED: '{path}': {reason}")]
    DocumentReadFailed { path: PathBuf, reason: String },

    #[error("DOCUMENT_WRITE_FAILED: '{path}': {reason}")]
    DocumentWriteFailed { path: PathBuf, reason: String },

    #[error("OUTPUT_PATH_INVALID: {0}")]
    OutputPathInvalid(String),

    // Config errors
    #[error("CONFIG_PARSE_ERROR: {0}")]
    ConfigParseError(String),

    #[error("CONFIG_INVALID_VALUE: {field}: {reason}")]
    ConfigInvalidValue { field: String, reason: String },

    // IO errors
    #[error("IO_ERROR: {0}")]
    IoError(#[from] std::io::Error),

    // Generic errors
    #[error("{0}")]
    Generic(String),
}

impl From<crate::template::error::TemplateError> for DoctemplateError {
    fn from(err: crate::template::error::TemplateError) -> Self {
        DoctemplateError::Generic(format!("Template error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, DoctemplateError>;
