//! Plain UTF-8 text documents

use std::path::{Path, PathBuf};

use super::{Document, ValueEncoding};
use crate::error::{DoctemplateError, Result};

pub struct TextDocument {
    path: PathBuf,
}

impl TextDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Document for TextDocument {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_text(&self) -> Result<String> {
        std::fs::read_to_string(&self.path).map_err(|e| DoctemplateError::DocumentReadFailed {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    fn write_text(&self, destination: &Path, text: &str) -> Result<()> {
        std::fs::write(destination, text).map_err(|e| DoctemplateError::DocumentWriteFailed {
            path: destination.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn encoding(&self) -> ValueEncoding {
        ValueEncoding::Plain
    }
}
