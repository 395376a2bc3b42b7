//! Value cache - previously entered values, kept next to the template
//!
//! The cache for `invoice.docx` lives in `invoice.docx.yaml` (extension from
//! config) as a flat YAML mapping of name to value. A missing file is an empty
//! cache; anything that is not such a mapping is an error, so a hand-edited file
//! is never silently discarded.

use indexmap::IndexMap;
use serde_yaml::Value;
use std::path::{Path, PathBuf};

use crate::error::{DoctemplateError, Result};

/// Name → value pairs in insertion order
pub type Bindings = IndexMap<String, String>;

/// Cache file belonging to one template
#[derive(Debug, Clone)]
pub struct ValueCache {
    path: PathBuf,
}

impl ValueCache {
    /// Cache at `<template>.<extension>`
    pub fn for_template(template: impl AsRef<Path>, extension: &str) -> Self {
        let mut name = template.as_ref().as_os_str().to_os_string();
        name.push(".");
        name.push(extension.trim_start_matches('.'));
        Self {
            path: PathBuf::from(name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read cached values; a missing file yields an empty mapping
    pub fn load(&self) -> Result<Bindings> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no cache file");
                return Ok(Bindings::new());
            }
            Err(e) => return Err(self.load_error(format!("Failed to read: {}", e))),
        };

        let bindings = self.parse(&content)?;
        tracing::debug!(path = %self.path.display(), count = bindings.len(), "loaded cache");
        Ok(bindings)
    }

    fn parse(&self, content: &str) -> Result<Bindings> {
        let document: Value = serde_yaml::from_str(content)
            .map_err(|e| self.load_error(format!("Failed to parse: {}", e)))?;

        let mapping = match document {
            // An empty file parses as null
            Value::Null => return Ok(Bindings::new()),
            Value::Mapping(mapping) => mapping,
            other => {
                return Err(self.load_error(format!(
                    "expected a mapping of names to values, found {}",
                    describe(&other)
                )))
            }
        };

        let mut bindings = Bindings::with_capacity(mapping.len());
        for (key, value) in mapping {
            let name = match key {
                Value::String(name) => name,
                other => {
                    return Err(self.load_error(format!(
                        "names must be strings, found {}",
                        describe(&other)
                    )))
                }
            };
            let value = scalar_text(&value).ok_or_else(|| {
                self.load_error(format!(
                    "value of '{}' must be a scalar, found {}",
                    name,
                    describe(&value)
                ))
            })?;
            bindings.insert(name, value);
        }

        Ok(bindings)
    }

    /// Write `values`, replacing the whole file atomically
    pub fn save(&self, values: &Bindings) -> Result<()> {
        let content = serde_yaml::to_string(values)
            .map_err(|e| self.write_error(format!("Failed to serialize: {}", e)))?;

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        atomic_write(&content, &self.path, parent)
            .map_err(|reason| self.write_error(reason))?;

        tracing::debug!(path = %self.path.display(), count = values.len(), "saved cache");
        Ok(())
    }

    /// Remove the cache file; returns whether one existed
    pub fn clear(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(self.write_error(format!("Failed to remove: {}", e))),
        }
    }

    fn load_error(&self, reason: String) -> DoctemplateError {
        DoctemplateError::CacheLoadFailed {
            path: self.path.clone(),
            reason,
        }
    }

    fn write_error(&self, reason: String) -> DoctemplateError {
        DoctemplateError::CacheWriteFailed {
            path: self.path.clone(),
            reason,
        }
    }
}

/// Cached values merged with newly entered ones; entered values win
pub fn merge(cached: &Bindings, entered: &Bindings) -> Bindings {
    let mut merged = cached.clone();
    for (name, value) in entered {
        merged.insert(name.clone(), value.clone());
    }
    merged
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Write atomically using NamedTempFile + persist
fn atomic_write(content: &str, path: &Path, parent: &Path) -> std::result::Result<(), String> {
    use std::fs::File;
    use std::io::Write;
    use tempfile::NamedTempFile;

    let mut temp_file = NamedTempFile::new_in(parent)
        .map_err(|e| format!("Failed to create temp file: {}", e))?;

    temp_file
        .write_all(content.as_bytes())
        .map_err(|e| format!("Failed to write temp file: {}", e))?;

    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| format!("Failed to sync temp file: {}", e))?;

    temp_file
        .persist(path)
        .map_err(|e| format!("Failed to persist temp file: {}", e))?;

    // Fsync parent directory for durability (Unix only)
    #[cfg(unix)]
    {
        let parent_file =
            File::open(parent).map_err(|e| format!("Failed to open parent dir: {}", e))?;
        parent_file
            .sync_all()
            .map_err(|e| format!("Failed to sync parent dir: {}", e))?;
    }

    Ok(())
}
