//! Placeholder resolution
//!
//! [`Driver`] turns a document body into filled text: cached values first, then
//! prompts for the remaining literals, then formulas, each retried while the
//! evaluator reports a missing name.

mod driver;
mod protocol;

pub use driver::Driver;
pub use protocol::{identifier_budget, resolve_formula};

use crate::cache::Bindings;

/// Values entered during one run, in entry order
///
/// Values that only came from the cache are never recorded here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnteredValues(Bindings);

impl EnteredValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bindings(&self) -> &Bindings {
        &self.0
    }

    pub fn into_bindings(self) -> Bindings {
        self.0
    }
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilledDocument {
    /// Body with every placeholder replaced
    pub text: String,
    /// Values entered while filling
    pub entered: EnteredValues,
}
