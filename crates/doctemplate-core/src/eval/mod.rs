//! Expression evaluation
//!
//! Formulas are evaluated through the [`Evaluator`] capability: a binding table
//! plus an `evaluate` operation whose failures say whether a referenced name was
//! missing. [`ScriptEnvironment`] implements it on an embedded Rhai engine.

mod builtins;
mod environment;
mod value;

pub use environment::ScriptEnvironment;
pub use value::{from_binding, to_text};

use thiserror::Error;

/// Why an evaluation attempt did not produce a value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// The expression references a name that has no binding
    #[error("'{0}' is not defined")]
    UnresolvedName(String),

    /// Any other failure: syntax, types, unknown functions, runtime errors
    #[error("{0}")]
    Failure(String),
}

/// Expression evaluator holding named bindings
pub trait Evaluator {
    /// Make `value` visible to later evaluations as `name`, replacing any previous value
    fn bind(&mut self, name: &str, value: &str);

    /// Whether `name` currently has a binding
    fn is_bound(&self, name: &str) -> bool;

    /// Evaluate `expression` against the current bindings
    ///
    /// Evaluation never changes the bindings.
    fn evaluate(&self, expression: &str) -> Result<String, EvalError>;
}
