//! Rhai-backed evaluation environment

use chrono::{Local, NaiveDate};
use rhai::{Dynamic, Engine, EvalAltResult, ParseErrorType, Scope};

use super::builtins;
use super::value::{from_binding, to_text};
use super::{EvalError, Evaluator};
use crate::config::Locale;

/// Upper bound on script operations per evaluation (runaway input protection)
const MAX_OPERATIONS: u64 = 100_000;

/// Maximum expression nesting depth
const MAX_EXPR_DEPTH: usize = 64;

/// Evaluation environment for one run
///
/// Bindings accumulate for the lifetime of the value; nothing is shared
/// between runs. Each evaluation works on a copy of the scope, so a formula
/// cannot change a binding even through a mutating method call.
pub struct ScriptEnvironment {
    engine: Engine,
    scope: Scope<'static>,
}

impl ScriptEnvironment {
    /// Environment using today's local date
    pub fn new(locale: &Locale) -> Self {
        Self::with_date(locale, Local::now().date_naive())
    }

    /// Environment whose `today()` counts from `today`
    pub fn with_date(locale: &Locale, today: NaiveDate) -> Self {
        let mut engine = Engine::new();
        engine.set_max_operations(MAX_OPERATIONS);
        engine.set_max_expr_depths(MAX_EXPR_DEPTH, MAX_EXPR_DEPTH);
        builtins::register(&mut engine, locale, today);

        Self {
            engine,
            scope: Scope::new(),
        }
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.scope.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scope.is_empty()
    }
}

impl Evaluator for ScriptEnvironment {
    fn bind(&mut self, name: &str, value: &str) {
        let value = from_binding(value);
        tracing::debug!(name, kind = value.type_name(), "bind");

        if self.scope.contains(name) {
            self.scope.set_value(name.to_string(), value);
        } else {
            self.scope.push_dynamic(name.to_string(), value);
        }
    }

    fn is_bound(&self, name: &str) -> bool {
        self.scope.contains(name)
    }

    fn evaluate(&self, expression: &str) -> Result<String, EvalError> {
        if expression.trim().is_empty() {
            return Err(EvalError::Failure("empty formula".to_string()));
        }

        let mut scope = self.scope.clone();

        self.engine
            .eval_expression_with_scope::<Dynamic>(&mut scope, expression)
            .map(|value| to_text(&value))
            .map_err(|err| classify(*err))
    }
}

/// Split evaluator failures into "a name is missing" and everything else
fn classify(err: EvalAltResult) -> EvalError {
    match err {
        EvalAltResult::ErrorVariableNotFound(name, _) => EvalError::UnresolvedName(name),
        EvalAltResult::ErrorParsing(ParseErrorType::VariableUndefined(name), _) => {
            EvalError::UnresolvedName(name)
        }
        other => EvalError::Failure(other.to_string()),
    }
}
