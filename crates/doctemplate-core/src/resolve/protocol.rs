//! Formula resolution loop

use std::collections::HashSet;

use crate::error::{DoctemplateError, Result};
use crate::eval::{EvalError, Evaluator};

/// Evaluate `expression`, supplying missing names until it succeeds
///
/// Each attempt reports at most one missing name. `supply` obtains its value,
/// which is bound before the next attempt. The number of attempts is bounded by
/// [`identifier_budget`]; a name reported again after it was supplied, or one
/// that is already bound, stalls the resolution.
pub fn resolve_formula<E, F>(evaluator: &mut E, expression: &str, mut supply: F) -> Result<String>
where
    E: Evaluator + ?Sized,
    F: FnMut(&str) -> Result<String>,
{
    let budget = identifier_budget(expression);
    let mut supplied: Vec<String> = Vec::new();

    loop {
        let name = match evaluator.evaluate(expression) {
            Ok(value) => return Ok(value),
            Err(EvalError::UnresolvedName(name)) => name,
            Err(EvalError::Failure(detail)) => {
                return Err(DoctemplateError::EvaluationFailed {
                    expression: expression.to_string(),
                    detail,
                })
            }
        };

        if supplied.contains(&name) || supplied.len() >= budget || evaluator.is_bound(&name) {
            return Err(DoctemplateError::ResolutionStalled {
                expression: expression.to_string(),
                name,
            });
        }

        tracing::debug!(expression, name = %name, attempt = supplied.len() + 1, "formula needs a value");
        let value = supply(&name)?;
        evaluator.bind(&name, &value);
        supplied.push(name);
    }
}

/// Number of distinct identifier-like words in `expression`
///
/// String literals and numbers are skipped. Every name an expression can be
/// missing is one of these words, so this bounds the retries of one formula.
pub fn identifier_budget(expression: &str) -> usize {
    let bytes = expression.as_bytes();
    let mut names = HashSet::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'"' | b'\'' | b'`' => {
                i += 1;
                while i < bytes.len() && bytes[i] != b {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                i += 1;
            }
            b'0'..=b'9' => {
                while i < bytes.len()
                    && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_' || bytes[i] == b'.')
                {
                    i += 1;
                }
            }
            _ if b.is_ascii_alphabetic() || b == b'_' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                names.insert(&expression[start..i]);
            }
            _ => i += 1,
        }
    }

    names.len()
}
