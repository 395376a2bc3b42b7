//! Substitution driver

use indexmap::IndexMap;

use super::protocol::resolve_formula;
use super::{EnteredValues, FilledDocument};
use crate::cache::Bindings;
use crate::document::ValueEncoding;
use crate::error::Result;
use crate::eval::Evaluator;
use crate::prompt::ValueSource;
use crate::template::{render, scan, PlaceholderToken};

/// Fills one document body
///
/// A driver owns its evaluator for exactly one run, so bindings never leak
/// from one document into the next.
pub struct Driver<E, S> {
    evaluator: E,
    session: Session<S>,
    encoding: ValueEncoding,
}

/// Value source whose session is announced before the first request only
struct Session<S> {
    source: S,
    started: bool,
}

impl<S: ValueSource> Session<S> {
    fn request(&mut self, name: &str) -> Result<String> {
        if !self.started {
            self.source.begin()?;
            self.started = true;
        }
        self.source.request(name)
    }
}

impl<E: Evaluator, S: ValueSource> Driver<E, S> {
    pub fn new(evaluator: E, source: S) -> Self {
        Self {
            evaluator,
            session: Session {
                source,
                started: false,
            },
            encoding: ValueEncoding::Plain,
        }
    }

    /// Encoding applied to values as they are written into the text
    pub fn with_encoding(mut self, encoding: ValueEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Resolve every placeholder in `text`
    ///
    /// `cached` values are bound first and fill matching literals without a
    /// prompt. Nothing is returned unless every placeholder was resolved.
    pub fn run(mut self, text: &str, cached: &Bindings) -> Result<FilledDocument> {
        let tokens = scan(text);
        let mut entered = EnteredValues::new();

        if tokens.is_empty() {
            tracing::info!("no placeholders found");
            return Ok(FilledDocument {
                text: text.to_string(),
                entered,
            });
        }

        let (formulas, literals): (Vec<PlaceholderToken>, Vec<PlaceholderToken>) =
            tokens.into_iter().partition(PlaceholderToken::is_formula);

        for (name, value) in cached {
            self.evaluator.bind(name, value);
        }

        let mut resolved: IndexMap<String, String> = IndexMap::new();
        let mut pending = Vec::new();
        for literal in &literals {
            match cached.get(literal.expression()) {
                Some(value) => {
                    tracing::debug!(name = literal.expression(), "literal filled from cache");
                    resolved.insert(literal.raw().to_string(), value.clone());
                }
                None => pending.push(literal),
            }
        }

        for literal in pending {
            let name = literal.expression();
            let value = self.session.request(name)?;
            self.evaluator.bind(name, &value);
            entered.record(name, value.clone());
            resolved.insert(literal.raw().to_string(), value);
        }

        for formula in &formulas {
            let session = &mut self.session;
            let value = resolve_formula(&mut self.evaluator, formula.expression(), |name| {
                let value = session.request(name)?;
                entered.record(name, value.clone());
                Ok(value)
            })?;
            tracing::debug!(expression = formula.expression(), "formula resolved");
            resolved.insert(formula.raw().to_string(), value);
        }

        let encoded: IndexMap<String, String> = resolved
            .into_iter()
            .map(|(raw, value)| {
                let value = self.encoding.encode(&value).into_owned();
                (raw, value)
            })
            .collect();
        let text = render(text, &encoded)?;

        tracing::info!(
            literals = literals.len(),
            formulas = formulas.len(),
            entered = entered.len(),
            "filled placeholders"
        );

        Ok(FilledDocument { text, entered })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Locale;
    use crate::error::DoctemplateError;
    use crate::eval::ScriptEnvironment;
    use crate::prompt::ScriptedValues;
    use chrono::NaiveDate;

    fn environment() -> ScriptEnvironment {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        ScriptEnvironment::with_date(&Locale::default(), today)
    }

    fn cached(pairs: &[(&str, &str)]) -> Bindings {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn fill(text: &str, cache: &Bindings, answers: &mut ScriptedValues) -> Result<FilledDocument> {
        Driver::new(environment(), answers).run(text, cache)
    }

    #[test]
    fn test_literal_from_prompt() {
        let mut answers = ScriptedValues::new(["World"]);
        let filled = fill("Hello !name!!", &Bindings::new(), &mut answers).unwrap();

        assert_eq!(filled.text, "Hello World!");
        assert_eq!(answers.requests(), ["name"]);
        assert_eq!(filled.entered.get("name"), Some("World"));
    }

    #[test]
    fn test_formula_prompts_for_each_missing_name() {
        let mut answers = ScriptedValues::new(["10", "3"]);
        let filled = fill("Total: !=price*qty!", &Bindings::new(), &mut answers).unwrap();

        assert_eq!(filled.text, "Total: 30");
        assert_eq!(answers.requests(), ["price", "qty"]);
        let entered: Vec<_> = filled.entered.iter().collect();
        assert_eq!(entered, vec![("price", "10"), ("qty", "3")]);
    }

    #[test]
    fn test_cached_literal_is_not_prompted() {
        let mut answers = ScriptedValues::new(Vec::<String>::new());
        let filled = fill("Hi !name!", &cached(&[("name", "Alice")]), &mut answers).unwrap();

        assert_eq!(filled.text, "Hi Alice");
        assert!(answers.requests().is_empty());
        assert_eq!(answers.sessions(), 0);
        assert!(filled.entered.is_empty());
    }

    #[test]
    fn test_cached_values_feed_formulas() {
        let mut answers = ScriptedValues::new(["4"]);
        let filled = fill("!=rate*hours!", &cached(&[("rate", "25")]), &mut answers).unwrap();

        assert_eq!(filled.text, "100");
        assert_eq!(answers.requests(), ["hours"]);
        assert!(!filled.entered.contains("rate"));
    }

    #[test]
    fn test_unknown_function_aborts() {
        let mut answers = ScriptedValues::new(Vec::<String>::new());
        let result = fill("x !=unknownFn()! y", &Bindings::new(), &mut answers);

        match result {
            Err(DoctemplateError::EvaluationFailed { expression, .. }) => {
                assert_eq!(expression, "unknownFn()")
            }
            other => panic!("Expected EvaluationFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_formula_aborts() {
        for text in ["total: !=!", "total: != !"] {
            let mut answers = ScriptedValues::new(Vec::<String>::new());
            match fill(text, &Bindings::new(), &mut answers) {
                Err(DoctemplateError::EvaluationFailed { detail, .. }) => {
                    assert_eq!(detail, "empty formula")
                }
                other => panic!("Expected EvaluationFailed, got {:?}", other),
            }
            assert!(answers.requests().is_empty());
        }
    }

    #[test]
    fn test_shared_name_is_asked_once() {
        let mut answers = ScriptedValues::new(["5", "1"]);
        let filled = fill("!=a+b! and !=a*2!", &Bindings::new(), &mut answers).unwrap();

        assert_eq!(filled.text, "6 and 10");
        assert_eq!(answers.requests(), ["a", "b"]);
    }

    #[test]
    fn test_literal_name_shared_with_formula() {
        let mut answers = ScriptedValues::new(["7"]);
        let filled = fill("!qty! items, twice: !=qty*2!", &Bindings::new(), &mut answers).unwrap();

        assert_eq!(filled.text, "7 items, twice: 14");
        assert_eq!(answers.requests(), ["qty"]);
    }

    #[test]
    fn test_repeated_placeholder_resolved_once() {
        let mut answers = ScriptedValues::new(["Bob"]);
        let filled = fill("!n!, !n!, !n!", &Bindings::new(), &mut answers).unwrap();

        assert_eq!(filled.text, "Bob, Bob, Bob");
        assert_eq!(answers.requests(), ["n"]);
    }

    #[test]
    fn test_session_announced_once_and_only_when_needed() {
        let mut answers = ScriptedValues::new(["1", "2"]);
        fill("!a! !=a+b!", &Bindings::new(), &mut answers).unwrap();
        assert_eq!(answers.sessions(), 1);

        let mut silent = ScriptedValues::new(Vec::<String>::new());
        fill("!=1+1!", &Bindings::new(), &mut silent).unwrap();
        assert_eq!(silent.sessions(), 0);
    }

    #[test]
    fn test_empty_text_and_no_placeholders() {
        let mut answers = ScriptedValues::new(Vec::<String>::new());
        let filled = fill("", &Bindings::new(), &mut answers).unwrap();
        assert_eq!(filled.text, "");

        let filled = fill("plain <b>text</b>", &Bindings::new(), &mut answers).unwrap();
        assert_eq!(filled.text, "plain <b>text</b>");
        assert!(answers.requests().is_empty());
    }

    #[test]
    fn test_input_exhausted_aborts_with_name() {
        let mut answers = ScriptedValues::new(["x"]);
        let result = fill("!first! !second!", &Bindings::new(), &mut answers);

        assert!(matches!(
            result,
            Err(DoctemplateError::InputExhausted { name }) if name == "second"
        ));
    }

    #[test]
    fn test_no_tokens_left_after_success() {
        let mut answers = ScriptedValues::new(["a", "b", "2"]);
        let filled = fill("!x! !y! !=z*3! !x!", &Bindings::new(), &mut answers).unwrap();

        assert_eq!(filled.text, "a b 6 a");
        assert!(scan(&filled.text).is_empty());
    }

    #[test]
    fn test_literal_only_fill_is_idempotent() {
        let values = cached(&[("a", "1"), ("b", "two")]);
        let mut answers = ScriptedValues::new(Vec::<String>::new());

        let first = fill("!a!-!b!", &values, &mut answers).unwrap();
        let second = fill("!a!-!b!", &values, &mut answers).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.text, "1-two");
    }

    #[test]
    fn test_xml_encoding_applies_to_output_only() {
        let mut answers = ScriptedValues::new(["Smith & Sons"]);
        let filled = Driver::new(environment(), &mut answers)
            .with_encoding(ValueEncoding::Xml)
            .run("<w:t>!company!</w:t><w:t>!=company.len()!</w:t>", &Bindings::new())
            .unwrap();

        assert_eq!(filled.text, "<w:t>Smith &amp; Sons</w:t><w:t>12</w:t>");
        assert_eq!(filled.entered.get("company"), Some("Smith & Sons"));
    }

    #[test]
    fn test_builtins_need_no_prompt() {
        let mut answers = ScriptedValues::new(["1234.5"]);
        let filled = fill("!=today()! !=currency(total)!", &Bindings::new(), &mut answers).unwrap();

        assert_eq!(filled.text, "16.10.2026 1.234,50");
        assert_eq!(answers.requests(), ["total"]);
    }
}
