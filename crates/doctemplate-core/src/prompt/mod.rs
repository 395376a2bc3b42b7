//! Value sources - where missing values come from
//!
//! The resolution loop asks a [`ValueSource`] whenever a name has no binding.
//! The console prompt is the interactive source; [`PresetValues`] answers from a
//! mapping first and [`ScriptedValues`] replays fixed answers for tests.

use indexmap::IndexMap;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use crate::error::{DoctemplateError, Result};

/// Heading printed once before the first request of a run
pub const SESSION_HEADING: &str = "Enter template values:";

/// Supplier of values for names that have no binding
pub trait ValueSource {
    /// Called once before the first request of a run
    fn begin(&mut self) -> Result<()> {
        Ok(())
    }

    /// Obtain a value for `name`
    fn request(&mut self, name: &str) -> Result<String>;
}

impl<S: ValueSource + ?Sized> ValueSource for Box<S> {
    fn begin(&mut self) -> Result<()> {
        (**self).begin()
    }

    fn request(&mut self, name: &str) -> Result<String> {
        (**self).request(name)
    }
}

impl<S: ValueSource + ?Sized> ValueSource for &mut S {
    fn begin(&mut self) -> Result<()> {
        (**self).begin()
    }

    fn request(&mut self, name: &str) -> Result<String> {
        (**self).request(name)
    }
}

/// Line-oriented prompt: writes `name=` and reads one line
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn prompt_error(err: io::Error) -> DoctemplateError {
        DoctemplateError::InputFailed(err.to_string())
    }
}

impl ConsolePrompt<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the process's stdin/stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ValueSource for ConsolePrompt<R, W> {
    fn begin(&mut self) -> Result<()> {
        writeln!(self.output, "{SESSION_HEADING}").map_err(Self::prompt_error)
    }

    fn request(&mut self, name: &str) -> Result<String> {
        write!(self.output, "{name}=").map_err(Self::prompt_error)?;
        self.output.flush().map_err(Self::prompt_error)?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(Self::prompt_error)?;
        if read == 0 {
            return Err(DoctemplateError::InputExhausted {
                name: name.to_string(),
            });
        }

        let value = line.strip_suffix('\n').unwrap_or(&line);
        let value = value.strip_suffix('\r').unwrap_or(value);
        Ok(value.to_string())
    }
}

/// Answers from a fixed mapping, delegating other names to a fallback
pub struct PresetValues<S> {
    values: IndexMap<String, String>,
    fallback: S,
    fallback_started: bool,
}

impl<S: ValueSource> PresetValues<S> {
    pub fn new(values: IndexMap<String, String>, fallback: S) -> Self {
        Self {
            values,
            fallback,
            fallback_started: false,
        }
    }
}

/// Parse `NAME=VALUE` pairs; the value may itself contain `=`
pub fn parse_pairs<I, T>(pairs: I) -> Result<IndexMap<String, String>>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    pairs
        .into_iter()
        .map(|pair| {
            let pair = pair.as_ref();
            match pair.split_once('=') {
                Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
                _ => Err(DoctemplateError::Generic(format!(
                    "Invalid value '{}': expected NAME=VALUE",
                    pair
                ))),
            }
        })
        .collect()
}

impl<S: ValueSource> ValueSource for PresetValues<S> {
    fn request(&mut self, name: &str) -> Result<String> {
        if let Some(value) = self.values.get(name) {
            tracing::debug!(name, "answered from preset values");
            return Ok(value.clone());
        }

        // The fallback's session starts with the first question it actually gets
        if !self.fallback_started {
            self.fallback.begin()?;
            self.fallback_started = true;
        }
        self.fallback.request(name)
    }
}

/// Replays scripted answers in order and records every request
#[derive(Debug, Default)]
pub struct ScriptedValues {
    answers: VecDeque<String>,
    requests: Vec<String>,
    sessions: usize,
}

impl ScriptedValues {
    pub fn new<I, T>(answers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            requests: Vec::new(),
            sessions: 0,
        }
    }

    /// Names requested so far, in order
    pub fn requests(&self) -> &[String] {
        &self.requests
    }

    /// How many times a session was started
    pub fn sessions(&self) -> usize {
        self.sessions
    }

    /// Answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl ValueSource for ScriptedValues {
    fn begin(&mut self) -> Result<()> {
        self.sessions += 1;
        Ok(())
    }

    fn request(&mut self, name: &str) -> Result<String> {
        self.requests.push(name.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| DoctemplateError::InputExhausted {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_console_prompt_reads_lines() {
        let mut output = Vec::new();
        let mut prompt = ConsolePrompt::new(Cursor::new("World\r\n10\n"), &mut output);
        prompt.begin().unwrap();
        assert_eq!(prompt.request("name").unwrap(), "World");
        assert_eq!(prompt.request("price").unwrap(), "10");
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Enter template values:\nname=price="
        );
    }

    #[test]
    fn test_console_prompt_keeps_inner_whitespace() {
        let mut prompt = ConsolePrompt::new(Cursor::new("  Jane Doe \n"), Vec::new());
        assert_eq!(prompt.request("name").unwrap(), "  Jane Doe ");
    }

    #[test]
    fn test_console_prompt_empty_line_is_a_value() {
        let mut prompt = ConsolePrompt::new(Cursor::new("\n"), Vec::new());
        assert_eq!(prompt.request("note").unwrap(), "");
    }

    #[test]
    fn test_console_prompt_last_line_without_newline() {
        let mut prompt = ConsolePrompt::new(Cursor::new("last"), Vec::new());
        assert_eq!(prompt.request("x").unwrap(), "last");
    }

    #[test]
    fn test_console_prompt_end_of_input() {
        let mut prompt = ConsolePrompt::new(Cursor::new(""), Vec::new());
        match prompt.request("name") {
            Err(DoctemplateError::InputExhausted { name }) => assert_eq!(name, "name"),
            other => panic!("Expected InputExhausted, got {:?}", other),
        }
    }

    #[test]
    fn test_preset_values_fall_back() {
        let presets = parse_pairs(["a=1", "b=x=y"]).unwrap();
        let mut source = PresetValues::new(presets, ScriptedValues::new(["typed"]));

        assert_eq!(source.request("b").unwrap(), "x=y");
        assert_eq!(source.request("a").unwrap(), "1");
        assert_eq!(source.fallback.sessions(), 0);

        assert_eq!(source.request("c").unwrap(), "typed");
        assert_eq!(source.fallback.requests(), ["c"]);
        assert_eq!(source.fallback.sessions(), 1);
    }

    #[test]
    fn test_parse_pairs_rejects_missing_name() {
        assert!(parse_pairs(["=1"]).is_err());
        assert!(parse_pairs(["novalue"]).is_err());
    }

    #[test]
    fn test_scripted_values_exhaust() {
        let mut source = ScriptedValues::new(["1"]);
        assert_eq!(source.request("a").unwrap(), "1");
        assert!(matches!(
            source.request("b"),
            Err(DoctemplateError::InputExhausted { .. })
        ));
        assert_eq!(source.requests(), ["a", "b"]);
    }
}
