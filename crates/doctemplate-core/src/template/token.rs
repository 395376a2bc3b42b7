//! Placeholder tokens and their classification

use std::collections::HashSet;

use super::scan::{Occurrences, MARKER};

/// Prefix that marks a placeholder as a formula
pub const FORMULA_PREFIX: char = '=';

/// Placeholder classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `!name!`, value supplied directly
    Literal,
    /// `!=expression!`, value computed by the evaluator
    Formula,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Literal => "literal",
            TokenKind::Formula => "formula",
        }
    }
}

/// A distinct placeholder found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderToken {
    raw: String,
    kind: TokenKind,
    line: usize,
}

impl PlaceholderToken {
    /// Classify the raw content found between two markers
    pub fn classify(raw: &str, line: usize) -> Self {
        let kind = if raw.starts_with(FORMULA_PREFIX) {
            TokenKind::Formula
        } else {
            TokenKind::Literal
        };

        Self {
            raw: raw.to_string(),
            kind,
            line,
        }
    }

    /// Content between the markers, exactly as written
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn is_formula(&self) -> bool {
        self.kind == TokenKind::Formula
    }

    /// The expression to evaluate (formula) or the binding name (literal)
    pub fn expression(&self) -> &str {
        match self.kind {
            TokenKind::Formula => &self.raw[FORMULA_PREFIX.len_utf8()..],
            TokenKind::Literal => &self.raw,
        }
    }

    /// The full token including both markers, e.g. `!=a*2!`
    pub fn delimited(&self) -> String {
        let marker = MARKER as char;
        format!("{marker}{}{marker}", self.raw)
    }

    /// Line of the first occurrence
    pub fn line(&self) -> usize {
        self.line
    }
}

/// Scan text for distinct placeholders in discovery order
///
/// Repeated placeholders are reported once, at their first occurrence.
pub fn scan(text: &str) -> Vec<PlaceholderToken> {
    let mut seen = HashSet::new();

    let tokens: Vec<PlaceholderToken> = Occurrences::new(text)
        .filter(|occurrence| seen.insert(occurrence.raw))
        .map(|occurrence| PlaceholderToken::classify(occurrence.raw, occurrence.line))
        .collect();

    tracing::debug!(count = tokens.len(), "scanned placeholders");
    tokens
}
