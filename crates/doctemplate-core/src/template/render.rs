//! Span-based rewriting of placeholder occurrences

use indexmap::IndexMap;

use super::error::TemplateError;
use super::scan::Occurrences;

/// Replace every placeholder occurrence with its resolved value
///
/// `resolved` maps raw token content to the text written in its place. The
/// text is rewritten in one pass over the scanned spans, so a value never
/// shifts the alignment of a later token and a token is never matched as a
/// bare substring of another one.
pub fn render(text: &str, resolved: &IndexMap<String, String>) -> Result<String, TemplateError> {
    let mut output = String::with_capacity(text.len());
    let mut last = 0;

    for occurrence in Occurrences::new(text) {
        let value = resolved
            .get(occurrence.raw)
            .ok_or_else(|| TemplateError::UnresolvedPlaceholder {
                token: occurrence.raw.to_string(),
                line: occurrence.line,
            })?;

        output.push_str(&text[last..occurrence.start]);
        output.push_str(value);
        last = occurrence.end;
    }

    output.push_str(&text[last..]);
    Ok(output)
}
