//! Locale conventions for number and date formatting

use chrono::NaiveDate;

/// Number and date conventions of a locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    tag: &'static str,
    group_separator: char,
    decimal_separator: char,
    date_pattern: &'static str,
}

/// 2^53: from here on `f64` has no fractional part
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

const PRESETS: &[Locale] = &[
    Locale::preset("de-DE", '.', ',', "%-d.%-m.%Y"),
    Locale::preset("de-AT", '.', ',', "%-d.%-m.%Y"),
    Locale::preset("de-CH", '\'', '.', "%-d.%-m.%Y"),
    Locale::preset("en-US", ',', '.', "%-m/%-d/%Y"),
    Locale::preset("en-GB", ',', '.', "%d/%m/%Y"),
    Locale::preset("fr-FR", '\u{202f}', ',', "%d/%m/%Y"),
];

impl Locale {
    const fn preset(
        tag: &'static str,
        group_separator: char,
        decimal_separator: char,
        date_pattern: &'static str,
    ) -> Self {
        Self {
            tag,
            group_separator,
            decimal_separator,
            date_pattern,
        }
    }

    /// Look up a preset by tag (case-insensitive, `_` accepted for `-`)
    pub fn from_tag(tag: &str) -> Option<Self> {
        let normalized = tag.trim().replace('_', "-");
        PRESETS
            .iter()
            .find(|locale| locale.tag.eq_ignore_ascii_case(&normalized))
            .cloned()
    }

    pub fn supported_tags() -> Vec<&'static str> {
        PRESETS.iter().map(|locale| locale.tag).collect()
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// Short date form, e.g. `16.10.2026` for de-DE
    pub fn format_date(&self, date: NaiveDate) -> String {
        date.format(self.date_pattern).to_string()
    }

    /// Render with exactly two fractional digits and grouped thousands
    ///
    /// Rounds half away from zero. Returns `None` for NaN and infinities.
    pub fn format_number(&self, value: f64) -> Option<String> {
        if !value.is_finite() {
            return None;
        }

        let magnitude = value.abs();
        let (integer, fraction) = if magnitude >= EXACT_INTEGER_LIMIT {
            // Every float this large is a whole number
            (format!("{magnitude:.0}"), 0)
        } else {
            let cents = (magnitude * 100.0).round() as u128;
            ((cents / 100).to_string(), cents % 100)
        };
        let is_zero = fraction == 0 && integer.bytes().all(|b| b == b'0');

        let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
        for (i, digit) in integer.chars().enumerate() {
            if i > 0 && (integer.len() - i) % 3 == 0 {
                grouped.push(self.group_separator);
            }
            grouped.push(digit);
        }

        let sign = if value.is_sign_negative() && !is_zero {
            "-"
        } else {
            ""
        };

        Some(format!(
            "{sign}{grouped}{}{fraction:02}",
            self.decimal_separator
        ))
    }
}

impl Default for Locale {
    fn default() -> Self {
        PRESETS[0].clone()
    }
}
