//! Conversions between bound strings and script values

use rhai::{Dynamic, FLOAT, INT};

/// Whether `text` is a plain decimal number such as `10`, `-3` or `9.95`
///
/// Redundant leading zeros (`007`) and exponents are not numbers here, so
/// identifiers like postal codes keep their exact spelling.
fn is_plain_number(text: &str) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits, None),
    };

    if integer.is_empty() || !integer.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if integer.len() > 1 && integer.starts_with('0') {
        return false;
    }

    match fraction {
        Some(fraction) => !fraction.is_empty() && fraction.bytes().all(|b| b.is_ascii_digit()),
        None => true,
    }
}

/// Script value for a bound string: integer, float or string
pub fn from_binding(value: &str) -> Dynamic {
    if is_plain_number(value) {
        if !value.contains('.') {
            if let Ok(integer) = value.parse::<INT>() {
                return Dynamic::from_int(integer);
            }
        }
        if let Ok(float) = value.parse::<FLOAT>() {
            return Dynamic::from_float(float);
        }
    }

    Dynamic::from(value.to_string())
}

/// Text written into the document for an evaluation result
pub fn to_text(value: &Dynamic) -> String {
    if value.is_unit() {
        return String::new();
    }
    if let Ok(float) = value.as_float() {
        return float_text(float);
    }
    value.to_string()
}

fn float_text(value: FLOAT) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        (value as i64).to_string()
    } else {
        value.to_string()
    }
}

/// Numeric reading of a script value, accepting numeric strings
pub(crate) fn as_number(value: &Dynamic) -> Option<FLOAT> {
    if let Ok(integer) = value.as_int() {
        return Some(integer as FLOAT);
    }
    if let Ok(float) = value.as_float() {
        return Some(float);
    }
    if value.is_string() {
        let text = value.to_string();
        return text.trim().parse::<FLOAT>().ok().filter(|n| n.is_finite());
    }
    None
}
