//! Number handling shared by both trackers.
//!
//! Form fields arrive as text, stored collections may contain numbers or
//! numeric strings, and totals are shown either as money or as a plain sum.

use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// Largest magnitude written as a JSON integer; beyond this `f64` loses
/// integer precision.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Read the leading number of `text`, ignoring anything after it.
///
/// Leading whitespace is skipped, then the longest prefix that is a decimal
/// literal (optional sign, digits with an optional fraction, optional
/// exponent) or `Infinity` is read. `"12abc"` is 12 and `"5 hours"` is 5;
/// text with no leading number, such as `"abc"` or `"inf"`, is `None`.
#[must_use]
pub fn parse_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if text[end..].starts_with("Infinity") {
        return Some(if text.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = digits_from(end);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_from(end + 1);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_digits = digits_from(exponent);
        if exponent_digits > 0 {
            end = exponent + exponent_digits;
        }
    }

    text[..end].parse().ok()
}

/// Fixed two-decimal rendering used for money.
///
/// Exact ties round away from zero (`0.125` is `0.13`), and zero never
/// renders with a sign.
#[must_use]
pub fn format_money(value: f64) -> String {
    if value == 0.0 {
        return "0.00".to_string();
    }
    if value.is_infinite() {
        return format_plain(value);
    }
    let scaled = value * 100.0;
    // Only multiples of 1/8 can sit exactly on a hundredths tie.
    let rounded = if (value * 8.0).fract() == 0.0 && scaled.fract().abs() == 0.5 {
        scaled.round() / 100.0
    } else {
        value
    };
    format!("{rounded:.2}")
}

/// Shortest plain rendering: `5` for whole values, `7.5` otherwise.
#[must_use]
pub fn format_plain(value: f64) -> String {
    // Avoid "-0".
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    format!("{value}")
}

/// Serialize whole values as JSON integers (`100`, not `100.0`).
///
/// # Errors
///
/// Propagates serializer errors.
#[allow(clippy::trivially_copy_pass_by_ref)]
pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER {
        #[allow(clippy::cast_possible_truncation)]
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Read a number leniently: JSON numbers and numeric strings are accepted,
/// anything else (including `null`) reads as `0`.
///
/// # Errors
///
/// Only fails if the input is not valid JSON at this position.
pub fn deserialize_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0),
        Some(Value::String(text)) => parse_float(&text).unwrap_or(0.0),
        _ => 0.0,
    })
}
