//! Value ↔ text coercions with the dashboard's JavaScript semantics.
//!
//! Rules are authored against the text a browser would produce for a value,
//! so matching has to see the same text: `String(value)` for rendering and
//! `Number(text)` for numeric comparison.

use serde_json::{Number, Value};

/// Text form of a pipeline value; `None` is "undefined".
pub(crate) fn to_js_string(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(v) => value_to_js_string(v),
    }
}

fn value_to_js_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_js_string(n),
        Value::String(s) => s.clone(),
        // Array.prototype.join renders null holes as empty strings
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => value_to_js_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

fn number_to_js_string(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    n.as_f64()
        .map(format_js_number)
        .unwrap_or_else(|| n.to_string())
}

/// Shortest round-trip decimal form, switching to exponent notation
/// outside `[1e-6, 1e21)` the way JavaScript does.
pub(crate) fn format_js_number(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if x == 0.0 {
        return "0".to_string();
    }
    let abs = x.abs();
    if !(1e-6..1e21).contains(&abs) {
        let formatted = format!("{:e}", x);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => formatted,
        };
    }
    format!("{}", x)
}

/// Parse text the way `Number(text)` does, keeping finite results only.
///
/// Surrounding whitespace is ignored and `0x`/`0o`/`0b` prefixes are
/// honoured. Blank text is zero, so an empty retained payload matches a
/// `0` rule.
pub(crate) fn parse_js_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = trimmed.strip_prefix(prefix) {
            if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
                return None;
            }
            return u64::from_str_radix(digits, radix).ok().map(|v| v as f64);
        }
    }

    // Rust accepts spellings JavaScript does not ("inf", "nan"); only
    // finite values survive, which drops them along with "Infinity".
    let parsed: f64 = trimmed.parse().ok()?;
    parsed.is_finite().then_some(parsed)
}

/// Build a JSON number, preferring the integer form for whole values.
pub(crate) fn number_value(x: f64) -> Option<Value> {
    if x.fract() == 0.0 && x.abs() < i64::MAX as f64 {
        return Some(Value::from(x as i64));
    }
    Number::from_f64(x).map(Value::Number)
}
