//! Built-in transforms selectable by name.

use serde_json::Value;

use crate::pipeline::coerce::{number_value, parse_js_number, to_js_string};
use crate::pipeline::StageError;

use super::ValueTransform;

/// Names accepted by [`BuiltinTransform::from_name`].
pub const BUILTIN_NAMES: &[&str] = &[
    "trim", "upper", "lower", "number", "round", "boolean", "invert", "length", "json",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTransform {
    /// Text form with surrounding whitespace removed.
    Trim,
    Upper,
    Lower,
    /// Parse the text form as a number.
    Number,
    /// Round to the nearest integer, halves upward.
    Round,
    /// Interpret `true/on/yes/1` and `false/off/no/0`.
    Boolean,
    /// Negation of [`BuiltinTransform::Boolean`].
    Invert,
    /// Array length, or character count of the text form.
    Length,
    /// Compact JSON text of the value.
    Json,
}

impl BuiltinTransform {
    pub fn from_name(name: &str) -> Result<Self, StageError> {
        let transform = match name.trim().to_ascii_lowercase().as_str() {
            "trim" => BuiltinTransform::Trim,
            "upper" => BuiltinTransform::Upper,
            "lower" => BuiltinTransform::Lower,
            "number" => BuiltinTransform::Number,
            "round" => BuiltinTransform::Round,
            "boolean" => BuiltinTransform::Boolean,
            "invert" => BuiltinTransform::Invert,
            "length" => BuiltinTransform::Length,
            "json" => BuiltinTransform::Json,
            _ => return Err(StageError::UnknownBuiltin(name.to_string())),
        };
        Ok(transform)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltinTransform::Trim => "trim",
            BuiltinTransform::Upper => "upper",
            BuiltinTransform::Lower => "lower",
            BuiltinTransform::Number => "number",
            BuiltinTransform::Round => "round",
            BuiltinTransform::Boolean => "boolean",
            BuiltinTransform::Invert => "invert",
            BuiltinTransform::Length => "length",
            BuiltinTransform::Json => "json",
        }
    }

    fn reject(&self, value: &Value, expected: &str) -> StageError {
        StageError::Builtin {
            name: self.as_str().to_string(),
            message: format!("'{}' is not {expected}", to_js_string(Some(value))),
        }
    }
}

impl ValueTransform for BuiltinTransform {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn apply(&self, value: Option<&Value>) -> Result<Option<Value>, StageError> {
        let Some(value) = value else {
            return Ok(None);
        };
        let text = || to_js_string(Some(value));

        let out = match self {
            BuiltinTransform::Trim => Value::String(text().trim().to_string()),
            BuiltinTransform::Upper => Value::String(text().to_uppercase()),
            BuiltinTransform::Lower => Value::String(text().to_lowercase()),
            BuiltinTransform::Number => to_number(value)
                .and_then(number_value)
                .ok_or_else(|| self.reject(value, "numeric"))?,
            BuiltinTransform::Round => to_number(value)
                .and_then(|x| number_value((x + 0.5).floor()))
                .ok_or_else(|| self.reject(value, "numeric"))?,
            BuiltinTransform::Boolean => to_bool(value)
                .map(Value::Bool)
                .ok_or_else(|| self.reject(value, "a boolean"))?,
            BuiltinTransform::Invert => to_bool(value)
                .map(|b| Value::Bool(!b))
                .ok_or_else(|| self.reject(value, "a boolean"))?,
            BuiltinTransform::Length => match value {
                Value::Array(items) => Value::from(items.len()),
                other => Value::from(to_js_string(Some(other)).chars().count()),
            },
            BuiltinTransform::Json => Value::String(value.to_string()),
        };
        Ok(Some(out))
    }
}

fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        other => parse_js_number(&to_js_string(Some(other))),
    }
}

fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|x| x != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => Some(true),
            "false" | "off" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
