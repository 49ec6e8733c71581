//! Templater stage: renders Mustache-style `{{value}}` templates with
//! minijinja.
//!
//! Templates are arbitrary strings, so a fresh [`minijinja::Environment`] is
//! created per render call, as for notification templates. Mustache tags are
//! rewritten into minijinja syntax first:
//! - `{{value}}` is HTML-escaped, `{{{value}}}` and `{{&value}}` are raw
//! - `{{#value}}…{{/value}}` renders when `value` is truthy, `{{^value}}`
//!   when it is not; sections do not iterate lists or push context
//! - `{{! comment}}` is dropped
//!
//! Values print with JavaScript `String()` semantics, and undefined or null
//! values print as the empty string.

use std::fmt::Write as _;

use minijinja::{context, Environment, UndefinedBehavior};
use serde_json::Value;

use super::coerce::to_js_string;
use super::StageError;

const UNESCAPED_FILTER: &str = "unescaped";

#[derive(Debug, Clone)]
pub(crate) struct ValueTemplate {
    source: String,
}

impl ValueTemplate {
    pub(crate) fn new(source: &str) -> Self {
        Self {
            source: translate_mustache(source),
        }
    }

    fn build_env() -> Environment<'static> {
        let mut env = Environment::new();
        // `{{ value.field }}` on a missing field renders empty, as in Mustache
        env.set_undefined_behavior(UndefinedBehavior::Chainable);
        env.add_filter(UNESCAPED_FILTER, |value: minijinja::Value| {
            minijinja::Value::from_safe_string(js_text(&value))
        });
        env.set_formatter(|out, _state, value| {
            if value.is_safe() {
                out.write_str(value.as_str().unwrap_or_default())?;
            } else {
                out.write_str(&escape_html(&js_text(value)))?;
            }
            Ok(())
        });
        env
    }

    /// Render with `value` bound.
    pub(crate) fn render(&self, value: Option<&Value>) -> Result<String, StageError> {
        let env = Self::build_env();
        let rendered = match value {
            None => env.render_str(&self.source, context! {}),
            Some(v) => env.render_str(&self.source, context! { value => v }),
        };
        rendered.map_err(|e| StageError::Template(e.to_string()))
    }

    /// Check that the template parses, without rendering it.
    pub(crate) fn validate(&self) -> Result<(), StageError> {
        let env = Self::build_env();
        env.template_from_str(&self.source)
            .map_err(|e| StageError::Template(e.to_string()))?;
        Ok(())
    }
}

/// Text of a template value as JavaScript's `String()` would produce it,
/// except that undefined and null are empty.
fn js_text(value: &minijinja::Value) -> String {
    if value.is_undefined() || value.is_none() {
        return String::new();
    }
    match serde_json::to_value(value) {
        Ok(json) => to_js_string(Some(&json)),
        Err(_) => value.to_string(),
    }
}

/// Mustache's HTML escaping table.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '/' => out.push_str("&#x2F;"),
            '`' => out.push_str("&#x60;"),
            '=' => out.push_str("&#x3D;"),
            other => out.push(other),
        }
    }
    out
}

/// Rewrite Mustache tags into minijinja syntax. Text outside tags, and
/// anything that is not a Mustache tag, is kept verbatim.
fn translate_mustache(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let tag = &rest[start..];

        if let Some(end) = tag.strip_prefix("{{{").and_then(|t| t.find("}}}")) {
            let name = tag[3..3 + end].trim();
            let _ = write!(out, "{{{{ {name}|{UNESCAPED_FILTER} }}}}");
            rest = &tag[3 + end + 3..];
            continue;
        }

        match tag[2..].find("}}") {
            Some(end) => {
                out.push_str(&translate_tag(tag[2..2 + end].trim()));
                rest = &tag[2 + end + 2..];
            }
            None => {
                // unterminated; minijinja reports the syntax error
                out.push_str(tag);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}

fn translate_tag(tag: &str) -> String {
    let mut chars = tag.chars();
    let sigil = chars.next();
    let name = chars.as_str().trim();
    match sigil {
        Some('#') => format!("{{% if {name} %}}"),
        Some('^') => format!("{{% if not {name} %}}"),
        Some('/') => "{% endif %}".to_string(),
        Some('!') => String::new(),
        Some('&') => format!("{{{{ {name}|{UNESCAPED_FILTER} }}}}"),
        _ => format!("{{{{ {tag} }}}}"),
    }
}
