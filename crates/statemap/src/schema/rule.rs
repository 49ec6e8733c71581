//! State rules: a match specification plus presentation overrides.

use serde::{Deserialize, Serialize};

use super::AnimationSpec;

/// A single pattern → presentation mapping.
///
/// The match specification is fixed at construction; presentation fields
/// are plain data. Rule lists are evaluated top-to-bottom, first match wins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StateRule {
    #[serde(rename = "match")]
    matcher: MatchSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<AnimationSpec>,
    /// Passed through to widgets that dim their icon; never merged into the visual.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

impl StateRule {
    pub fn new(matcher: MatchSpec) -> Self {
        Self {
            matcher,
            icon: None,
            color: None,
            label: None,
            aria_label: None,
            animation: None,
            brightness: None,
            tooltip: None,
        }
    }

    pub fn matcher(&self) -> &MatchSpec {
        &self.matcher
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_aria_label(mut self, aria_label: impl Into<String>) -> Self {
        self.aria_label = Some(aria_label.into());
        self
    }

    pub fn with_animation(mut self, animation: AnimationSpec) -> Self {
        self.animation = Some(animation);
        self
    }
}

// ── Match specification ──────────────────────────────────────────────

/// What a rule matches against, decided when the rule is loaded.
///
/// Persisted configs store `match` loosely (string, number, or
/// `{regex, flags}` object); the `/pattern/flags` string shape is resolved
/// into [`MatchSpec::Pattern`] at deserialization time, never at evaluation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMatch", into = "RawMatch")]
pub enum MatchSpec {
    /// Exact, case-insensitive, whole-string match.
    Literal(String),
    /// Exact decimal string form, or numeric equality.
    Numeric(f64),
    /// Regular expression with JavaScript-style flags.
    Pattern { regex: String, flags: String },
}

impl MatchSpec {
    pub fn literal(text: impl Into<String>) -> Self {
        MatchSpec::Literal(text.into())
    }

    pub fn numeric(value: f64) -> Self {
        MatchSpec::Numeric(value)
    }

    pub fn pattern(regex: impl Into<String>, flags: impl Into<String>) -> Self {
        MatchSpec::Pattern {
            regex: regex.into(),
            flags: flags.into(),
        }
    }

    /// Interpret persisted match text: `/pattern/flags` becomes a pattern,
    /// anything else a literal.
    pub fn from_text(text: &str) -> Self {
        match split_pattern_literal(text) {
            Some((regex, flags)) => MatchSpec::pattern(regex, flags),
            None => MatchSpec::Literal(text.to_string()),
        }
    }
}

/// Split `/pattern/flags` at the first and last slash. The last slash must
/// sit past index zero, so a lone `/` stays a literal.
fn split_pattern_literal(text: &str) -> Option<(&str, &str)> {
    if !text.starts_with('/') {
        return None;
    }
    let last = text.rfind('/')?;
    if last == 0 {
        return None;
    }
    Some((&text[1..last], &text[last + 1..]))
}

/// Persisted shape of a `match` field.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawMatch {
    Number(f64),
    Text(String),
    Literal {
        literal: String,
    },
    Pattern {
        regex: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        flags: String,
    },
}

impl From<RawMatch> for MatchSpec {
    fn from(raw: RawMatch) -> Self {
        match raw {
            RawMatch::Number(n) => MatchSpec::Numeric(n),
            RawMatch::Text(text) => MatchSpec::from_text(&text),
            RawMatch::Literal { literal } => MatchSpec::Literal(literal),
            RawMatch::Pattern { regex, flags } => MatchSpec::Pattern { regex, flags },
        }
    }
}

impl From<MatchSpec> for RawMatch {
    fn from(spec: MatchSpec) -> Self {
        match spec {
            MatchSpec::Numeric(n) => RawMatch::Number(n),
            // A literal that reads like `/x/` must not turn into a pattern on reload.
            MatchSpec::Literal(text) if split_pattern_literal(&text).is_some() => {
                RawMatch::Literal { literal: text }
            }
            MatchSpec::Literal(text) => RawMatch::Text(text),
            MatchSpec::Pattern { regex, flags } => RawMatch::Pattern { regex, flags },
        }
    }
}
