//! Per-evaluation options and the evaluation result.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{StateRule, VisualState};

/// Options steering each optional pipeline stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateOptions {
    #[serde(default)]
    pub parse_as_json: bool,
    /// JSONPath query; only consulted when `parse_as_json` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_template: Option<String>,
    /// Transform script source; only run when `sandbox_enabled` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_transform_js: Option<String>,
    /// Name of a built-in transform, used when no script is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_transform_builtin: Option<String>,
    #[serde(default)]
    pub sandbox_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_state: Option<VisualState>,
}

impl EvaluateOptions {
    /// The configured default state, or `{ label: "Unknown" }`.
    pub fn default_visual(&self) -> VisualState {
        self.default_state.clone().unwrap_or_else(VisualState::unknown)
    }
}

/// Outcome of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResult {
    /// Value after the optional JSON decode, before extraction.
    pub value_raw: Value,
    /// Value after the whole pipeline; `None` stands for "undefined".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_transformed: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_rule: Option<StateRule>,
    pub visual: VisualState,
    /// Stage failures that were absorbed into fallbacks.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl EvaluateResult {
    pub fn is_match(&self) -> bool {
        self.matched_rule.is_some()
    }
}

// ── Diagnostics ─────────────────────────────────────────────────────

/// Pipeline stage names, used to attribute absorbed failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Decode,
    Extract,
    Template,
    Transform,
    Match,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Decode => write!(f, "decode"),
            Stage::Extract => write!(f, "extract"),
            Stage::Template => write!(f, "template"),
            Stage::Transform => write!(f, "transform"),
            Stage::Match => write!(f, "match"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub stage: Stage,
    pub message: String,
}
