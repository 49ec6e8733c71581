//! Widget configuration validation with structured errors and suggestions.
//!
//! Evaluation itself never fails, so a broken rule or script silently falls
//! back at runtime. These checks surface the same problems ahead of time.
//! Returns a [`ValidationResult`] with errors (configuration is broken) and
//! warnings (configuration has no effect as written).

mod fuzzy;
mod rule_checks;
mod stage_checks;

use serde::{Deserialize, Serialize};

use panel_core::SandboxLimits;

use crate::schema::WidgetConfig;

// ── Result types ────────────────────────────────────────────────────

/// Overall validation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// A blocking validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// JSON-path-like location, e.g. `"stateMap[2].match"`.
    pub path: String,
    pub message: String,
    /// Optional "Did you mean …?" suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// A non-blocking advisory warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationResult {
    pub(crate) fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        });
    }

    pub(crate) fn error_with_suggestion(
        &mut self,
        path: impl Into<String>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: Some(suggestion.into()),
        });
    }

    pub(crate) fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            path: path.into(),
            message: message.into(),
        });
    }
}

// ── Public API ──────────────────────────────────────────────────────

/// Validate a widget configuration. `limits` are the sandbox limits the
/// script will run under; they also bound script compilation.
pub fn validate_widget(config: &WidgetConfig, limits: &SandboxLimits) -> ValidationResult {
    let mut result = ValidationResult::new();
    stage_checks::validate_connection(config, &mut result);
    stage_checks::validate_extraction(config, &mut result);
    stage_checks::validate_template(config, &mut result);
    stage_checks::validate_transform(config, limits, &mut result);
    rule_checks::validate_rules(config, &mut result);
    rule_checks::validate_default_state(config, &mut result);
    result
}
