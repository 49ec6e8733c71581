//! Widget configuration as persisted by the dashboard, and its projection
//! onto [`EvaluateOptions`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{EvaluateOptions, StateRule, VisualState};

/// Common configuration shared by every widget kind.
///
/// Widget-specific settings (gauge ranges, layout flags, ...) are kept in
/// `extra` so a config survives a load/save round trip untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_subscribe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_publish: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qos: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retain: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_as_json: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_path: Option<String>,
    /// Minimum delay between evaluations; enforced by the message consumer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rate_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_transform_js: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_transform_builtin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sandbox_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_map: Option<Vec<StateRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_state: Option<VisualState>,
    /// Payload published when a switch turns on (default `ON`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_value: Option<String>,
    /// Payload published when a switch turns off (default `OFF`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub off_value: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WidgetConfig {
    /// The configured rule list, empty when none is set.
    pub fn rules(&self) -> &[StateRule] {
        self.state_map.as_deref().unwrap_or(&[])
    }
}

/// Project the evaluation-relevant fields out of a widget config.
pub fn options_from_config(cfg: &WidgetConfig) -> EvaluateOptions {
    EvaluateOptions {
        parse_as_json: cfg.parse_as_json.unwrap_or(false),
        json_path: cfg.json_path.clone(),
        value_template: cfg.value_template.clone(),
        value_transform_js: cfg.value_transform_js.clone(),
        value_transform_builtin: cfg.value_transform_builtin.clone(),
        sandbox_enabled: cfg.sandbox_enabled.unwrap_or(false),
        default_state: cfg.default_state.clone(),
    }
}

impl From<&WidgetConfig> for EvaluateOptions {
    fn from(cfg: &WidgetConfig) -> Self {
        options_from_config(cfg)
    }
}
