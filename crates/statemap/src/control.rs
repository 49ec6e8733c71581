//! On/off semantics for switch widgets.
//!
//! A switch both displays state (the incoming payload) and publishes
//! commands (the configured on/off values).

use serde_json::Value;

use crate::pipeline::coerce::to_js_string;
use crate::pipeline::evaluate;
use crate::schema::{options_from_config, WidgetConfig};

const DEFAULT_ON_VALUE: &str = "ON";
const DEFAULT_OFF_VALUE: &str = "OFF";

/// Whether a payload means "on" for this switch.
///
/// With a `stateMap` configured, even an empty one, the payload is evaluated
/// and the switch is on when the resolved label contains `on`
/// (case-insensitive). Without one, the payload text is compared against
/// `onValue`, `1` and `true`.
pub fn switch_is_on(payload: &Value, config: &WidgetConfig) -> bool {
    if let Some(rules) = config.state_map.as_deref() {
        let result = evaluate(payload, rules, &options_from_config(config));
        return result
            .visual
            .label
            .is_some_and(|label| label.to_lowercase().contains("on"));
    }

    let text = to_js_string(Some(payload));
    text == on_value(config) || text == "1" || text == "true"
}

/// The payload to publish when the switch is toggled to `on`.
///
/// The first `{{value}}` in `valueTemplate`, if any, is replaced by the
/// on/off value.
pub fn switch_publish_value(on: bool, config: &WidgetConfig) -> String {
    let value = if on {
        on_value(config)
    } else {
        non_empty(config.off_value.as_deref()).unwrap_or(DEFAULT_OFF_VALUE)
    };

    match config.value_template.as_deref().filter(|t| !t.is_empty()) {
        Some(template) => template.replacen("{{value}}", value, 1),
        None => value.to_string(),
    }
}

fn on_value(config: &WidgetConfig) -> &str {
    non_empty(config.on_value.as_deref()).unwrap_or(DEFAULT_ON_VALUE)
}

/// An empty on/off value counts as unset.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
