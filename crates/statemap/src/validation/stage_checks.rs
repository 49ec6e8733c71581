//! Checks for the connection settings and the optional pipeline stages.

use panel_core::SandboxLimits;

use crate::pipeline::{PathQuery, ValueTemplate};
use crate::schema::WidgetConfig;
use crate::transform::{BuiltinTransform, ScriptTransform, BUILTIN_NAMES};

use super::fuzzy::fuzzy_match;
use super::ValidationResult;

pub(crate) fn validate_connection(config: &WidgetConfig, result: &mut ValidationResult) {
    if let Some(qos) = config.qos {
        if qos > 2 {
            result.error("qos", format!("qos must be 0, 1 or 2, got {qos}"));
        }
    }
}

pub(crate) fn validate_extraction(config: &WidgetConfig, result: &mut ValidationResult) {
    let Some(path) = config.json_path.as_deref().filter(|p| !p.trim().is_empty()) else {
        return;
    };

    if !config.parse_as_json.unwrap_or(false) {
        result.warn("jsonPath", "jsonPath is ignored unless parseAsJson is enabled");
    }
    if let Err(e) = PathQuery::parse(path) {
        result.error("jsonPath", e.to_string());
    }
}

pub(crate) fn validate_template(config: &WidgetConfig, result: &mut ValidationResult) {
    let Some(template) = config.value_template.as_deref().filter(|t| !t.is_empty()) else {
        return;
    };
    if let Err(e) = ValueTemplate::new(template).validate() {
        result.error("valueTemplate", e.to_string());
    }
}

pub(crate) fn validate_transform(
    config: &WidgetConfig,
    limits: &SandboxLimits,
    result: &mut ValidationResult,
) {
    if let Some(code) = config
        .value_transform_js
        .as_deref()
        .filter(|c| !c.trim().is_empty())
    {
        if !config.sandbox_enabled.unwrap_or(false) {
            result.warn(
                "valueTransformJs",
                "script is ignored while sandboxEnabled is false",
            );
        }
        match ScriptTransform::compile(code, limits) {
            Ok(script) if !script.has_transform_fn() => result.warn(
                "valueTransformJs",
                "script defines no one-argument `transform` function; values pass through",
            ),
            Ok(_) => {}
            Err(e) => result.error("valueTransformJs", e.to_string()),
        }
    }

    if let Some(name) = config.value_transform_builtin.as_deref() {
        if BuiltinTransform::from_name(name).is_err() {
            let message = format!("unknown builtin transform '{name}'");
            match fuzzy_match(name, BUILTIN_NAMES) {
                Some(close) => result.error_with_suggestion(
                    "valueTransformBuiltin",
                    message,
                    format!("Did you mean '{close}'?"),
                ),
                None => result.error("valueTransformBuiltin", message),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(config: &WidgetConfig) -> ValidationResult {
        let mut result = ValidationResult::new();
        validate_connection(config, &mut result);
        validate_extraction(config, &mut result);
        validate_template(config, &mut result);
        validate_transform(config, &SandboxLimits::default(), &mut result);
        result
    }

    #[test]
    fn qos_range() {
        let mut config = WidgetConfig::default();
        config.qos = Some(2);
        assert!(check(&config).valid);
        config.qos = Some(3);
        assert_eq!(check(&config).errors[0].path, "qos");
    }

    #[test]
    fn json_path_without_parse_is_a_warning() {
        let config = WidgetConfig {
            json_path: Some("$.state".to_string()),
            ..Default::default()
        };
        let result = check(&config);
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].path, "jsonPath");
    }

    #[test]
    fn broken_template_is_an_error() {
        let config = WidgetConfig {
            value_template: Some("{% if value %}on".to_string()),
            ..Default::default()
        };
        let result = check(&config);
        assert!(!result.valid);
        assert_eq!(result.errors[0].path, "valueTemplate");
    }

    #[test]
    fn script_checks() {
        let mut config = WidgetConfig {
            value_transform_js: Some("fn transform(v) { v }".to_string()),
            ..Default::default()
        };
        let result = check(&config);
        assert!(result.valid);
        assert!(result.warnings[0].message.contains("sandboxEnabled"));

        config.sandbox_enabled = Some(true);
        let result = check(&config);
        assert!(result.valid);
        assert!(result.warnings.is_empty());

        config.value_transform_js = Some("let x = value;".to_string());
        let result = check(&config);
        assert!(result.valid);
        assert!(result.warnings[0].message.contains("transform"));

        config.value_transform_js = Some("fn transform(v) {".to_string());
        let result = check(&config);
        assert!(!result.valid);
        assert_eq!(result.errors[0].path, "valueTransformJs");
    }

    #[test]
    fn unknown_builtin_gets_suggestion() {
        let config = WidgetConfig {
            value_transform_builtin: Some("uper".to_string()),
            ..Default::default()
        };
        let result = check(&config);
        assert!(!result.valid);
        assert_eq!(result.errors[0].suggestion.as_deref(), Some("Did you mean 'upper'?"));

        let config = WidgetConfig {
            value_transform_builtin: Some("round".to_string()),
            ..Default::default()
        };
        assert!(check(&config).valid);
    }
}
