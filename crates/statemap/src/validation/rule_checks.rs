//! Checks for the rule list and the default visual state.

use std::collections::HashMap;

use crate::pipeline::coerce::format_js_number;
use crate::pipeline::Predicate;
use crate::schema::{AnimationSpec, MatchSpec, WidgetConfig};

use super::ValidationResult;

pub(crate) fn validate_rules(config: &WidgetConfig, result: &mut ValidationResult) {
    let rules = config.rules();
    if rules.is_empty() {
        result.warn("stateMap", "no rules; every payload resolves to the default state");
        return;
    }

    // first index seen per match key
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (i, rule) in rules.iter().enumerate() {
        let path = format!("stateMap[{i}]");

        if let MatchSpec::Numeric(n) = rule.matcher() {
            if !n.is_finite() {
                result.error(format!("{path}.match"), format!("numeric match {n} is not finite"));
            }
        } else if let Err(e) = Predicate::compile(rule.matcher()) {
            result.error(format!("{path}.match"), e.to_string());
        }

        if let Some(animation) = &rule.animation {
            check_animation(animation, &format!("{path}.animation"), result);
        }

        let key = match_key(rule.matcher());
        match seen.get(&key) {
            Some(first) => result.warn(
                format!("{path}.match"),
                format!("unreachable: stateMap[{first}] has the same match"),
            ),
            None => {
                seen.insert(key, i);
            }
        }
    }
}

pub(crate) fn validate_default_state(config: &WidgetConfig, result: &mut ValidationResult) {
    if let Some(animation) = config.default_state.as_ref().and_then(|s| s.animation.as_ref()) {
        check_animation(animation, "defaultState.animation", result);
    }
}

fn check_animation(animation: &AnimationSpec, path: &str, result: &mut ValidationResult) {
    if let Some(speed) = animation.speed {
        if !(speed.is_finite() && speed > 0.0) {
            result.error(
                format!("{path}.speed"),
                format!("animation speed must be a positive number, got {speed}"),
            );
        }
    }
}

/// Rules with equal keys accept exactly the same values.
fn match_key(spec: &MatchSpec) -> String {
    match spec {
        MatchSpec::Literal(text) => format!("literal:{}", text.to_lowercase()),
        MatchSpec::Numeric(n) => format!("numeric:{}", format_js_number(*n)),
        MatchSpec::Pattern { regex, flags } => {
            let mut flags: Vec<char> = flags.chars().collect();
            flags.sort_unstable();
            format!("pattern:{regex}/{}", flags.into_iter().collect::<String>())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AnimationType, StateRule, VisualState};

    fn check(rules: Vec<StateRule>) -> ValidationResult {
        let config = WidgetConfig {
            state_map: Some(rules),
            ..Default::default()
        };
        let mut result = ValidationResult::new();
        validate_rules(&config, &mut result);
        validate_default_state(&config, &mut result);
        result
    }

    #[test]
    fn empty_rule_list_is_a_warning() {
        let result = check(vec![]);
        assert!(result.valid);
        assert_eq!(result.warnings[0].path, "stateMap");
    }

    #[test]
    fn bad_patterns_and_flags() {
        let result = check(vec![
            StateRule::new(MatchSpec::pattern("(", "")),
            StateRule::new(MatchSpec::pattern("on", "q")),
            StateRule::new(MatchSpec::pattern("on", "i")),
        ]);
        assert!(!result.valid);
        let paths: Vec<&str> = result.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["stateMap[0].match", "stateMap[1].match"]);
    }

    #[test]
    fn non_finite_numeric_match() {
        let result = check(vec![StateRule::new(MatchSpec::numeric(f64::NAN))]);
        assert!(!result.valid);
    }

    #[test]
    fn shadowed_rules_are_warnings() {
        let result = check(vec![
            StateRule::new(MatchSpec::literal("on")),
            StateRule::new(MatchSpec::literal("ON")),
            StateRule::new(MatchSpec::numeric(1.0)),
            StateRule::new(MatchSpec::numeric(1.0)),
            StateRule::new(MatchSpec::pattern("x", "im")),
            StateRule::new(MatchSpec::pattern("x", "mi")),
            StateRule::new(MatchSpec::pattern("x", "")),
        ]);
        assert!(result.valid);
        let paths: Vec<&str> = result.warnings.iter().map(|w| w.path.as_str()).collect();
        assert_eq!(paths, ["stateMap[1].match", "stateMap[3].match", "stateMap[5].match"]);
    }

    #[test]
    fn animation_speed_must_be_positive() {
        let rule = StateRule::new(MatchSpec::literal("on"))
            .with_animation(AnimationSpec::new(AnimationType::Pulse).with_speed(0.0));
        let result = check(vec![rule]);
        assert_eq!(result.errors[0].path, "stateMap[0].animation.speed");

        let config = WidgetConfig {
            state_map: Some(vec![StateRule::new(MatchSpec::literal("on"))]),
            default_state: Some(
                VisualState::default()
                    .with_animation(AnimationSpec::new(AnimationType::Spin).with_speed(-1.0)),
            ),
            ..Default::default()
        };
        let mut result = ValidationResult::new();
        validate_default_state(&config, &mut result);
        assert_eq!(result.errors[0].path, "defaultState.animation.speed");
    }
}
