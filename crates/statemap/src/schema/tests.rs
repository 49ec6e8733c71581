//! Tests for schema types.

use serde_json::json;

use super::*;

const LED_WIDGET_JSON: &str = r##"
{
  "name": "Porch light",
  "topicSubscribe": "home/porch/light/state",
  "topicPublish": "home/porch/light/set",
  "qos": 1,
  "parseAsJson": true,
  "jsonPath": "$.state",
  "minRateMs": 250,
  "stateMap": [
    { "match": "on", "icon": "bulb", "color": "#ffd000", "label": "On",
      "animation": { "type": "pulse", "speed": 2 } },
    { "match": "/^off|standby$/i", "icon": "bulb_off", "label": "Off" },
    { "match": 1, "label": "One" },
    { "match": { "regex": "^err", "flags": "i" }, "color": "#f00", "tooltip": "Device fault" }
  ],
  "defaultState": { "icon": "help", "label": "Unknown" },
  "layout": "horizontal",
  "showLabels": false
}
"##;

#[test]
fn parse_led_widget_config() {
    let cfg: WidgetConfig = serde_json::from_str(LED_WIDGET_JSON).unwrap();

    assert_eq!(cfg.name.as_deref(), Some("Porch light"));
    assert_eq!(cfg.qos, Some(1));
    assert_eq!(cfg.parse_as_json, Some(true));
    assert_eq!(cfg.min_rate_ms, Some(250));

    let rules = cfg.rules();
    assert_eq!(rules.len(), 4);
    assert_eq!(rules[0].matcher(), &MatchSpec::literal("on"));
    assert_eq!(rules[1].matcher(), &MatchSpec::pattern("^off|standby$", "i"));
    assert_eq!(rules[2].matcher(), &MatchSpec::numeric(1.0));
    assert_eq!(rules[3].matcher(), &MatchSpec::pattern("^err", "i"));
    assert_eq!(rules[3].tooltip.as_deref(), Some("Device fault"));

    let anim = rules[0].animation.as_ref().unwrap();
    assert_eq!(anim.kind, AnimationType::Pulse);
    assert_eq!(anim.effective_speed(), 2.0);

    // Widget-specific settings are retained
    assert_eq!(cfg.extra.get("layout"), Some(&json!("horizontal")));
    assert_eq!(cfg.extra.get("showLabels"), Some(&json!(false)));
}

#[test]
fn options_projection_copies_evaluation_fields() {
    let cfg: WidgetConfig = serde_json::from_str(LED_WIDGET_JSON).unwrap();
    let opts = options_from_config(&cfg);

    assert!(opts.parse_as_json);
    assert_eq!(opts.json_path.as_deref(), Some("$.state"));
    assert!(opts.value_template.is_none());
    assert!(!opts.sandbox_enabled);
    assert_eq!(
        opts.default_state,
        Some(VisualState::default().with_icon("help").with_label("Unknown"))
    );
    assert_eq!(EvaluateOptions::from(&cfg), opts);
}

#[test]
fn empty_config_projects_to_defaults() {
    let cfg: WidgetConfig = serde_json::from_str("{}").unwrap();
    assert!(cfg.rules().is_empty());
    assert_eq!(options_from_config(&cfg), EvaluateOptions::default());
    assert_eq!(
        EvaluateOptions::default().default_visual(),
        VisualState::unknown()
    );
}

#[test]
fn widget_config_round_trips() {
    let cfg: WidgetConfig = serde_json::from_str(LED_WIDGET_JSON).unwrap();
    let text = serde_json::to_string(&cfg).unwrap();
    let back: WidgetConfig = serde_json::from_str(&text).unwrap();
    assert_eq!(cfg, back);
}

// ── MatchSpec loading ───────────────────────────────────────────────

#[test]
fn slash_text_is_a_pattern_only_with_closing_slash() {
    assert_eq!(MatchSpec::from_text("/^a.*/"), MatchSpec::pattern("^a.*", ""));
    assert_eq!(MatchSpec::from_text("/a/b/gi"), MatchSpec::pattern("a/b", "gi"));
    assert_eq!(MatchSpec::from_text("//"), MatchSpec::pattern("", ""));
    assert_eq!(MatchSpec::from_text("/"), MatchSpec::literal("/"));
    assert_eq!(MatchSpec::from_text("a/b/"), MatchSpec::literal("a/b/"));
}

#[test]
fn pattern_object_without_flags() {
    let spec: MatchSpec = serde_json::from_value(json!({ "regex": "^x$" })).unwrap();
    assert_eq!(spec, MatchSpec::pattern("^x$", ""));
}

#[test]
fn literal_object_keeps_slashes() {
    let spec: MatchSpec = serde_json::from_value(json!({ "literal": "/dev/null" })).unwrap();
    assert_eq!(spec, MatchSpec::literal("/dev/null"));
}

#[test]
fn slash_literal_serializes_as_literal_object() {
    let rule = StateRule::new(MatchSpec::literal("/dev/null"));
    let value = serde_json::to_value(&rule).unwrap();
    assert_eq!(value, json!({ "match": { "literal": "/dev/null" } }));

    let back: StateRule = serde_json::from_value(value).unwrap();
    assert_eq!(back.matcher(), &MatchSpec::literal("/dev/null"));
}

#[test]
fn rule_serializes_camel_case_and_skips_empty_fields() {
    let rule = StateRule::new(MatchSpec::numeric(42.0))
        .with_label("ok")
        .with_aria_label("Answer reached");
    let value = serde_json::to_value(&rule).unwrap();
    assert_eq!(
        value,
        json!({ "match": 42.0, "label": "ok", "ariaLabel": "Answer reached" })
    );
}

#[test]
fn unsupported_match_shape_is_rejected() {
    let result: Result<StateRule, _> = serde_json::from_value(json!({ "match": [1, 2] }));
    assert!(result.is_err());
}

// ── Visual state ────────────────────────────────────────────────────

#[test]
fn animation_speed_falls_back_to_one() {
    assert_eq!(AnimationSpec::new(AnimationType::Spin).effective_speed(), 1.0);
    assert_eq!(
        AnimationSpec::new(AnimationType::Spin).with_speed(0.0).effective_speed(),
        1.0
    );
    assert_eq!(
        AnimationSpec::new(AnimationType::Blink).with_speed(0.5).effective_speed(),
        0.5
    );
    assert!(!AnimationSpec::new(AnimationType::None).is_active());
    assert!(AnimationSpec::new(AnimationType::Blink).is_active());
}

#[test]
fn unknown_animation_type_is_rejected() {
    let result: Result<AnimationSpec, _> = serde_json::from_value(json!({ "type": "wobble" }));
    assert!(result.is_err());
}
