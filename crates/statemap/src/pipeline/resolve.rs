//! Resolver stage: merge the matched rule over the default visual state.

use crate::schema::{StateRule, VisualState};

/// Field-wise merge preferring the rule; no rule means the default verbatim.
pub(crate) fn resolve(matched: Option<&StateRule>, default: &VisualState) -> VisualState {
    let Some(rule) = matched else {
        return default.clone();
    };
    VisualState {
        icon: rule.icon.clone().or_else(|| default.icon.clone()),
        color: rule.color.clone().or_else(|| default.color.clone()),
        label: rule.label.clone().or_else(|| default.label.clone()),
        aria_label: rule.aria_label.clone().or_else(|| default.aria_label.clone()),
        animation: rule.animation.clone().or_else(|| default.animation.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AnimationSpec, AnimationType, MatchSpec};

    fn default_state() -> VisualState {
        VisualState::default()
            .with_icon("bulb_off")
            .with_color("#888")
            .with_label("Unknown")
            .with_animation(AnimationSpec::new(AnimationType::None))
    }

    #[test]
    fn no_match_returns_default_verbatim() {
        assert_eq!(resolve(None, &default_state()), default_state());
    }

    #[test]
    fn rule_fields_override_individually() {
        let rule = StateRule::new(MatchSpec::literal("on"))
            .with_icon("bulb")
            .with_aria_label("Light is on");

        let visual = resolve(Some(&rule), &default_state());
        assert_eq!(visual.icon.as_deref(), Some("bulb"));
        assert_eq!(visual.color.as_deref(), Some("#888"));
        assert_eq!(visual.label.as_deref(), Some("Unknown"));
        assert_eq!(visual.aria_label.as_deref(), Some("Light is on"));
        assert_eq!(visual.animation, Some(AnimationSpec::new(AnimationType::None)));
    }

    #[test]
    fn rule_animation_replaces_default_animation() {
        let spin = AnimationSpec::new(AnimationType::Spin).with_speed(3.0);
        let rule = StateRule::new(MatchSpec::literal("busy")).with_animation(spin.clone());
        assert_eq!(resolve(Some(&rule), &default_state()).animation, Some(spin));
    }

    #[test]
    fn empty_default_leaves_unset_fields_empty() {
        let rule = StateRule::new(MatchSpec::numeric(1.0)).with_label("One");
        let visual = resolve(Some(&rule), &VisualState::default());
        assert_eq!(visual, VisualState::default().with_label("One"));
    }
}
