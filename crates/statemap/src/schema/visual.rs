//! Resolved presentation: icon, color, label and animation.

use serde::{Deserialize, Serialize};

/// Icon animation styles understood by the widgets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationType {
    #[default]
    None,
    Pulse,
    Blink,
    Spin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationSpec {
    #[serde(rename = "type")]
    pub kind: AnimationType,
    /// Cycle duration multiplier; must be positive when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

impl AnimationSpec {
    pub fn new(kind: AnimationType) -> Self {
        Self { kind, speed: None }
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn is_active(&self) -> bool {
        self.kind != AnimationType::None
    }

    /// Speed to animate at: the configured value when positive, otherwise 1.
    pub fn effective_speed(&self) -> f64 {
        match self.speed {
            Some(s) if s.is_finite() && s > 0.0 => s,
            _ => 1.0,
        }
    }
}

/// The presentation a widget renders for the current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualState {
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
}

impl VisualState {
    /// Fallback used when a widget has no configured default state.
    pub fn unknown() -> Self {
        Self {
            label: Some("Unknown".to_string()),
            ..Self::default()
        }
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
