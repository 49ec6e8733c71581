//! State-mapping engine for MQTT dashboard widgets.
//!
//! Turns a raw payload into a visual state through a linear, pure pipeline:
//! - JSON decoding and JSONPath extraction
//! - `{{value}}` templating (minijinja)
//! - sandboxed or built-in value transforms
//! - first-match-wins rule matching (literal, numeric, regex)
//! - field-wise merge of the matched rule over the default visual state

pub mod control;
pub mod pipeline;
pub mod schema;
pub mod transform;
pub mod validation;

pub use control::{switch_is_on, switch_publish_value};
pub use panel_core::SandboxLimits;
pub use pipeline::{evaluate, StageError, StateMapper};
pub use schema::*;
pub use validation::{validate_widget, ValidationResult};
