//! Data model for state mapping, serialized in the dashboard's camelCase JSON shape.
//!
//! - `StateRule` / `MatchSpec`: ordered pattern → presentation rules
//! - `VisualState` / `AnimationSpec`: the resolved presentation
//! - `EvaluateOptions` / `EvaluateResult`: per-evaluation input and output
//! - `WidgetConfig`: the persisted widget configuration options are projected from

mod options;
mod rule;
mod visual;
mod widget;

pub use options::*;
pub use rule::*;
pub use visual::*;
pub use widget::*;

#[cfg(test)]
mod tests;
