//! Value transforms: the pluggable strategy behind the transformer stage.
//!
//! Three strategies, selected from [`EvaluateOptions`]:
//! - **script**: a sandboxed Rhai script defining `fn transform(value)`
//! - **builtin**: a named transform from a fixed registry
//! - **identity**: pass-through when neither is configured

mod builtin;
mod script;

use std::fmt;

use serde_json::Value;

use panel_core::SandboxLimits;

use crate::pipeline::StageError;
use crate::schema::EvaluateOptions;

pub use builtin::{BuiltinTransform, BUILTIN_NAMES};
pub use script::ScriptTransform;

/// A value transform. Implementations must be side-effect free.
///
/// `None` stands for an undefined value on both sides.
pub trait ValueTransform: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn apply(&self, value: Option<&Value>) -> Result<Option<Value>, StageError>;
}

/// Passes every value through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl ValueTransform for Identity {
    fn name(&self) -> &str {
        "identity"
    }

    fn apply(&self, value: Option<&Value>) -> Result<Option<Value>, StageError> {
        Ok(value.cloned())
    }
}

/// Pick the transform the options ask for.
///
/// A script wins when the sandbox is enabled and the source is non-empty;
/// otherwise a named builtin; otherwise identity. Errors mean the configured
/// transform cannot be built; callers treat that as a failing transform.
pub fn select_transform(
    options: &EvaluateOptions,
    limits: &SandboxLimits,
) -> Result<Box<dyn ValueTransform>, StageError> {
    let script = options
        .value_transform_js
        .as_deref()
        .filter(|code| !code.trim().is_empty());

    if let (true, Some(code)) = (options.sandbox_enabled, script) {
        let transform = ScriptTransform::compile(code, limits)?;
        return Ok(Box::new(transform));
    }

    if let Some(name) = options.value_transform_builtin.as_deref() {
        let transform = BuiltinTransform::from_name(name)?;
        return Ok(Box::new(transform));
    }

    Ok(Box::new(Identity))
}
