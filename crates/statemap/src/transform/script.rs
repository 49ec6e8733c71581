//! Sandboxed script transforms on an embedded Rhai engine.
//!
//! A script may define `fn transform(value)`; its return value replaces the
//! pipeline value. Top-level statements run first with `value` in scope.
//! Without a `transform` function the script runs for its side effects in
//! the log (`print`/`debug`) and the value passes through.
//!
//! The engine has no module resolver and no `eval`. Every run is bounded by
//! the [`SandboxLimits`]: operation count, wall-clock deadline, call depth,
//! expression depth and string/array/map sizes.

use std::time::Instant;

use rhai::module_resolvers::DummyModuleResolver;
use rhai::{CallFnOptions, Dynamic, Engine, EvalAltResult, Scope, AST};
use serde_json::Value;

use panel_core::SandboxLimits;

use crate::pipeline::StageError;

use super::ValueTransform;

const TRANSFORM_FN: &str = "transform";
const SCRIPT_LOG_TARGET: &str = "panel_statemap::script";

/// A compiled transform script.
#[derive(Debug, Clone)]
pub struct ScriptTransform {
    ast: AST,
    has_transform_fn: bool,
    limits: SandboxLimits,
}

impl ScriptTransform {
    pub fn compile(source: &str, limits: &SandboxLimits) -> Result<Self, StageError> {
        let engine = build_engine(limits, None);
        let ast = engine
            .compile(source)
            .map_err(|e| StageError::ScriptCompile(e.to_string()))?;
        let has_transform_fn = ast
            .iter_functions()
            .any(|f| f.name == TRANSFORM_FN && f.params.len() == 1);

        Ok(Self {
            ast,
            has_transform_fn,
            limits: *limits,
        })
    }

    /// Whether the script defines a one-argument `transform` function.
    pub fn has_transform_fn(&self) -> bool {
        self.has_transform_fn
    }
}

impl ValueTransform for ScriptTransform {
    fn name(&self) -> &str {
        "script"
    }

    fn apply(&self, value: Option<&Value>) -> Result<Option<Value>, StageError> {
        let input = match value {
            Some(v) => rhai::serde::to_dynamic(v).map_err(runtime_error)?,
            None => Dynamic::UNIT,
        };

        // The deadline is per run, so the engine is too.
        let deadline = Instant::now() + self.limits.timeout();
        let engine = build_engine(&self.limits, Some(deadline));

        let mut scope = Scope::new();
        scope.push_dynamic("value", input.clone());

        if !self.has_transform_fn {
            engine
                .run_ast_with_scope(&mut scope, &self.ast)
                .map_err(runtime_error)?;
            return Ok(value.cloned());
        }

        let output: Dynamic = engine
            .call_fn_with_options(
                CallFnOptions::new().eval_ast(true),
                &mut scope,
                &self.ast,
                TRANSFORM_FN,
                (input,),
            )
            .map_err(runtime_error)?;

        if output.is_unit() {
            return Ok(None);
        }
        rhai::serde::from_dynamic::<Value>(&output)
            .map(Some)
            .map_err(runtime_error)
    }
}

fn build_engine(limits: &SandboxLimits, deadline: Option<Instant>) -> Engine {
    let mut engine = Engine::new();

    engine.set_max_operations(limits.max_operations);
    engine.set_max_call_levels(limits.max_call_levels);
    engine.set_max_expr_depths(limits.max_expr_depth, limits.max_expr_depth);
    engine.set_max_string_size(limits.max_string_size);
    engine.set_max_array_size(limits.max_collection_size);
    engine.set_max_map_size(limits.max_collection_size);

    engine.set_module_resolver(DummyModuleResolver::new());
    engine.disable_symbol("eval");

    engine.on_print(|text| tracing::debug!(target: SCRIPT_LOG_TARGET, "{text}"));
    engine.on_debug(|text, _source, pos| {
        tracing::debug!(target: SCRIPT_LOG_TARGET, position = %pos, "{text}");
    });

    if let Some(deadline) = deadline {
        engine.on_progress(move |_ops| {
            if Instant::now() >= deadline {
                Some(Dynamic::UNIT)
            } else {
                None
            }
        });
    }

    engine
}

fn runtime_error(err: Box<EvalAltResult>) -> StageError {
    StageError::ScriptRuntime(err.to_string())
}
