//! The evaluation pipeline: decode → extract → template → transform →
//! match → resolve.
//!
//! Every stage is optional and none of them fails the evaluation. A stage
//! error is logged at `debug`, recorded as a [`Diagnostic`] on the result,
//! and replaced by that stage's fallback value.

pub(crate) mod coerce;
mod decode;
mod error;
mod extract;
mod matcher;
mod resolve;
mod template;

use serde_json::Value;
use tracing::{debug, warn};

use panel_core::SandboxLimits;

use crate::schema::{Diagnostic, EvaluateOptions, EvaluateResult, StateRule, VisualState};
use crate::transform::{select_transform, ValueTransform};

pub use error::StageError;
pub(crate) use extract::PathQuery;
pub(crate) use matcher::Predicate;
pub(crate) use template::ValueTemplate;

use coerce::to_js_string;
use decode::decode;
use resolve::resolve;

/// A rule list and its options compiled once, ready to evaluate many
/// payloads.
///
/// Construction never fails: broken parts of the configuration are logged
/// and then behave as their stage's fallback on every evaluation.
#[derive(Debug)]
pub struct StateMapper {
    rules: Vec<CompiledRule>,
    parse_as_json: bool,
    path: Option<Result<PathQuery, StageError>>,
    template: Option<ValueTemplate>,
    transform: Result<Box<dyn ValueTransform>, StageError>,
    default_state: VisualState,
}

#[derive(Debug)]
struct CompiledRule {
    rule: StateRule,
    predicate: Result<Predicate, StageError>,
}

impl StateMapper {
    pub fn new(rules: &[StateRule], options: &EvaluateOptions, limits: SandboxLimits) -> Self {
        let rules: Vec<CompiledRule> = rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                let predicate = Predicate::compile(rule.matcher());
                if let Err(e) = &predicate {
                    warn!(rule = index, error = %e, "rule will never match");
                }
                CompiledRule {
                    rule: rule.clone(),
                    predicate,
                }
            })
            .collect();

        let path = options
            .json_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(PathQuery::parse);
        if let Some(Err(e)) = &path {
            warn!(error = %e, "JSONPath does not parse; extraction yields undefined");
        }

        let template = options
            .value_template
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(ValueTemplate::new);

        let transform = select_transform(options, &limits);
        match &transform {
            Ok(t) => debug!(transform = t.name(), rules = rules.len(), "state mapper ready"),
            Err(e) => warn!(error = %e, "transform unavailable; values pass through"),
        }

        Self {
            rules,
            parse_as_json: options.parse_as_json,
            path,
            template,
            transform,
            default_state: options.default_visual(),
        }
    }

    /// Number of rules, including ones whose match never compiles.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Run one payload through the pipeline.
    pub fn evaluate(&self, incoming: &Value) -> EvaluateResult {
        let mut diagnostics = Vec::new();

        // ── Decode ──
        let value_raw = if self.parse_as_json {
            decode(incoming).unwrap_or_else(|e| absorb(&mut diagnostics, e, incoming.clone()))
        } else {
            incoming.clone()
        };

        // ── Extract ──
        let extracted: Option<Value> = match (&self.path, self.parse_as_json) {
            (Some(query), true) => match query {
                Ok(query) => query
                    .first(&value_raw)
                    .map(Some)
                    .unwrap_or_else(|e| absorb(&mut diagnostics, e, None)),
                Err(e) => absorb(&mut diagnostics, e.clone(), None),
            },
            (None, true) => Some(value_raw.clone()),
            (_, false) => Some(incoming.clone()),
        };

        // ── Template ──
        let templated = match &self.template {
            Some(template) => match template.render(extracted.as_ref()) {
                Ok(text) => Some(Value::String(text)),
                Err(e) => absorb(&mut diagnostics, e, extracted),
            },
            None => extracted,
        };

        // ── Transform ──
        let value_transformed = match &self.transform {
            Ok(transform) => transform
                .apply(templated.as_ref())
                .unwrap_or_else(|e| absorb(&mut diagnostics, e, templated.clone())),
            Err(e) => absorb(&mut diagnostics, e.clone(), templated),
        };

        // ── Match ──
        let text = to_js_string(value_transformed.as_ref());
        let mut matched_rule = None;
        for compiled in &self.rules {
            match &compiled.predicate {
                Ok(predicate) if predicate.matches(&text) => {
                    matched_rule = Some(compiled.rule.clone());
                    break;
                }
                Ok(_) => {}
                Err(e) => absorb(&mut diagnostics, e.clone(), ()),
            }
        }

        // ── Resolve ──
        let visual = resolve(matched_rule.as_ref(), &self.default_state);

        EvaluateResult {
            value_raw,
            value_transformed,
            matched_rule,
            visual,
            diagnostics,
        }
    }
}

/// Record a stage failure and hand back the stage's fallback.
fn absorb<T>(diagnostics: &mut Vec<Diagnostic>, error: StageError, fallback: T) -> T {
    debug!(stage = %error.stage(), error = %error, "stage failed; using fallback");
    diagnostics.push(error.to_diagnostic());
    fallback
}

/// Evaluate one payload against a rule list.
///
/// Compiles everything on each call with the default sandbox limits; use a
/// [`StateMapper`] to evaluate a stream of payloads for the same widget.
pub fn evaluate(incoming: &Value, rules: &[StateRule], options: &EvaluateOptions) -> EvaluateResult {
    StateMapper::new(rules, options, SandboxLimits::default()).evaluate(incoming)
}
