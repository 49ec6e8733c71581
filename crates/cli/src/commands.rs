//! Subcommand implementations, writing to any `Write` sink.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, info};

use panel_statemap::{validate_widget, SandboxLimits, StateMapper, WidgetConfig};

pub fn load_widget(path: &Path) -> Result<WidgetConfig> {
    panel_core::load_json(path)
        .with_context(|| format!("failed to load widget config {}", path.display()))
}

/// Evaluate each payload and write one compact JSON result per line.
/// Returns the number of payloads evaluated.
pub fn run_eval<I>(
    widget: &WidgetConfig,
    limits: SandboxLimits,
    payloads: I,
    out: &mut impl Write,
) -> Result<usize>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    let mapper = StateMapper::new(widget.rules(), &widget.into(), limits);
    let mut count = 0;

    for payload in payloads {
        let payload = payload.context("failed to read payload")?;
        let result = mapper.evaluate(&Value::String(payload));
        debug!(
            matched = result.is_match(),
            diagnostics = result.diagnostics.len(),
            "payload evaluated"
        );
        serde_json::to_writer(&mut *out, &result).context("failed to write result")?;
        writeln!(out)?;
        count += 1;
    }

    info!(
        widget = widget.name.as_deref().unwrap_or("unnamed"),
        payloads = count,
        "evaluation complete"
    );
    Ok(count)
}

/// Validate the widget and write the result as pretty JSON.
/// Returns whether the configuration is valid.
pub fn run_check(widget: &WidgetConfig, limits: SandboxLimits, out: &mut impl Write) -> Result<bool> {
    let result = validate_widget(widget, &limits);
    info!(
        widget = widget.name.as_deref().unwrap_or("unnamed"),
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "validation complete"
    );
    serde_json::to_writer_pretty(&mut *out, &result).context("failed to write result")?;
    writeln!(out)?;
    Ok(result.valid)
}
