use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Evaluate and check dashboard widget state maps.
///
/// Payloads are treated as raw MQTT payload text; the widget's
/// `parseAsJson` setting decides whether they are decoded.
#[derive(Parser, Debug)]
#[command(name = "statemap", version, about)]
pub struct CliArgs {
    /// Log filter directive (overrides RUST_LOG and PANEL_LOG), e.g. `debug`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate payloads against a widget's state map, one JSON result per line.
    Eval {
        /// Widget configuration file (JSON).
        #[arg(long)]
        config: PathBuf,

        /// Payload to evaluate. Reads one payload per stdin line when omitted.
        #[arg(long)]
        payload: Option<String>,
    },
    /// Validate a widget configuration; exits non-zero on errors.
    Check {
        /// Widget configuration file (JSON).
        #[arg(long)]
        config: PathBuf,
    },
}
