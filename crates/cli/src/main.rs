//! statemap: command line front end for the widget state-mapping engine.
//!
//! - `statemap eval` evaluates payloads from `--payload` or stdin lines
//! - `statemap check` validates a widget configuration

mod cli;
mod commands;

use std::io::{self, BufRead};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use panel_core::Config;

use crate::cli::{CliArgs, Command};

fn main() -> Result<ExitCode> {
    panel_core::load_dotenv();
    let config = Config::from_env();
    let args = CliArgs::parse();

    let filter = match args.log_level.as_deref() {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
    };
    // stdout carries results
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    config.log_summary();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Eval { config: path, payload } => {
            let widget = commands::load_widget(&path)?;
            match payload {
                Some(payload) => {
                    commands::run_eval(&widget, config.sandbox, [Ok(payload)], &mut out)?;
                }
                None => {
                    let stdin = io::stdin();
                    commands::run_eval(&widget, config.sandbox, stdin.lock().lines(), &mut out)?;
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { config: path } => {
            let widget = commands::load_widget(&path)?;
            let valid = commands::run_check(&widget, config.sandbox, &mut out)?;
            Ok(if valid { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}
