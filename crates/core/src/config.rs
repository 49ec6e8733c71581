use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{PanelError, Result};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

/// Parse a profiled env var, keeping the default when the value is malformed.
fn profiled_env_parse<T>(profile: &str, key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match profiled_env_opt(profile, key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key = %key, value = %raw, "Unparseable config value, using default");
            default
        }),
        None => default,
    }
}

/// Read a JSON document (widget config, rule list, fixture) from disk.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|source| PanelError::Json {
        path: path.to_path_buf(),
        source,
    })
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub sandbox: SandboxLimits,
    pub logging: LoggingConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `PANEL_PROFILE`. When set (e.g. `KIOSK`), every key
    /// is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("PANEL_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            sandbox: SandboxLimits::from_env_profiled(p),
            logging: LoggingConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  sandbox:     max_operations={}, timeout_ms={}, max_call_levels={}",
            self.sandbox.max_operations,
            self.sandbox.timeout_ms,
            self.sandbox.max_call_levels
        );
        tracing::info!(
            "               max_expr_depth={}, max_string_size={}, max_collection_size={}",
            self.sandbox.max_expr_depth,
            self.sandbox.max_string_size,
            self.sandbox.max_collection_size
        );
        tracing::info!("  logging:     filter={}", self.logging.filter);
    }
}

// ── Sandbox ───────────────────────────────────────────────────

/// Resource ceilings for user-supplied value transform scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SandboxLimits {
    /// Script operation budget per call.
    pub max_operations: u64,
    /// Wall-clock ceiling per call, in milliseconds.
    pub timeout_ms: u64,
    pub max_call_levels: usize,
    pub max_expr_depth: usize,
    pub max_string_size: usize,
    /// Applies to both arrays and object maps.
    pub max_collection_size: usize,
}

impl SandboxLimits {
    pub const DEFAULT_MAX_OPERATIONS: u64 = 100_000;
    pub const DEFAULT_TIMEOUT_MS: u64 = 50;
    pub const DEFAULT_MAX_CALL_LEVELS: usize = 32;
    pub const DEFAULT_MAX_EXPR_DEPTH: usize = 64;
    pub const DEFAULT_MAX_STRING_SIZE: usize = 64 * 1024;
    pub const DEFAULT_MAX_COLLECTION_SIZE: usize = 4096;

    pub fn from_env() -> Self {
        Self::from_env_profiled("")
    }

    fn from_env_profiled(p: &str) -> Self {
        Self {
            max_operations: profiled_env_parse(
                p,
                "PANEL_SANDBOX_MAX_OPERATIONS",
                Self::DEFAULT_MAX_OPERATIONS,
            ),
            timeout_ms: profiled_env_parse(p, "PANEL_SANDBOX_TIMEOUT_MS", Self::DEFAULT_TIMEOUT_MS),
            max_call_levels: profiled_env_parse(
                p,
                "PANEL_SANDBOX_MAX_CALL_LEVELS",
                Self::DEFAULT_MAX_CALL_LEVELS,
            ),
            max_expr_depth: profiled_env_parse(
                p,
                "PANEL_SANDBOX_MAX_EXPR_DEPTH",
                Self::DEFAULT_MAX_EXPR_DEPTH,
            ),
            max_string_size: profiled_env_parse(
                p,
                "PANEL_SANDBOX_MAX_STRING_SIZE",
                Self::DEFAULT_MAX_STRING_SIZE,
            ),
            max_collection_size: profiled_env_parse(
                p,
                "PANEL_SANDBOX_MAX_COLLECTION_SIZE",
                Self::DEFAULT_MAX_COLLECTION_SIZE,
            ),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for SandboxLimits {
    fn default() -> Self {
        Self {
            max_operations: Self::DEFAULT_MAX_OPERATIONS,
            timeout_ms: Self::DEFAULT_TIMEOUT_MS,
            max_call_levels: Self::DEFAULT_MAX_CALL_LEVELS,
            max_expr_depth: Self::DEFAULT_MAX_EXPR_DEPTH,
            max_string_size: Self::DEFAULT_MAX_STRING_SIZE,
            max_collection_size: Self::DEFAULT_MAX_COLLECTION_SIZE,
        }
    }
}

// ── Logging ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` still takes precedence.
    pub filter: String,
}

impl LoggingConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            filter: profiled_env_or(p, "PANEL_LOG", "info"),
        }
    }
}
