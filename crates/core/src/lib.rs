pub mod config;
pub mod error;

pub use config::{load_dotenv, load_json, Config, LoggingConfig, SandboxLimits};
pub use error::*;
