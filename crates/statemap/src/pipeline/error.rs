//! Stage failures. Every variant is absorbed by the pipeline into a
//! fallback value; none reaches the caller as an error.

use crate::schema::{Diagnostic, Stage};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StageError {
    #[error("payload is not valid JSON: {0}")]
    Json(String),

    #[error("invalid JSONPath '{path}': {message}")]
    PathSyntax { path: String, message: String },

    #[error("JSONPath '{0}' matched nothing")]
    PathNoMatch(String),

    #[error("template error: {0}")]
    Template(String),

    #[error("transform script does not compile: {0}")]
    ScriptCompile(String),

    #[error("transform script failed: {0}")]
    ScriptRuntime(String),

    #[error("unknown builtin transform '{0}'")]
    UnknownBuiltin(String),

    #[error("builtin transform '{name}' rejected value: {message}")]
    Builtin { name: String, message: String },

    #[error("invalid pattern /{pattern}/{flags}: {message}")]
    Pattern {
        pattern: String,
        flags: String,
        message: String,
    },
}

impl StageError {
    pub fn stage(&self) -> Stage {
        match self {
            StageError::Json(_) => Stage::Decode,
            StageError::PathSyntax { .. } | StageError::PathNoMatch(_) => Stage::Extract,
            StageError::Template(_) => Stage::Template,
            StageError::ScriptCompile(_)
            | StageError::ScriptRuntime(_)
            | StageError::UnknownBuiltin(_)
            | StageError::Builtin { .. } => Stage::Transform,
            StageError::Pattern { .. } => Stage::Match,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic {
            stage: self.stage(),
            message: self.to_string(),
        }
    }
}
