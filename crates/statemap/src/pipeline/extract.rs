//! Extractor stage: JSONPath queries over the decoded value.

use serde_json::Value;
use serde_json_path::JsonPath;

use super::StageError;

/// A parsed JSONPath query together with the text it came from.
#[derive(Debug, Clone)]
pub(crate) struct PathQuery {
    source: String,
    path: JsonPath,
}

impl PathQuery {
    /// Parse a query. A missing `$` root is implied, so `state` and
    /// `.state` both mean `$.state`.
    pub(crate) fn parse(source: &str) -> Result<Self, StageError> {
        let normalized = normalize(source);
        let path = JsonPath::parse(&normalized).map_err(|e| StageError::PathSyntax {
            path: source.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            source: source.to_string(),
            path,
        })
    }

    /// First node the query selects.
    pub(crate) fn first(&self, value: &Value) -> Result<Value, StageError> {
        self.path
            .query(value)
            .first()
            .cloned()
            .ok_or_else(|| StageError::PathNoMatch(self.source.clone()))
    }
}

fn normalize(source: &str) -> String {
    let trimmed = source.trim();
    if trimmed.starts_with('$') {
        trimmed.to_string()
    } else if trimmed.starts_with('.') || trimmed.starts_with('[') {
        format!("${trimmed}")
    } else {
        format!("$.{trimmed}")
    }
}
