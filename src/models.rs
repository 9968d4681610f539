//! Model-name resolution between Claude Code identifiers and backend aliases.
//!
//! The table is built once when configuration is loaded and is never mutated
//! afterwards. Lookups of unknown identifiers fall through unchanged.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Claude model ids paired with the local Ollama aliases they run on.
const DEFAULT_MODELS: &[(&str, &str)] = &[
    ("claude-sonnet-4-5-20250514", "claude-sonet-4-5:latest"),
    ("claude-opus-4-5-20251101", "claude-opus-4-5:latest"),
    ("claude-haiku-4-5-20250514", "claude-haiku-4-5:latest"),
    ("claude-sonnet-4-5", "claude-sonet-4-5:latest"),
    ("claude-opus-4-5", "claude-opus-4-5:latest"),
    ("claude-haiku-4-5", "claude-haiku-4-5:latest"),
    ("claude-3-5-sonnet-latest", "claude-sonet-4-5:latest"),
    ("claude-3-5-haiku-latest", "claude-haiku-4-5:latest"),
    ("claude-3-opus-latest", "claude-opus-4-5:latest"),
];

/// Immutable source-model to backend-model lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelMap(HashMap<String, String>);

impl ModelMap {
    /// Resolve a caller-facing model id to the id the backend understands.
    /// Unknown ids are returned as-is.
    #[must_use]
    pub fn resolve<'a>(&'a self, source_model: &'a str) -> &'a str {
        self.0
            .get(source_model)
            .map(String::as_str)
            .unwrap_or(source_model)
    }

    /// Source ids known to the table, sorted for stable listings.
    #[must_use]
    pub fn source_models(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.0.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ModelMap {
    fn default() -> Self {
        Self(
            DEFAULT_MODELS
                .iter()
                .map(|(from, to)| ((*from).to_string(), (*to).to_string()))
                .collect(),
        )
    }
}

impl FromIterator<(String, String)> for ModelMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
