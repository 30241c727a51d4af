//! Completion results

use chrono::{DateTime, Utc};
use serde::Serialize;

/// The answer extracted from a completion, trimmed and otherwise verbatim
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AdvisoryResult {
    pub text: String,
    pub model: String,
    pub extracted_at: DateTime<Utc>,
}

impl AdvisoryResult {
    pub fn from_completion(raw: &str, model: impl Into<String>) -> Self {
        Self {
            text: raw.trim().to_string(),
            model: model.into(),
            extracted_at: Utc::now(),
        }
    }
}
