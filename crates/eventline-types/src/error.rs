//! Structured failure payload carried by `_FAILURE` responses.

use serde::{Deserialize, Serialize};

/// Wire-level error body for failure responses.
///
/// Both fields are optional on the wire; `error` is the field assertion
/// helpers compare against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventError {
    /// Primary error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Human-oriented message, typically the root cause.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localized_message: Option<String>,
}

impl EventError {
    /// Build an error payload with the same text in both fields.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            localized_message: Some(message.clone()),
            error: Some(message),
        }
    }
}

impl From<&anyhow::Error> for EventError {
    fn from(err: &anyhow::Error) -> Self {
        Self {
            error: Some(err.to_string()),
            localized_message: Some(err.root_cause().to_string()),
        }
    }
}
