//! Wire header names and the header-map ↔ envelope field mapping.

use std::collections::BTreeMap;

use thiserror::Error;

/// Header carrying the message's own unique id. Required.
pub const ACTION_ID: &str = "actionId";

/// Header carrying the routing tag. Required.
pub const ACTION_TYPE: &str = "actionType";

/// Header carrying the causal parent id. Optional; empty string means absent.
pub const PARENT_ACTION_ID: &str = "parentActionId";

/// Header naming the producing service. Optional.
pub const MESSAGE_ORIGINATOR: &str = "messageOriginator";

/// Errors from reconstructing an envelope out of raw record headers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// A required header was missing or empty.
    #[error("required header `{0}` is missing")]
    MissingHeader(&'static str),
}

/// The envelope's correlation fields as they appear in record headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeHeaders {
    /// `actionId` header value.
    pub action_id: String,
    /// `parentActionId` header value, when present and non-empty.
    pub parent_action_id: Option<String>,
    /// `messageOriginator` header value.
    pub message_originator: Option<String>,
    /// `actionType` header value.
    pub action_type: String,
}

impl EnvelopeHeaders {
    /// Parse envelope fields from decoded record headers.
    ///
    /// `actionId` and `actionType` are required; a missing or empty value
    /// fails construction and the caller is expected to drop the record.
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EnvelopeError> {
        Ok(Self {
            action_id: required(map, ACTION_ID)?,
            action_type: required(map, ACTION_TYPE)?,
            parent_action_id: optional(map, PARENT_ACTION_ID),
            message_originator: optional(map, MESSAGE_ORIGINATOR),
        })
    }

    /// Mirror the fields back into a header map.
    ///
    /// `parentActionId` is written as an empty string when absent, matching
    /// the outbound record shape consumers expect.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert(ACTION_ID.to_string(), self.action_id.clone());
        map.insert(ACTION_TYPE.to_string(), self.action_type.clone());
        map.insert(
            PARENT_ACTION_ID.to_string(),
            self.parent_action_id.clone().unwrap_or_default(),
        );
        if let Some(originator) = &self.message_originator {
            map.insert(MESSAGE_ORIGINATOR.to_string(), originator.clone());
        }
        map
    }

    /// Decode raw header bytes into strings, skipping non-UTF-8 values.
    #[must_use]
    pub fn decode_raw(raw: &BTreeMap<String, Vec<u8>>) -> BTreeMap<String, String> {
        raw.iter()
            .filter_map(|(key, value)| {
                std::str::from_utf8(value)
                    .ok()
                    .map(|value| (key.clone(), value.to_string()))
            })
            .collect()
    }
}

fn required(map: &BTreeMap<String, String>, name: &'static str) -> Result<String, EnvelopeError> {
    match map.get(name) {
        Some(value) if !value.is_empty() => Ok(value.clone()),
        _ => Err(EnvelopeError::MissingHeader(name)),
    }
}

fn optional(map: &BTreeMap<String, String>, name: &str) -> Option<String> {
    map.get(name).filter(|value| !value.is_empty()).cloned()
}
