//! The correlation + payload wrapper carried by every message.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::headers::EnvelopeHeaders;

/// A typed message envelope.
///
/// `action_id` is unique per emitted message; `action_type` drives route
/// matching and response tagging. The payload is opaque to everything except
/// the codec boundary, so `T` is frequently `Vec<u8>` until a route decodes
/// it into its expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    /// Unique id assigned by the original sender of this message.
    pub action_id: String,

    /// Id of the causally preceding message, absent for root requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_action_id: Option<String>,

    /// Logical name of the producing service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_originator: Option<String>,

    /// Logical operation tag used for routing.
    pub action_type: String,

    /// Opaque typed body.
    pub payload: T,
}

impl<T> Envelope<T> {
    /// Create a root envelope with a fresh v4 `action_id` and no parent.
    pub fn new(action_type: impl Into<String>, payload: T) -> Self {
        Self {
            action_id: Uuid::new_v4().to_string(),
            parent_action_id: None,
            message_originator: None,
            action_type: action_type.into(),
            payload,
        }
    }

    /// The `parent_action_id` a response to this envelope must carry.
    ///
    /// The request's parent when present, else the request's own id. This
    /// collapses chains deeper than two hops to the immediate request's root.
    #[must_use]
    pub fn response_parent(&self) -> &str {
        self.parent_action_id.as_deref().unwrap_or(&self.action_id)
    }

    /// Rebuild this envelope around a different payload, preserving every
    /// correlation field.
    pub fn with_payload<U>(self, payload: U) -> Envelope<U> {
        Envelope {
            action_id: self.action_id,
            parent_action_id: self.parent_action_id,
            message_originator: self.message_originator,
            action_type: self.action_type,
            payload,
        }
    }

    /// Assemble an envelope from parsed wire headers and a payload.
    pub fn from_headers(headers: EnvelopeHeaders, payload: T) -> Self {
        Self {
            action_id: headers.action_id,
            parent_action_id: headers.parent_action_id,
            message_originator: headers.message_originator,
            action_type: headers.action_type,
            payload,
        }
    }

    /// The wire headers mirroring this envelope's correlation fields.
    #[must_use]
    pub fn headers(&self) -> EnvelopeHeaders {
        EnvelopeHeaders {
            action_id: self.action_id.clone(),
            parent_action_id: self.parent_action_id.clone(),
            message_originator: self.message_originator.clone(),
            action_type: self.action_type.clone(),
        }
    }
}
