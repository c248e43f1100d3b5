//! Builds and publishes correlated success/failure response envelopes.

use std::sync::Arc;

use eventline_bus::{BrokerRecord, RecordPublisher};
use eventline_types::{Envelope, EnvelopeHeaders, JsonCodec};
use serde::Serialize;
use tracing::{debug, error};
use uuid::Uuid;

use crate::config::ResponderConfig;

/// Response emitter.
///
/// Every response carries a fresh `action_id`, the chain-preserving
/// `parent_action_id`, and the request's action type with a postfix
/// appended. Emission is at-most-once: a publish failure is logged and the
/// response is lost.
pub struct Responder {
    publisher: Arc<dyn RecordPublisher>,
    config: ResponderConfig,
    codec: JsonCodec,
}

impl Responder {
    /// Create a responder publishing through the given broker seam.
    pub fn new(publisher: Arc<dyn RecordPublisher>, config: ResponderConfig) -> Self {
        Self {
            publisher,
            config,
            codec: JsonCodec,
        }
    }

    /// Serialize a reply and send it as the response payload.
    ///
    /// Encoding failure is logged and the response is dropped; the request
    /// side has already completed by this point.
    pub async fn send<S: Serialize>(
        &self,
        request: &Envelope<Vec<u8>>,
        reply: &S,
        postfix: &str,
    ) {
        let payload = match self.codec.encode(reply) {
            Ok(payload) => payload,
            Err(e) => {
                error!(
                    action_type = %request.action_type,
                    error = %e,
                    "Failed to encode response payload; dropping response"
                );
                return;
            }
        };
        self.send_raw(request, payload, postfix).await;
    }

    /// Send an already encoded payload as the response.
    pub async fn send_raw(&self, request: &Envelope<Vec<u8>>, payload: Vec<u8>, postfix: &str) {
        let headers = EnvelopeHeaders {
            action_id: Uuid::new_v4().to_string(),
            parent_action_id: Some(request.response_parent().to_string()),
            message_originator: Some(self.config.originator.clone()),
            action_type: format!("{}{}", request.action_type, postfix),
        };

        let record = BrokerRecord::new(self.config.response_topic.clone(), payload)
            .with_key(headers.action_id.clone())
            .with_string_headers(&headers.to_map());

        match self.publisher.publish(record).await {
            Ok(receivers) => {
                debug!(
                    action_type = %headers.action_type,
                    parent_action_id = ?headers.parent_action_id,
                    receivers,
                    "Sent response"
                );
            }
            Err(e) => {
                // At-most-once: no retry, the response is lost
                error!(
                    action_type = %headers.action_type,
                    error = %e,
                    "Failed to publish response; dropping"
                );
            }
        }
    }
}
