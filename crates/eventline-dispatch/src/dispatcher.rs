//! Turns raw inbound records into fanned-out route invocations.

use std::sync::Arc;

use eventline_bus::BrokerRecord;
use eventline_types::{Envelope, EnvelopeHeaders, FAILURE_POSTFIX, SUCCESS_POSTFIX};
use tokio::sync::Semaphore;
use tracing::{debug, error};

use crate::config::DispatcherConfig;
use crate::registry::RouteRegistry;
use crate::responder::Responder;
use crate::route::{ErasedRoute, RouteOutcome};

/// The dispatch layer.
///
/// `on_record` is invoked once per inbound record, in delivery order; the
/// per-route units it schedules run concurrently and unordered, bounded by
/// the configured pool size. No failure inside a unit ever reaches the
/// caller - the consumption loop must not stall on a bad record.
pub struct EventDispatcher {
    registry: Arc<RouteRegistry>,
    responder: Arc<Responder>,
    permits: Arc<Semaphore>,
}

impl EventDispatcher {
    /// Create a dispatcher over an immutable registry.
    pub fn new(
        registry: Arc<RouteRegistry>,
        responder: Arc<Responder>,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            registry,
            responder,
            permits: Arc::new(Semaphore::new(config.max_in_flight)),
        }
    }

    /// Handle one inbound record.
    ///
    /// A record whose required headers are missing is dropped with an error
    /// log. Each matching route gets its own spawned unit; this method only
    /// waits for pool permits, not for handlers to finish.
    pub async fn on_record(&self, record: BrokerRecord) {
        let topic = record.topic.clone();
        let decoded = record.string_headers();
        let headers = match EnvelopeHeaders::from_map(&decoded) {
            Ok(headers) => headers,
            Err(e) => {
                error!(topic = %topic, error = %e, "Failed to parse envelope from record; dropping");
                return;
            }
        };

        let envelope = Arc::new(Envelope::from_headers(headers, record.payload));
        let routes = self.registry.matching(&envelope.action_type);
        if routes.is_empty() {
            debug!(action_type = %envelope.action_type, "No route matched");
            return;
        }

        for route in routes {
            let Ok(permit) = self.permits.clone().acquire_owned().await else {
                // Semaphore is never closed while the dispatcher lives
                return;
            };
            let responder = self.responder.clone();
            let envelope = envelope.clone();

            tokio::spawn(async move {
                let _permit = permit;
                handle_route(route, &envelope, &responder).await;
            });
        }
    }
}

/// One dispatch unit: decode, apply, respond.
async fn handle_route(
    route: Arc<dyn ErasedRoute>,
    envelope: &Envelope<Vec<u8>>,
    responder: &Responder,
) {
    match route.run(envelope).await {
        RouteOutcome::Success(reply) => {
            debug!(route = route.name(), action_type = %envelope.action_type, "Route succeeded");
            responder.send_raw(envelope, reply, SUCCESS_POSTFIX).await;
        }
        RouteOutcome::Failure(event_error) => {
            error!(
                route = route.name(),
                action_type = %envelope.action_type,
                error = ?event_error.error,
                "Route failed"
            );
            responder.send(envelope, &event_error, FAILURE_POSTFIX).await;
        }
        RouteOutcome::Abandoned(e) => {
            error!(
                route = route.name(),
                action_type = %envelope.action_type,
                error = %e,
                "Abandoning dispatch unit"
            );
        }
    }
}
