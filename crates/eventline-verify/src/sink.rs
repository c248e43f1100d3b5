//! Background subscriber persisting observed records into the store.

use std::sync::Arc;
use std::time::Duration;

use eventline_bus::{BrokerRecord, InMemoryBroker, TopicFilter};
use eventline_types::headers;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, trace};

use crate::definition::EventRegistry;
use crate::store::{EventStore, StoredEvent};

/// Sink tuning.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Bounded wait per poll of the subscription.
    pub poll_wait: Duration,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            poll_wait: Duration::from_secs(2),
        }
    }
}

impl SinkConfig {
    /// Override the per-poll bounded wait.
    #[must_use]
    pub fn with_poll_wait(mut self, poll_wait: Duration) -> Self {
        self.poll_wait = poll_wait;
        self
    }
}

/// The ingestion loop.
///
/// Subscribes to the union of topics across all known event definitions and
/// appends every record whose `actionType` the registry knows. Records that
/// cannot be interpreted are skipped; nothing a single record carries can
/// terminate ingestion. The task ends only when the broker closes.
pub struct EventSink;

impl EventSink {
    /// Spawn the sink on a dedicated background task.
    pub fn spawn(
        broker: &InMemoryBroker,
        registry: Arc<EventRegistry>,
        store: Arc<EventStore>,
        config: SinkConfig,
    ) -> JoinHandle<()> {
        let filter = TopicFilter::topics(registry.topics().iter().cloned());
        let mut subscription = broker.subscribe(filter);
        info!(topics = ?registry.topics(), "Event sink started");

        tokio::spawn(async move {
            loop {
                match timeout(config.poll_wait, subscription.recv()).await {
                    Ok(Some(record)) => ingest(&registry, &store, record),
                    Ok(None) => {
                        debug!("Event sink stopped (broker closed)");
                        break;
                    }
                    // Poll window elapsed with no records; poll again
                    Err(_) => continue,
                }
            }
        })
    }
}

/// Persist one record if its action type is known; skip it otherwise.
fn ingest(registry: &EventRegistry, store: &EventStore, record: BrokerRecord) {
    let decoded = record.string_headers();

    let Some(action_type) = decoded.get(headers::ACTION_TYPE) else {
        trace!(topic = %record.topic, "Skipping record without actionType header");
        return;
    };
    if !registry.supports(action_type) {
        trace!(topic = %record.topic, action_type = %action_type, "Skipping unknown action type");
        return;
    }

    let header_value =
        |name: &str| -> Option<String> { decoded.get(name).filter(|v| !v.is_empty()).cloned() };

    let event = StoredEvent {
        topic: record.topic.clone(),
        action_id: header_value(headers::ACTION_ID).or_else(|| record.key.clone()),
        parent_action_id: header_value(headers::PARENT_ACTION_ID),
        action_type: action_type.clone(),
        message_originator: header_value(headers::MESSAGE_ORIGINATOR),
        payload: record.payload,
        headers: decoded,
    };

    debug!(
        topic = %event.topic,
        action_type = %event.action_type,
        parent_action_id = ?event.parent_action_id,
        "Stored observed event"
    );
    store.append(event);
}
