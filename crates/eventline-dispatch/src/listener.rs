//! Background task feeding the dispatcher from a broker subscription.

use std::sync::Arc;

use eventline_bus::{InMemoryBroker, TopicFilter};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::dispatcher::EventDispatcher;

/// Subscribes the dispatcher to its request topics.
///
/// Records are handed to the dispatcher one at a time, in delivery order;
/// the dispatcher fans out internally. The task ends when the broker closes.
pub struct RouteListener;

impl RouteListener {
    /// Spawn the listener loop.
    pub fn spawn(
        broker: &InMemoryBroker,
        filter: TopicFilter,
        dispatcher: Arc<EventDispatcher>,
    ) -> JoinHandle<()> {
        let mut subscription = broker.subscribe(filter);
        info!(topics = ?subscription.filter().topics, "Route listener started");

        tokio::spawn(async move {
            while let Some(record) = subscription.recv().await {
                dispatcher.on_record(record).await;
            }
            debug!("Route listener stopped (broker closed)");
        })
    }
}
