//! The publishing side of the broker.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::record::{BrokerRecord, TopicFilter};
use crate::subscription::{RecordStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;

/// Errors from publishing a record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// The broker rejected or could not accept the record.
    #[error("broker unavailable: {0}")]
    Unavailable(String),
}

/// Trait for publishing records to the broker.
///
/// This is the seam the response emitter is written against, so it can be
/// exercised with a stub broker in tests.
#[async_trait]
pub trait RecordPublisher: Send + Sync {
    /// Publish a record.
    ///
    /// # Returns
    ///
    /// The number of active subscribers that received the record.
    async fn publish(&self, record: BrokerRecord) -> Result<usize, PublishError>;

    /// Get the total number of records published.
    fn records_published(&self) -> u64;
}

/// In-memory implementation of the broker.
///
/// Uses `tokio::sync::broadcast` for multi-producer, multi-consumer
/// semantics. Suitable for single-process operation; a distributed
/// deployment would substitute a real broker client behind the same traits.
pub struct InMemoryBroker {
    /// Broadcast sender for records.
    sender: broadcast::Sender<BrokerRecord>,

    /// Active subscription count by filter key.
    subscriptions: Arc<RwLock<HashMap<String, usize>>>,

    /// Total records published.
    records_published: AtomicU64,

    /// Channel capacity.
    capacity: usize,
}

impl InMemoryBroker {
    /// Create a new in-memory broker with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a new in-memory broker with specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
            records_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to records matching a topic filter.
    ///
    /// Returns a `Subscription` handle that can be used to receive records.
    #[must_use]
    pub fn subscribe(&self, filter: TopicFilter) -> Subscription {
        let receiver = self.sender.subscribe();
        let filter_key = format!("{:?}", filter.topics);

        // Track subscription
        {
            if let Ok(mut subs) = self.subscriptions.write() {
                *subs.entry(filter_key.clone()).or_insert(0) += 1;
            }
        }

        debug!(topics = ?filter.topics, "New subscription created");

        Subscription::new(receiver, filter, self.subscriptions.clone(), filter_key)
    }

    /// Get a stream of records matching a topic filter.
    ///
    /// This is a convenience method that returns a `RecordStream`.
    #[must_use]
    pub fn record_stream(&self, filter: TopicFilter) -> RecordStream {
        RecordStream::new(self.subscribe(filter))
    }

    /// Get the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryBroker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordPublisher for InMemoryBroker {
    async fn publish(&self, record: BrokerRecord) -> Result<usize, PublishError> {
        let topic = record.topic.clone();

        // Always increment counter (publish was attempted)
        self.records_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(record) {
            Ok(receiver_count) => {
                debug!(topic = %topic, receivers = receiver_count, "Record published");
                Ok(receiver_count)
            }
            Err(e) => {
                // No receivers - record is dropped, not an error
                warn!(topic = %topic, error = %e, "Record dropped (no receivers)");
                Ok(0)
            }
        }
    }

    fn records_published(&self) -> u64 {
        self.records_published.load(Ordering::Relaxed)
    }
}
