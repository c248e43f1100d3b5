//! The subscription side of the broker.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, RwLock};
use std::task::{Context, Poll};

use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;
use tracing::debug;

use crate::record::{BrokerRecord, TopicFilter};

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The broker was closed.
    #[error("Broker closed")]
    Closed,
}

/// Decrements the broker's per-filter subscription count on drop.
///
/// Held by whichever handle currently owns the receiver, so converting a
/// [`Subscription`] into a [`RecordStream`] keeps the bookkeeping intact.
struct SubscriptionGuard {
    subscriptions: Arc<RwLock<HashMap<String, usize>>>,
    filter_key: String,
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        // Decrement subscription count
        let Ok(mut subs) = self.subscriptions.write() else {
            return;
        };
        let Some(count) = subs.get_mut(&self.filter_key) else {
            debug!(filter = %self.filter_key, "Subscription dropped");
            return;
        };

        *count = count.saturating_sub(1);
        if *count == 0 {
            subs.remove(&self.filter_key);
        }
        debug!(filter = %self.filter_key, "Subscription dropped");
    }
}

/// A subscription handle for receiving records.
///
/// When dropped, the subscription is automatically cleaned up.
pub struct Subscription {
    /// The broadcast receiver.
    receiver: broadcast::Receiver<BrokerRecord>,

    /// Filter for this subscription.
    filter: TopicFilter,

    /// Cleanup guard.
    guard: SubscriptionGuard,
}

impl Subscription {
    /// Create a new subscription.
    pub(crate) fn new(
        receiver: broadcast::Receiver<BrokerRecord>,
        filter: TopicFilter,
        subscriptions: Arc<RwLock<HashMap<String, usize>>>,
        filter_key: String,
    ) -> Self {
        Self {
            receiver,
            filter,
            guard: SubscriptionGuard {
                subscriptions,
                filter_key,
            },
        }
    }

    /// Receive the next record that matches the filter.
    ///
    /// # Returns
    ///
    /// - `Some(record)` - The next matching record
    /// - `None` - The channel was closed (broker dropped)
    pub async fn recv(&mut self) -> Option<BrokerRecord> {
        loop {
            let record = match self.receiver.recv().await {
                Ok(r) => r,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(lagged = count, "Subscriber lagged, some records dropped");
                    continue;
                }
            };

            if self.filter.matches(&record) {
                return Some(record);
            }
            // Record doesn't match filter, continue waiting
        }
    }

    /// Try to receive the next record without blocking.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))` - A record was available and matched
    /// - `Ok(None)` - No record available (would block)
    /// - `Err(SubscriptionError::Closed)` - The channel was closed
    pub fn try_recv(&mut self) -> Result<Option<BrokerRecord>, SubscriptionError> {
        loop {
            let record = match self.receiver.try_recv() {
                Ok(r) => r,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            };

            if self.filter.matches(&record) {
                return Ok(Some(record));
            }
            // Record doesn't match filter, try again
        }
    }

    /// Get the filter for this subscription.
    #[must_use]
    pub fn filter(&self) -> &TopicFilter {
        &self.filter
    }
}

/// A stream wrapper for subscriptions.
///
/// Implements `tokio_stream::Stream` for use with stream combinators. The
/// underlying `BroadcastStream` handles waker registration; this layer only
/// applies the topic filter and swallows lag notifications.
pub struct RecordStream {
    inner: BroadcastStream<BrokerRecord>,
    filter: TopicFilter,
    _guard: SubscriptionGuard,
}

impl RecordStream {
    /// Create a new record stream from a subscription.
    #[must_use]
    pub fn new(subscription: Subscription) -> Self {
        let Subscription {
            receiver,
            filter,
            guard,
        } = subscription;
        Self {
            inner: BroadcastStream::new(receiver),
            filter,
            _guard: guard,
        }
    }

    /// Get the filter for this stream.
    #[must_use]
    pub fn filter(&self) -> &TopicFilter {
        &self.filter
    }
}

impl Stream for RecordStream {
    type Item = BrokerRecord;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(record))) => {
                    if self.filter.matches(&record) {
                        return Poll::Ready(Some(record));
                    }
                    // Record doesn't match filter, poll again
                }
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(count)))) => {
                    debug!(lagged = count, "Stream subscriber lagged, some records dropped");
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
