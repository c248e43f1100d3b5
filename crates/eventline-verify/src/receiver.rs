//! Blocking, timeout-bounded await primitives over the event store.

use std::sync::Arc;
use std::time::{Duration, Instant};

use eventline_types::{CodecError, EventError, JsonCodec};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::info;

use crate::definition::EventDefinition;
use crate::store::EventStore;

/// Poll cadence for the await primitives.
///
/// The cadence is correctness-relevant: too coarse an interval makes
/// assertions flaky against their deadline, so both knobs are explicit.
#[derive(Debug, Clone)]
pub struct AwaitConfig {
    /// Fixed interval between store checks.
    pub poll_interval: Duration,
    /// Total wait before an await fails with a timeout.
    pub timeout: Duration,
}

impl Default for AwaitConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            timeout: Duration::from_secs(120),
        }
    }
}

impl AwaitConfig {
    /// Override the poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Override the total timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Failures surfaced to the assertion boundary.
#[derive(Debug, Error)]
pub enum AwaitError {
    /// No matching event arrived within the window.
    #[error(
        "timed out after {timeout:?} waiting for event {event_type} (correlation id: {correlation_id})"
    )]
    Timeout {
        /// Event type that was awaited.
        event_type: String,
        /// Correlation id awaited on, or `"any"`.
        correlation_id: String,
        /// The configured total wait.
        timeout: Duration,
    },

    /// A failure payload arrived but carried the wrong message.
    #[error("failure payload mismatch for {event_type}: expected {expected:?}, got {actual:?}")]
    FailureMismatch {
        /// Event type that was awaited.
        event_type: String,
        /// The asserted error message.
        expected: String,
        /// What the payload actually carried.
        actual: Option<String>,
    },

    /// A matching event arrived but its payload would not decode.
    #[error(transparent)]
    Decode(#[from] CodecError),
}

/// The await primitives.
///
/// Each call is an independent poll loop: `WAITING` until the store matches
/// (`MATCHED`) or the deadline passes (`TIMED_OUT`). There is no
/// cancellation path other than the timeout.
pub struct EventReceiver {
    store: Arc<EventStore>,
    config: AwaitConfig,
    codec: JsonCodec,
}

impl EventReceiver {
    /// Create a receiver with the default 10s/120s cadence.
    pub fn new(store: Arc<EventStore>) -> Self {
        Self::with_config(store, AwaitConfig::default())
    }

    /// Create a receiver with an explicit cadence.
    pub fn with_config(store: Arc<EventStore>, config: AwaitConfig) -> Self {
        Self {
            store,
            config,
            codec: JsonCodec,
        }
    }

    /// Block until at least one event matches the definition; return the
    /// first decoded payload found. Which one is unspecified when several
    /// arrive before the first successful check.
    pub async fn await_any<T: DeserializeOwned>(
        &self,
        definition: &EventDefinition<T>,
    ) -> Result<T, AwaitError> {
        self.poll_until(definition.event_type(), "any", || {
            match self.store.find(definition.key()).into_iter().next() {
                Some((payload, _)) => Ok(Some(self.codec.decode(&payload)?)),
                None => Ok(None),
            }
        })
        .await
    }

    /// Block until an event matching the definition is correlated to the
    /// given action id.
    pub async fn await_event<T>(
        &self,
        action_id: &str,
        definition: &EventDefinition<T>,
    ) -> Result<(), AwaitError> {
        self.poll_until(definition.event_type(), action_id, || {
            let found = self.store.find_correlated(definition.key(), action_id);
            if found.is_empty() {
                Ok(None)
            } else {
                Ok(Some(()))
            }
        })
        .await
    }

    /// As [`await_event`](Self::await_event), returning the first correlated
    /// event's decoded payload.
    pub async fn await_result<T: DeserializeOwned>(
        &self,
        action_id: &str,
        definition: &EventDefinition<T>,
    ) -> Result<T, AwaitError> {
        self.poll_until(definition.event_type(), action_id, || {
            match self
                .store
                .find_correlated(definition.key(), action_id)
                .into_iter()
                .next()
            {
                Some((payload, _)) => Ok(Some(self.codec.decode(&payload)?)),
                None => Ok(None),
            }
        })
        .await
    }

    /// Await a correlated failure event and assert its `error` field.
    ///
    /// A decodable failure payload carrying a different message fails
    /// immediately with [`AwaitError::FailureMismatch`] - only one failure
    /// response exists per action id, so waiting longer cannot change the
    /// answer.
    pub async fn await_failure(
        &self,
        action_id: &str,
        definition: &EventDefinition<EventError>,
        expected: &str,
    ) -> Result<(), AwaitError> {
        self.poll_until(definition.event_type(), action_id, || {
            match self
                .store
                .find_correlated(definition.key(), action_id)
                .into_iter()
                .next()
            {
                Some((payload, _)) => {
                    let event_error: EventError = self.codec.decode(&payload)?;
                    if event_error.error.as_deref() == Some(expected) {
                        Ok(Some(()))
                    } else {
                        Err(AwaitError::FailureMismatch {
                            event_type: definition.event_type().to_string(),
                            expected: expected.to_string(),
                            actual: event_error.error,
                        })
                    }
                }
                None => Ok(None),
            }
        })
        .await
    }

    /// The shared poll loop: check, then re-check on a fixed interval until
    /// the deadline.
    async fn poll_until<T>(
        &self,
        event_type: &str,
        correlation_id: &str,
        mut check: impl FnMut() -> Result<Option<T>, AwaitError>,
    ) -> Result<T, AwaitError> {
        let started = Instant::now();
        info!(event_type, correlation_id, "Awaiting event");

        loop {
            if let Some(value) = check()? {
                info!(
                    event_type,
                    correlation_id,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Event received"
                );
                return Ok(value);
            }

            if started.elapsed() >= self.config.timeout {
                return Err(AwaitError::Timeout {
                    event_type: event_type.to_string(),
                    correlation_id: correlation_id.to_string(),
                    timeout: self.config.timeout,
                });
            }

            tokio::time::sleep(self.config.poll_interval).await;
        }
    }
}
