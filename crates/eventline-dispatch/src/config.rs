//! Dispatch-side configuration.
//!
//! Plain structs with sane defaults and override capability, no external
//! configuration framework.

/// Dispatcher tuning.
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Maximum concurrently running dispatch units. Further units wait for
    /// a permit before spawning.
    pub max_in_flight: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self { max_in_flight: 64 }
    }
}

impl DispatcherConfig {
    /// Override the dispatch pool size.
    #[must_use]
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight;
        self
    }
}

/// Response emission settings.
#[derive(Debug, Clone)]
pub struct ResponderConfig {
    /// Topic every response envelope is published to.
    pub response_topic: String,
    /// Logical name of this service, written into `messageOriginator`.
    pub originator: String,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            response_topic: "EVENT_TOPIC".to_string(),
            originator: "eventline".to_string(),
        }
    }
}

impl ResponderConfig {
    /// Create a config for a named service.
    pub fn new(originator: impl Into<String>) -> Self {
        Self {
            originator: originator.into(),
            ..Self::default()
        }
    }

    /// Override the response topic.
    #[must_use]
    pub fn with_response_topic(mut self, topic: impl Into<String>) -> Self {
        self.response_topic = topic.into();
        self
    }
}
