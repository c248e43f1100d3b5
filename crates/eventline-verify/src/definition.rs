//! Event definitions: the mapping from a logical event name to its topic,
//! payload shape, and originator.

use std::collections::{BTreeSet, HashMap};
use std::marker::PhantomData;

use tracing::warn;

/// Untyped identity of an event definition.
///
/// Registry membership and store queries key on these three fields; the
/// payload shape only matters once bytes are decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventKey {
    /// Logical event name, matched against the `actionType` header.
    pub event_type: String,
    /// Topic the event is observed on.
    pub topic: String,
    /// Optional originator filter; `None` accepts any producer.
    pub originator: Option<String>,
}

impl EventKey {
    /// Create a key with no originator filter.
    pub fn new(event_type: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            topic: topic.into(),
            originator: None,
        }
    }

    /// Restrict the key to one producing service.
    #[must_use]
    pub fn with_originator(mut self, originator: impl Into<String>) -> Self {
        self.originator = Some(originator.into());
        self
    }
}

/// A typed event definition: an [`EventKey`] plus the payload shape `T` the
/// observed bytes decode into.
#[derive(Debug)]
pub struct EventDefinition<T> {
    key: EventKey,
    _payload: PhantomData<fn() -> T>,
}

impl<T> EventDefinition<T> {
    /// Define an event with no originator filter.
    pub fn new(event_type: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            key: EventKey::new(event_type, topic),
            _payload: PhantomData,
        }
    }

    /// Restrict the definition to one producing service.
    #[must_use]
    pub fn with_originator(mut self, originator: impl Into<String>) -> Self {
        self.key = self.key.with_originator(originator);
        self
    }

    /// The untyped identity of this definition.
    #[must_use]
    pub fn key(&self) -> &EventKey {
        &self.key
    }

    /// Logical event name.
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.key.event_type
    }
}

impl<T> Clone for EventDefinition<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            _payload: PhantomData,
        }
    }
}

/// The full set of known event definitions.
///
/// Built once from an externally supplied list; read-only afterwards. Used
/// by the sink to decide what to persist and by callers to look up
/// definitions by name.
#[derive(Debug, Default)]
pub struct EventRegistry {
    by_type: HashMap<String, EventKey>,
    topics: BTreeSet<String>,
}

impl EventRegistry {
    /// Build a registry from event keys.
    ///
    /// Event types are unique; a repeated type replaces the earlier entry.
    pub fn new(keys: impl IntoIterator<Item = EventKey>) -> Self {
        let mut by_type = HashMap::new();
        let mut topics = BTreeSet::new();
        for key in keys {
            topics.insert(key.topic.clone());
            if let Some(previous) = by_type.insert(key.event_type.clone(), key) {
                warn!(
                    event_type = %previous.event_type,
                    topic = %previous.topic,
                    "Duplicate event definition replaces earlier entry"
                );
            }
        }
        Self { by_type, topics }
    }

    /// Look up a definition by event type.
    #[must_use]
    pub fn get(&self, event_type: &str) -> Option<&EventKey> {
        self.by_type.get(event_type)
    }

    /// Whether the event type is known to this registry.
    #[must_use]
    pub fn supports(&self, event_type: &str) -> bool {
        self.by_type.contains_key(event_type)
    }

    /// Union of topics across all known definitions.
    #[must_use]
    pub fn topics(&self) -> &BTreeSet<String> {
        &self.topics
    }

    /// Number of known event types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_type.len()
    }

    /// Whether the registry holds no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }
}
