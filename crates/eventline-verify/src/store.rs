//! Indexed, append-only store of observed events.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;

use crate::definition::EventKey;

/// One observed record, as ingested by the sink. Never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEvent {
    /// Topic the record arrived on.
    pub topic: String,
    /// `actionId` header of the observed message.
    pub action_id: Option<String>,
    /// `parentActionId` header, the correlation link back to the cause.
    pub parent_action_id: Option<String>,
    /// `actionType` header.
    pub action_type: String,
    /// `messageOriginator` header.
    pub message_originator: Option<String>,
    /// Raw payload bytes, decoded lazily by callers.
    pub payload: Vec<u8>,
    /// All decoded string headers of the record.
    pub headers: BTreeMap<String, String>,
}

/// Query result: payload bytes plus the record's decoded headers.
pub type FoundEvent = (Vec<u8>, BTreeMap<String, String>);

#[derive(Default)]
struct Inner {
    rows: Vec<StoredEvent>,
    /// Row indices by `(topic, action_type)`.
    index: HashMap<(String, String), Vec<usize>>,
}

/// Thread-safe indexed table of stored events.
///
/// One writer (the sink task) appends, many readers query. A single lock
/// around rows and index together keeps reads snapshot-consistent: no query
/// can observe a row without its index entry or vice versa. Rows are
/// retained for the process lifetime; this is a bounded-duration
/// verification store, not a production one.
#[derive(Default)]
pub struct EventStore {
    inner: RwLock<Inner>,
}

impl EventStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one observed event.
    pub fn append(&self, event: StoredEvent) {
        let mut inner = self.inner.write();
        let row = inner.rows.len();
        inner
            .index
            .entry((event.topic.clone(), event.action_type.clone()))
            .or_default()
            .push(row);
        inner.rows.push(event);
    }

    /// All events matching the key's topic, event type, and (when the key
    /// carries one) originator.
    #[must_use]
    pub fn find(&self, key: &EventKey) -> Vec<FoundEvent> {
        self.collect(key, |_| true)
    }

    /// As [`find`](Self::find), additionally requiring the stored
    /// `parentActionId` to equal the given correlation id.
    #[must_use]
    pub fn find_correlated(&self, key: &EventKey, correlation_id: &str) -> Vec<FoundEvent> {
        self.collect(key, |row| {
            row.parent_action_id.as_deref() == Some(correlation_id)
        })
    }

    fn collect(&self, key: &EventKey, extra: impl Fn(&StoredEvent) -> bool) -> Vec<FoundEvent> {
        let inner = self.inner.read();
        let Some(rows) = inner
            .index
            .get(&(key.topic.clone(), key.event_type.clone()))
        else {
            return Vec::new();
        };

        rows.iter()
            .map(|&row| &inner.rows[row])
            .filter(|row| {
                key.originator
                    .as_ref()
                    .map_or(true, |originator| {
                        row.message_originator.as_deref() == Some(originator.as_str())
                    })
                    && extra(row)
            })
            .map(|row| (row.payload.clone(), row.headers.clone()))
            .collect()
    }

    /// Total number of stored events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().rows.len()
    }

    /// Whether the store holds no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().rows.is_empty()
    }
}
