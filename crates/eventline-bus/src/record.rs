//! Broker records and topic filtering.

use std::collections::{BTreeMap, BTreeSet};

use eventline_types::EnvelopeHeaders;

/// A single record on the wire.
///
/// The key carries the correlation id on request records; headers carry the
/// envelope fields as raw bytes. The payload is opaque here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerRecord {
    /// Topic the record was (or will be) published on.
    pub topic: String,
    /// Optional record key.
    pub key: Option<String>,
    /// Opaque payload bytes.
    pub payload: Vec<u8>,
    /// Raw header bytes by header name.
    pub headers: BTreeMap<String, Vec<u8>>,
}

impl BrokerRecord {
    /// Create a record with no key and no headers.
    pub fn new(topic: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            topic: topic.into(),
            key: None,
            payload,
            headers: BTreeMap::new(),
        }
    }

    /// Set the record key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Add a single header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add string headers, encoding values as UTF-8 bytes.
    #[must_use]
    pub fn with_string_headers(mut self, headers: &BTreeMap<String, String>) -> Self {
        for (name, value) in headers {
            self.headers
                .insert(name.clone(), value.as_bytes().to_vec());
        }
        self
    }

    /// Decode the raw headers into strings, skipping non-UTF-8 values.
    #[must_use]
    pub fn string_headers(&self) -> BTreeMap<String, String> {
        EnvelopeHeaders::decode_raw(&self.headers)
    }
}

/// Filter for subscribing to specific topics.
///
/// An empty topic set matches every record.
#[derive(Debug, Clone, Default)]
pub struct TopicFilter {
    /// Topics to include. Empty means all topics.
    pub topics: BTreeSet<String>,
}

impl TopicFilter {
    /// Create a filter that accepts records on any topic.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for a set of topic names.
    pub fn topics<I, S>(topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            topics: topics.into_iter().map(Into::into).collect(),
        }
    }

    /// Check if a record matches this filter.
    #[must_use]
    pub fn matches(&self, record: &BrokerRecord) -> bool {
        self.topics.is_empty() || self.topics.contains(&record.topic)
    }
}
