//! # Eventline Bus - Broker Abstraction for Record Publish/Subscribe
//!
//! Defines the record and topic model the rest of the system speaks, plus an
//! in-memory broker suitable for single-process operation and integration
//! harnesses.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │  Producer    │                    │  Subscriber  │
//! │              │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │ Topic Broker │ ─────────┘
//!                  │              │  subscribe(filter)
//!                  └──────────────┘
//! ```
//!
//! Records are opaque byte payloads with string-keyed header bytes; envelope
//! semantics live one layer up in `eventline-types`.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod broker;
pub mod record;
pub mod subscription;

// Re-export main types
pub use broker::{InMemoryBroker, PublishError, RecordPublisher};
pub use record::{BrokerRecord, TopicFilter};
pub use subscription::{RecordStream, Subscription, SubscriptionError};

/// Maximum records to buffer per subscriber before backpressure.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;
