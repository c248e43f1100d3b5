//! # Eventline Verify - Observed-Traffic Store and Await Primitives
//!
//! The verification half of the system: a background sink subscribes to
//! every topic named by the known event definitions and persists each
//! matching record into an indexed in-memory store; blocking await
//! primitives poll that store with a fixed interval and a deadline so
//! asynchronous effects can be asserted deterministically.
//!
//! ## Flow
//!
//! ```text
//! [Broker] ──every record──→ [EventSink] ──known actionType──→ [EventStore]
//!                                                                   ▲
//!                               await_any / await_result / ...      │
//!                            [EventReceiver] ──poll, deadline───────┘
//! ```
//!
//! The store is append-only and unbounded; it is a bounded-lifetime
//! verification harness, not a production ledger.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod definition;
pub mod receiver;
pub mod sink;
pub mod store;

// Re-export main types
pub use definition::{EventDefinition, EventKey, EventRegistry};
pub use receiver::{AwaitConfig, AwaitError, EventReceiver};
pub use sink::{EventSink, SinkConfig};
pub use store::{EventStore, StoredEvent};
