//! # Eventline Dispatch - Route Matching and Correlated Responses
//!
//! Turns raw inbound records into typed envelopes, fans them out to every
//! registered route whose predicate matches the action type, and publishes a
//! correlated success/failure response per route.
//!
//! ## Flow
//!
//! ```text
//! [Broker] ──record──→ [RouteListener] ──→ [EventDispatcher]
//!                                               │ match action_type
//!                          ┌────────────────────┼────────────────────┐
//!                          ▼                    ▼                    ▼
//!                      [Route A]            [Route B]            [Route C]
//!                          │                    │                    │
//!                     apply() Ok           apply() Err         decode fails
//!                          │                    │                    │
//!                          ▼                    ▼                    ▼
//!                   _SUCCESS response    _FAILURE response     (abandoned)
//!                          └──────────→ [Responder] ←──────────┘
//! ```
//!
//! ## Failure Isolation
//!
//! - A malformed envelope drops the record, never the consumer.
//! - A payload that won't decode abandons that one unit, no response.
//! - A handler error becomes a `_FAILURE` response; sibling units are
//!   unaffected.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod config;
pub mod dispatcher;
pub mod listener;
pub mod registry;
pub mod responder;
pub mod route;

// Re-export main types
pub use config::{DispatcherConfig, ResponderConfig};
pub use dispatcher::EventDispatcher;
pub use listener::RouteListener;
pub use registry::{RouteRegistry, RouteRegistryBuilder};
pub use responder::Responder;
pub use route::{ErasedRoute, RouteOutcome, TopicRoute};
