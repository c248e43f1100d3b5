//! # Eventline Types - Shared Wire-Level Types
//!
//! Leaf crate holding the message envelope, header mapping, structured
//! failure payload, and the JSON codec boundary. Both halves of the system
//! (dispatch and verification) build on these types.
//!
//! ## Envelope Correlation
//!
//! Every message carries an `actionId` unique to that emission and an
//! optional `parentActionId` pointing at the causally preceding message:
//!
//! ```text
//! request  { actionId: a1, parentActionId: -  }
//!    │
//!    ▼
//! response { actionId: r1, parentActionId: a1 }
//! ```
//!
//! A response inherits the request's `parentActionId` when present, else the
//! request's own `actionId`, so multi-hop chains collapse to their root
//! instead of growing without bound.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod codec;
pub mod envelope;
pub mod error;
pub mod headers;

// Re-export main types
pub use codec::{CodecError, JsonCodec};
pub use envelope::Envelope;
pub use error::EventError;
pub use headers::{EnvelopeError, EnvelopeHeaders};

/// Postfix appended to an action type for success responses.
pub const SUCCESS_POSTFIX: &str = "_SUCCESS";

/// Postfix appended to an action type for failure responses.
pub const FAILURE_POSTFIX: &str = "_FAILURE";
