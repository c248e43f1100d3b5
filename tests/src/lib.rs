//! # Eventline Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── harness.rs        # Shared pipeline harness (broker + routes + sink)
//! └── integration/      # End-to-end request/response and verification
//!     ├── request_response.rs
//!     └── verification.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p eventline-tests
//!
//! # By category
//! cargo test -p eventline-tests integration::request_response::
//! cargo test -p eventline-tests integration::verification::
//! ```

#![allow(dead_code)]

pub mod harness;
pub mod integration;
