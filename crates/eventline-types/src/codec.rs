//! The opaque payload codec boundary.
//!
//! Dispatch and verification never interpret payload bytes themselves; they
//! go through `encode`/`decode` here. The concrete serializer is JSON, the
//! only format this wire speaks.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors from the codec boundary.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Payload could not be serialized.
    #[error("failed to encode payload: {0}")]
    Encode(#[source] serde_json::Error),

    /// Payload bytes could not be decoded into the requested shape.
    #[error("failed to decode payload: {0}")]
    Decode(#[source] serde_json::Error),
}

/// JSON payload codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Serialize a payload into wire bytes.
    pub fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(value).map_err(CodecError::Encode)
    }

    /// Decode wire bytes into the requested payload shape.
    pub fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        serde_json::from_slice(bytes).map_err(CodecError::Decode)
    }
}
