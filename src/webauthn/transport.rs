//! CBOR transport for ceremony payloads.
//!
//! Ceremony request and response bodies are CBOR maps, not JSON; error
//! responses carry a short reason string in the same encoding.

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

pub const CBOR_CONTENT_TYPE: &str = "application/cbor";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to encode ceremony payload: {0}")]
    Encode(String),
    #[error("failed to decode ceremony payload: {0}")]
    Decode(String),
}

/// # Errors
/// Returns an error when the value cannot be represented as CBOR.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, TransportError> {
    let mut buffer = Vec::new();
    ciborium::into_writer(value, &mut buffer).map_err(|err| TransportError::Encode(err.to_string()))?;
    Ok(buffer)
}

/// # Errors
/// Returns an error when the bytes are not CBOR or do not match `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, TransportError> {
    ciborium::from_reader(bytes).map_err(|err| TransportError::Decode(err.to_string()))
}
