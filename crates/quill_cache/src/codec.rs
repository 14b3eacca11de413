//! Opaque value encoding for non-raw cache payloads.
//!
//! Raw byte payloads are stored as-is and never pass through this module.
//! Anything else is serialized with bincode into a reversible byte form.
//! Decoding is fail-safe: a corrupt or truncated payload yields `None`, so
//! cache corruption degrades to a cache miss instead of an error. All decode
//! failures are treated uniformly; the cause is not distinguished.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CacheError;

/// Serializes a value into an opaque byte payload.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CacheError> {
    bincode::serde::encode_to_vec(value, bincode::config::standard()).map_err(|e| {
        CacheError::Serialization {
            reason: e.to_string(),
        }
    })
}

/// Reverses [`encode`], returning `None` on any decode failure.
pub fn decode<T: DeserializeOwned>(payload: &[u8]) -> Option<T> {
    bincode::serde::decode_from_slice(payload, bincode::config::standard())
        .ok()
        .map(|(value, _)| value)
}
