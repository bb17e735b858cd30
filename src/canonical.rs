//! Canonical serialization for deterministic component fingerprints.
//!
//! Fingerprints correlate log lines about the same component across
//! requests and connections. They are never sent to clients.
//!
//! ## Determinism Guarantees
//!
//! - `Adjacency` is a `BTreeMap`, so keys serialize in sorted order
//! - Neighbor lists serialize in listed order
//! - Same listing → same fingerprint, across processes

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

use crate::types::Adjacency;

/// Serialize a value to canonical JSON bytes for hashing.
///
/// Returns an empty buffer for values that cannot be represented as JSON
/// (for example maps with non-string keys), logging the failure.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    match serde_json::to_vec(value) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "canonical serialization failed, hashing empty input");
            Vec::new()
        }
    }
}

/// Compute canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    xxh64(&to_canonical_bytes(value), 0)
}

/// Compute canonical hash and return as hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}

/// Stable 64-bit fingerprint of an adjacency listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentFingerprint(u64);

impl ComponentFingerprint {
    /// Fingerprint an adjacency listing.
    pub fn of(adjacency: &Adjacency) -> Self {
        Self(canonical_hash(adjacency))
    }

    /// Raw hash value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ComponentFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
