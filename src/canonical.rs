//! Canonical hashing of patterns, corpora and policies.
//!
//! Values are serialized to JSON (struct fields in declaration order, vectors
//! in index order) and hashed with xxh64. Hashed data must not contain
//! `HashMap`s; use ordered collections instead.

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Seed for every canonical hash.
const CANONICAL_SEED: u64 = 0;

/// Serialize a value to canonical JSON bytes.
pub fn to_canonical_bytes<T: Serialize + ?Sized>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("Canonical serialization failed")
}

/// xxh64 of the canonical bytes of `value`.
pub fn canonical_hash<T: Serialize + ?Sized>(value: &T) -> u64 {
    xxh64(&to_canonical_bytes(value), CANONICAL_SEED)
}

/// [`canonical_hash`] as 16 lowercase hex digits.
pub fn canonical_hash_hex<T: Serialize + ?Sized>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}
