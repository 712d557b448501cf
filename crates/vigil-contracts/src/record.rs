//! The ledger's event record type.
//!
//! `EventRecord` is a single entry in the hash chain — an arbitrary JSON
//! payload wrapped with index numbering and the SHA-256 hashes that make
//! tampering detectable. The hashing and verification logic lives in
//! `vigil-ledger`; this crate only defines the data shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single entry in the SHA-256 hash chain.
///
/// Each record commits to its predecessor via `prev_hash`, forming an
/// append-only chain. Modifying any field — including the embedded
/// `payload` — invalidates `hash` and every subsequent `prev_hash`, which
/// chain verification detects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Monotonically increasing position in the chain, starting at 0 for the
    /// genesis record. Gapless by construction.
    pub index: u64,

    /// Wall-clock time (UTC) the record was created.
    pub timestamp: DateTime<Utc>,

    /// Arbitrary structured event data. The ledger never inspects this.
    pub payload: serde_json::Value,

    /// SHA-256 hash (hex) of the previous record, or `GENESIS_HASH` for the
    /// genesis record.
    pub prev_hash: String,

    /// SHA-256 hash (hex) of this record's canonical content.
    ///
    /// Computed over (index, timestamp, prev_hash, canonical JSON of
    /// payload). Recomputing it from the stored fields must reproduce this
    /// value exactly.
    pub hash: String,
}

impl EventRecord {
    /// The sentinel `prev_hash` used by the genesis record.
    ///
    /// 64 hex zeros — a value that can never be the SHA-256 of real data,
    /// making genesis detection unambiguous.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}
