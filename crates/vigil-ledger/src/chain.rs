//! Hash-chain primitives: hashing and chain integrity verification.
//!
//! Every field that contributes to a record's hash is listed explicitly so
//! nothing is accidentally omitted.
//!
//! Hash input layout (bytes, in order):
//!   1. index as 8-byte little-endian
//!   2. timestamp as 8-byte little-endian unix seconds + 4-byte little-endian
//!      subsecond nanoseconds
//!   3. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. canonical JSON of payload (serde_json with no pretty-printing)

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use vigil_contracts::{
    error::{VigilError, VigilResult},
    record::EventRecord,
};

/// Compute the SHA-256 hash for a single event record.
///
/// The hash commits to every field that uniquely identifies a record: its
/// position in the chain (`index`), its creation time (`timestamp`), its
/// link to the previous record (`prev_hash`), and the full payload.
///
/// Returns a lowercase 64-character hex string.
///
/// # Panics
///
/// Panics if `payload` cannot be serialized to JSON — which cannot happen
/// for a `serde_json::Value` (string keys and finite numbers are guaranteed
/// by construction).
pub fn hash_record(
    index: u64,
    timestamp: &DateTime<Utc>,
    payload: &serde_json::Value,
    prev_hash: &str,
) -> String {
    // serde_json::to_vec produces canonical, deterministic JSON without
    // trailing whitespace or key reordering across calls on the same value.
    let payload_json =
        serde_json::to_vec(payload).expect("a JSON value must always be serializable");

    let mut hasher = Sha256::new();
    hasher.update(index.to_le_bytes());
    hasher.update(timestamp.timestamp().to_le_bytes());
    hasher.update(timestamp.timestamp_subsec_nanos().to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&payload_json);

    hex::encode(hasher.finalize())
}

/// Verify the integrity of a hash chain.
///
/// A chain is valid when all three rules hold for every record:
///
/// 1. **Index contiguity** — record i carries index i, starting at 0.
/// 2. **Prev-hash linkage** — each record's `prev_hash` equals the `hash` of
///    the preceding record (or `GENESIS_HASH` for record 0).
/// 3. **Hash correctness** — each record's `hash` matches the value
///    recomputed from its own fields.
///
/// Returns `VigilError::Integrity` identifying the first offending record.
/// An empty chain is defined as valid (a ledger never produces one, but the
/// function is total).
pub fn verify_chain(records: &[EventRecord]) -> VigilResult<()> {
    let mut expected_prev = EventRecord::GENESIS_HASH.to_string();

    for (position, record) in records.iter().enumerate() {
        if record.index != position as u64 {
            return Err(VigilError::Integrity {
                index: record.index,
                reason: format!(
                    "record at position {} carries index {}",
                    position, record.index
                ),
            });
        }

        if record.prev_hash != expected_prev {
            return Err(VigilError::Integrity {
                index: record.index,
                reason: "prev_hash does not match the preceding record's hash".to_string(),
            });
        }

        let recomputed = hash_record(
            record.index,
            &record.timestamp,
            &record.payload,
            &record.prev_hash,
        );
        if record.hash != recomputed {
            return Err(VigilError::Integrity {
                index: record.index,
                reason: "stored hash does not match recomputed hash".to_string(),
            });
        }

        expected_prev = record.hash.clone();
    }

    Ok(())
}
