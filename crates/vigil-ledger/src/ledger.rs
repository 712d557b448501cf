//! The in-memory, append-only ledger.
//!
//! `Ledger` is a cheaply cloneable handle over a `Mutex`-guarded record
//! sequence — the explicitly owned replacement for keeping the chain in a
//! process-wide global. Hand clones to whichever components need to append
//! (the reconciler, request handlers) or read (audit endpoints).
//!
//! All appends serialize through the single internal mutex: index assignment,
//! prev-hash linkage, and subscriber notification happen inside one critical
//! section, so concurrent appenders can never mint two records claiming the
//! same index or prev-hash, and subscribers always see records in index
//! order.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use vigil_contracts::{
    error::{VigilError, VigilResult},
    record::EventRecord,
};
use vigil_core::traits::{EventLedger, EventSink};

use crate::chain::{hash_record, verify_chain};

// ── Internal mutable state ────────────────────────────────────────────────────

/// The mutable interior of a `Ledger`.
pub(crate) struct LedgerState {
    /// All records in append order, genesis first. Never empty.
    pub(crate) records: Vec<EventRecord>,

    /// Registered live subscribers, notified in registration order for each
    /// new record.
    sinks: Vec<Arc<dyn EventSink>>,
}

impl LedgerState {
    /// Build the next record, link it to the tail, push it, and notify sinks.
    ///
    /// Must only be called with the state lock held.
    fn append_value(&mut self, payload: serde_json::Value) -> EventRecord {
        let index = self.records.len() as u64;
        let prev_hash = self
            .records
            .last()
            .map(|record| record.hash.clone())
            .unwrap_or_else(|| EventRecord::GENESIS_HASH.to_string());

        let timestamp = Utc::now();
        let hash = hash_record(index, &timestamp, &payload, &prev_hash);

        let record = EventRecord {
            index,
            timestamp,
            payload,
            prev_hash,
            hash,
        };

        self.records.push(record.clone());

        for sink in &self.sinks {
            sink.on_record(&record);
        }

        record
    }
}

// ── Public handle ─────────────────────────────────────────────────────────────

/// An append-only, SHA-256 hash-chained event ledger.
///
/// Created once at process start; the genesis record is appended during
/// construction, so a ledger always holds at least one record. Records are
/// never mutated or removed.
///
/// # Thread safety
///
/// `Ledger` is `Clone`; all clones share the same chain. `append()` and
/// `chain()` acquire a `Mutex` internally, so handles can be used from any
/// number of threads without additional synchronization.
#[derive(Clone)]
pub struct Ledger {
    pub(crate) state: Arc<Mutex<LedgerState>>,
}

impl Ledger {
    /// Create a ledger seeded with its genesis record.
    pub fn new() -> Self {
        let mut state = LedgerState {
            records: Vec::new(),
            sinks: Vec::new(),
        };
        state.append_value(json!({ "event": "ledger-initialized" }));

        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Append one event to the chain and return the new record.
    ///
    /// The payload is first converted to canonical JSON; if that conversion
    /// fails the append is rejected with `VigilError::Serialization` and the
    /// chain is left in its prior valid state — no partial records.
    ///
    /// Atomic with respect to concurrent callers: the next index and the
    /// tail's hash are consumed under a single mutual-exclusion boundary.
    /// Registered sinks are notified before the call returns.
    pub fn append<T: Serialize>(&self, payload: &T) -> VigilResult<EventRecord> {
        let payload = serde_json::to_value(payload).map_err(|e| VigilError::Serialization {
            reason: e.to_string(),
        })?;

        let mut state = self.state.lock().map_err(|e| VigilError::LedgerWrite {
            reason: format!("ledger state lock poisoned: {}", e),
        })?;

        let record = state.append_value(payload);

        debug!(index = record.index, hash = %record.hash, "event appended");

        Ok(record)
    }

    /// Return a consistent snapshot of the full chain, genesis to tail.
    pub fn chain(&self) -> Vec<EventRecord> {
        let state = self.state.lock().expect("ledger state lock poisoned");
        state.records.clone()
    }

    /// Number of records in the chain, genesis included.
    pub fn len(&self) -> usize {
        let state = self.state.lock().expect("ledger state lock poisoned");
        state.records.len()
    }

    /// A ledger always holds its genesis record.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Verify that the chain has not been tampered with.
    ///
    /// Recomputes every record's hash and checks linkage over a snapshot of
    /// the chain. Intended for integrity audits and tests, not the append
    /// hot path.
    ///
    /// # Errors
    ///
    /// Returns `VigilError::Integrity` identifying the first bad index. An
    /// integrity failure is terminal for trust in the chain from that index
    /// onward — the ledger never attempts repair.
    pub fn verify(&self) -> VigilResult<()> {
        verify_chain(&self.chain())
    }

    /// Register a live subscriber.
    ///
    /// The sink is invoked once per record appended after registration, in
    /// append order, after the record is durably part of the sequence. Sinks
    /// run under the append lock: they must be fast and must not call back
    /// into the ledger.
    pub fn subscribe(&self, sink: Arc<dyn EventSink>) {
        let mut state = self.state.lock().expect("ledger state lock poisoned");
        state.sinks.push(sink);
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

// ── EventLedger impl ──────────────────────────────────────────────────────────

impl EventLedger for Ledger {
    /// Append one pre-built JSON payload to the chain.
    ///
    /// The seam the reconciler writes through; identical semantics to
    /// `Ledger::append`.
    fn append(&self, payload: &serde_json::Value) -> VigilResult<EventRecord> {
        Ledger::append(self, payload)
    }
}
