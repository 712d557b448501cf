//! # vigil-ledger
//!
//! Tamper-evident, append-only, SHA-256 hash-chained event ledger for the
//! vigil fleet warden.
//!
//! ## Overview
//!
//! Every state-changing operation on the fleet is recorded as an
//! `EventRecord` that links to the previous record via its SHA-256 hash.
//! Tampering with any record — even a single byte — breaks the chain and is
//! detected by `verify_chain`. The chain is the durable source of truth for
//! "what happened"; live subscribers receive each record as it is appended.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vigil_ledger::Ledger;
//!
//! let ledger = Ledger::new();
//! ledger.append(&serde_json::json!({ "vm": "web-01", "status": "created" }))?;
//!
//! assert!(ledger.verify().is_ok());
//! let chain = ledger.chain();
//! ```

pub mod chain;
pub mod ledger;

pub use chain::{hash_record, verify_chain};
pub use ledger::Ledger;

// ── Tests ─────────────────────────────────────────────────────────────────────
