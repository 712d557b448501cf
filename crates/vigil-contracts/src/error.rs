//! Runtime error types for the vigil core.
//!
//! All fallible operations in the ledger and reconciler return
//! `VigilResult<T>`. Error variants carry enough context to produce
//! actionable ledger entries and log lines.

use thiserror::Error;

use crate::vm::VmId;

/// The unified error type for the vigil runtime.
#[derive(Debug, Error)]
pub enum VigilError {
    /// An append payload could not be converted to canonical JSON.
    ///
    /// The append is rejected and the chain is left in its prior valid state.
    #[error("payload serialization failed: {reason}")]
    Serialization { reason: String },

    /// The VM observer could not produce a fleet snapshot.
    ///
    /// The reconciler records the failure and skips the cycle's corrective
    /// phase — it never terminates the loop.
    #[error("vm observation failed: {reason}")]
    Observation { reason: String },

    /// A corrective command against a specific VM failed.
    ///
    /// Recorded in the ledger; remaining VMs in the cycle are still processed.
    #[error("control command for vm '{vm}' failed: {reason}")]
    Control { vm: VmId, reason: String },

    /// Chain verification found a broken link or hash mismatch.
    ///
    /// Terminal for trust in the chain from `index` onward. Never
    /// auto-repaired — the chain is append-only evidence.
    #[error("chain integrity violation at index {index}: {reason}")]
    Integrity { index: u64, reason: String },

    /// The ledger's internal state is unusable (poisoned lock).
    #[error("ledger write failed: {reason}")]
    LedgerWrite { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    Config { reason: String },
}

/// Convenience alias used throughout the vigil crates.
pub type VigilResult<T> = Result<T, VigilError>;
