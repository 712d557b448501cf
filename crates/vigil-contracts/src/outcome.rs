//! Reconciliation cycle identity, outcomes, and ledger payload schema.
//!
//! `ReconcileOutcome` is the transient per-VM result of a corrective action;
//! `ReconcileEvent` is the typed payload the reconciler serializes into
//! ledger records. Both carry a `CycleId` so every record from the same
//! cycle can be correlated after the fact.

use serde::{Deserialize, Serialize};

use crate::vm::VmId;

/// Unique identifier for a single reconciliation cycle.
///
/// Minted at the start of each cycle and stamped into every ledger record
/// the cycle appends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CycleId(pub uuid::Uuid);

impl CycleId {
    /// Create a new, unique cycle ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for CycleId {
    fn default() -> Self {
        Self::new()
    }
}

/// The corrective action the reconciler took against a VM.
///
/// Only `Restart` exists today; an enum so future actions (resize, migrate)
/// extend the schema without breaking stored records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReconcileAction {
    Restart,
}

/// Whether a corrective action succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutcomeStatus {
    Restarted,
    RestartFailed,
}

/// The per-VM result of one corrective action within a cycle.
///
/// Transient — returned to the caller in the cycle report and converted to a
/// `ReconcileEvent` for the ledger; never stored directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    /// The VM acted on.
    pub vm: VmId,
    /// The action issued.
    pub action: ReconcileAction,
    /// Whether the action succeeded.
    pub status: OutcomeStatus,
    /// The controller's failure reason, present when `status` is
    /// `RestartFailed`.
    pub reason: Option<String>,
}

impl ReconcileOutcome {
    /// Convert this outcome into the ledger payload for the given cycle.
    pub fn to_event(&self, cycle: CycleId) -> ReconcileEvent {
        match self.status {
            OutcomeStatus::Restarted => ReconcileEvent::VmRestarted {
                cycle,
                vm: self.vm.clone(),
            },
            OutcomeStatus::RestartFailed => ReconcileEvent::VmRestartFailed {
                cycle,
                vm: self.vm.clone(),
                reason: self
                    .reason
                    .clone()
                    .unwrap_or_else(|| "unspecified failure".to_string()),
            },
        }
    }
}

/// The typed payloads the reconciler writes to the ledger.
///
/// Serialized with an `event` tag in kebab-case, e.g.
/// `{"event": "vm-restarted", "cycle": "...", "vm": "web-01"}`.
/// Non-reconciliation events (VM created, resized, …) are appended by
/// external callers as free-form JSON; the ledger does not constrain
/// payload shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ReconcileEvent {
    /// A shut-off VM was started successfully.
    VmRestarted { cycle: CycleId, vm: VmId },

    /// A shut-off VM's start command failed.
    VmRestartFailed {
        cycle: CycleId,
        vm: VmId,
        reason: String,
    },

    /// The observer itself failed; no corrective action was taken this cycle.
    CycleFailed { cycle: CycleId, reason: String },
}
