//! Capability trait definitions for the vigil core.
//!
//! These four traits define the complete boundary between the core and its
//! environment:
//!
//! - `VmObserver`   — supplies fleet snapshots (backed by a hypervisor CLI,
//!                    a cloud API, or a simulation)
//! - `VmController` — issues state-changing commands to individual VMs
//! - `EventLedger`  — the append-only audit sink every outcome is written to
//! - `EventSink`    — the push interface for live subscribers to new records
//!
//! The reconciler consumes the first three via dependency injection and
//! never learns which concrete implementation it is talking to. Shelling out
//! to a hypervisor CLI, calling a cloud API, and driving an in-process
//! simulation are all interchangeable behind `VmObserver` and `VmController`.

use vigil_contracts::{
    error::VigilResult,
    record::EventRecord,
    vm::{VmId, VmObservation},
};

/// A source of fleet state snapshots.
///
/// Implementations may have real-world latency (process invocation, network
/// calls); the reconciler calls `observe()` at most once per cycle and treats
/// any error as a whole-cycle failure — it records the failure and skips
/// corrective action rather than crashing the loop.
pub trait VmObserver: Send + Sync {
    /// Return the current run state of every known VM, in a stable order.
    ///
    /// The returned order is the order the reconciler will process VMs in.
    ///
    /// # Errors
    ///
    /// Returns `VigilError::Observation` when the fleet cannot be inspected
    /// (command failure, timeout, unreachable API).
    fn observe(&self) -> VigilResult<VmObservation>;
}

/// A command channel to individual VMs.
///
/// Implementations must treat each command independently — the reconciler
/// relies on one VM's failure not affecting commands to other VMs.
pub trait VmController: Send + Sync {
    /// Start the given VM.
    ///
    /// # Errors
    ///
    /// Returns `VigilError::Control` carrying the VM id and the underlying
    /// failure reason. The result is always awaited and recorded; there is
    /// no fire-and-forget path.
    fn start(&self, vm: &VmId) -> VigilResult<()>;
}

/// The appending seam to the event ledger.
///
/// Implemented by `vigil_ledger::Ledger`. The reconciler writes one record
/// per corrective action (success or failure) plus one record per failed
/// cycle, and never reads the chain back.
pub trait EventLedger: Send + Sync {
    /// Append one event payload to the ledger and return the new record.
    ///
    /// # Errors
    ///
    /// Returns `VigilError::Serialization` if the payload cannot be hashed,
    /// or `VigilError::LedgerWrite` if the ledger's state is unusable. In
    /// both cases the chain is unchanged.
    fn append(&self, payload: &serde_json::Value) -> VigilResult<EventRecord>;
}

/// A live subscriber to newly appended ledger records.
///
/// Sinks are invoked once per record, in append order, after the record is
/// part of the chain. Implementations must be fast and must not call back
/// into the ledger — the transport fan-out (socket broadcast, channel send)
/// belongs outside the core.
pub trait EventSink: Send + Sync {
    /// Called with each newly appended record.
    fn on_record(&self, record: &EventRecord);
}
