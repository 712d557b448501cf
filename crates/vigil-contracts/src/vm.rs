//! VM identity and observation types.
//!
//! A `VmObservation` is the read-only fleet snapshot the reconciler consumes
//! each cycle. It is produced fresh by a `VmObserver` implementation and is
//! never owned or cached by the core.

use serde::{Deserialize, Serialize};

/// Stable identifier for a managed VM — the hypervisor domain name.
///
/// Example: `VmId("web-01")`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VmId(pub String);

impl VmId {
    /// Construct a VM id from any string-like value.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl std::fmt::Display for VmId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The run state of a VM as last observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VmRunState {
    /// The domain is up.
    Running,
    /// The domain is down. The reconciler treats this as unhealthy whether
    /// the VM crashed or was deliberately stopped — the two are
    /// indistinguishable in this model.
    ShutOff,
    /// The observer could not classify the state (paused, crashed, garbled
    /// output). No corrective action is taken.
    Unknown,
}

impl VmRunState {
    /// Map a hypervisor CLI state string to a run state.
    ///
    /// Intended for observer implementations that shell out to a domain-state
    /// command: `"running"` and `"shut off"` (surrounding whitespace ignored)
    /// map to their variants, anything else to `Unknown`.
    pub fn parse_cli_state(raw: &str) -> Self {
        match raw.trim() {
            "running" => Self::Running,
            "shut off" => Self::ShutOff,
            _ => Self::Unknown,
        }
    }
}

/// One VM's entry in a fleet snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmStatus {
    /// Which VM this entry describes.
    pub id: VmId,
    /// Its run state at observation time.
    pub state: VmRunState,
}

/// An ordered snapshot of the fleet's run states.
///
/// Order is exactly as the observer reported it; the reconciler processes
/// VMs in this order with no reordering or prioritization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmObservation {
    /// All known VMs in observer order.
    pub vms: Vec<VmStatus>,
}

impl VmObservation {
    /// Number of VMs in the snapshot.
    pub fn len(&self) -> usize {
        self.vms.len()
    }

    /// True if the observer reported no VMs at all.
    pub fn is_empty(&self) -> bool {
        self.vms.is_empty()
    }
}
