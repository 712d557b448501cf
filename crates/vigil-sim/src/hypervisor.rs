//! The simulated hypervisor.
//!
//! One `SimHypervisor` models a whole fleet. It implements both capability
//! traits, so a single `Arc<SimHypervisor>` serves as the reconciler's
//! observer and controller at once.

use std::sync::Mutex;

use tracing::debug;

use vigil_contracts::{
    error::{VigilError, VigilResult},
    vm::{VmId, VmObservation, VmRunState, VmStatus},
};
use vigil_core::traits::{VmController, VmObserver};

/// One VM's row in the simulated fleet table.
struct SimVm {
    id: VmId,
    state: VmRunState,
    /// When set, start commands against this VM fail.
    start_fails: bool,
}

/// An in-process fake fleet implementing `VmObserver` and `VmController`.
///
/// VMs are reported in definition order, which the reconciler relies on for
/// deterministic processing. All mutators take `&self`; the fleet table is
/// guarded by a `Mutex` so the simulation can be shared across threads with
/// the reconciler loop.
pub struct SimHypervisor {
    fleet: Mutex<Vec<SimVm>>,
}

impl SimHypervisor {
    /// Create an empty fleet.
    pub fn new() -> Self {
        Self {
            fleet: Mutex::new(Vec::new()),
        }
    }

    /// Register a new VM in the running state.
    pub fn define(&self, name: &str) {
        let mut fleet = self.fleet.lock().expect("sim fleet lock poisoned");
        fleet.push(SimVm {
            id: VmId::new(name),
            state: VmRunState::Running,
            start_fails: false,
        });
        debug!(vm = name, "sim vm defined");
    }

    /// Flip a VM to shut-off, as if it crashed or was stopped.
    ///
    /// Unknown names are ignored.
    pub fn crash(&self, name: &str) {
        let mut fleet = self.fleet.lock().expect("sim fleet lock poisoned");
        if let Some(vm) = fleet.iter_mut().find(|vm| vm.id.0 == name) {
            vm.state = VmRunState::ShutOff;
            debug!(vm = name, "sim vm crashed");
        }
    }

    /// Inject or clear a start failure for a VM.
    ///
    /// While set, `start()` against this VM returns a `Control` error and the
    /// VM stays shut off. Unknown names are ignored.
    pub fn set_start_failure(&self, name: &str, failing: bool) {
        let mut fleet = self.fleet.lock().expect("sim fleet lock poisoned");
        if let Some(vm) = fleet.iter_mut().find(|vm| vm.id.0 == name) {
            vm.start_fails = failing;
        }
    }

    /// The current state of one VM, if defined.
    pub fn state_of(&self, name: &str) -> Option<VmRunState> {
        let fleet = self.fleet.lock().expect("sim fleet lock poisoned");
        fleet.iter().find(|vm| vm.id.0 == name).map(|vm| vm.state)
    }
}

impl Default for SimHypervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl VmObserver for SimHypervisor {
    /// Snapshot the fleet in definition order.
    fn observe(&self) -> VigilResult<VmObservation> {
        let fleet = self.fleet.lock().map_err(|e| VigilError::Observation {
            reason: format!("sim fleet lock poisoned: {}", e),
        })?;

        Ok(VmObservation {
            vms: fleet
                .iter()
                .map(|vm| VmStatus {
                    id: vm.id.clone(),
                    state: vm.state,
                })
                .collect(),
        })
    }
}

impl VmController for SimHypervisor {
    /// Start a shut-off VM, honoring injected failures.
    fn start(&self, vm: &VmId) -> VigilResult<()> {
        let mut fleet = self.fleet.lock().map_err(|e| VigilError::Control {
            vm: vm.clone(),
            reason: format!("sim fleet lock poisoned: {}", e),
        })?;

        let Some(entry) = fleet.iter_mut().find(|entry| entry.id == *vm) else {
            return Err(VigilError::Control {
                vm: vm.clone(),
                reason: "unknown domain".to_string(),
            });
        };

        if entry.start_fails {
            return Err(VigilError::Control {
                vm: vm.clone(),
                reason: "domain start refused by hypervisor".to_string(),
            });
        }

        entry.state = VmRunState::Running;
        debug!(vm = %vm, "sim vm started");
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
