//! The reconciler: the self-healing diff-and-repair pass.
//!
//! Each cycle follows a fixed pipeline:
//!
//!   Observe → Diff (shut-off ⇒ unhealthy) → Start each unhealthy VM → Record
//!
//! The loop-safety invariant is absolute: `run_cycle()` never panics and
//! never returns control-flow errors to the scheduler. Observer failures are
//! recorded as a cycle-failure event; per-VM command failures are recorded as
//! restart-failed events and do not block the remaining VMs.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use vigil_contracts::{
    outcome::{CycleId, OutcomeStatus, ReconcileAction, ReconcileEvent, ReconcileOutcome},
    vm::{VmObservation, VmRunState},
};

use crate::traits::{EventLedger, VmController, VmObserver};

/// The transient summary of one reconciliation cycle.
///
/// Returned to the scheduler for logging; never stored. The durable audit
/// trail is the ledger records the cycle appended.
#[derive(Debug)]
pub struct CycleReport {
    /// The id stamped into every record this cycle appended.
    pub cycle: CycleId,
    /// How many VMs the observer reported, or `None` if observation failed.
    pub observed: Option<usize>,
    /// One outcome per VM a corrective command was issued for, in observer
    /// order. Empty for a healthy cycle.
    pub outcomes: Vec<ReconcileOutcome>,
    /// The observation failure reason, when the cycle's corrective phase was
    /// skipped entirely.
    pub failure: Option<String>,
}

/// The reconciliation pass over the fleet.
///
/// Construct one reconciler per fleet and drive it either manually via
/// `run_cycle()` or periodically via `ReconcilerRunner::spawn()`. All three
/// collaborators are injected as capability traits — the reconciler contains
/// no hypervisor-specific logic.
pub struct Reconciler {
    observer: Arc<dyn VmObserver>,
    controller: Arc<dyn VmController>,
    ledger: Arc<dyn EventLedger>,
}

impl Reconciler {
    /// Create a reconciler over the given capabilities.
    pub fn new(
        observer: Arc<dyn VmObserver>,
        controller: Arc<dyn VmController>,
        ledger: Arc<dyn EventLedger>,
    ) -> Self {
        Self {
            observer,
            controller,
            ledger,
        }
    }

    /// Run one full reconciliation cycle.
    ///
    /// # Pipeline
    ///
    /// 1. Mint a fresh `CycleId` and call `observer.observe()`. On failure,
    ///    append a single `cycle-failed` record and return — no corrective
    ///    commands are issued this cycle.
    /// 2. Walk the observation in observer order. Every `shut-off` VM is
    ///    unhealthy; `running` and `unknown` VMs are left untouched and
    ///    unrecorded. (A deliberately stopped VM is indistinguishable from a
    ///    crashed one in this model.)
    /// 3. For each unhealthy VM, issue `controller.start()`. A failure is
    ///    captured in that VM's outcome and the walk continues.
    /// 4. Append exactly one record per VM acted on — restarted or
    ///    restart-failed — so the chain is a complete audit trail. A cycle
    ///    with no unhealthy VMs appends nothing.
    ///
    /// Cycles are stateless: each is a fresh, full reconciliation with no
    /// memory of prior cycles (level-triggered, not edge-triggered).
    pub fn run_cycle(&self) -> CycleReport {
        let cycle = CycleId::new();

        debug!(cycle = %cycle.0, "reconciliation cycle starting");

        let observation = match self.observer.observe() {
            Ok(observation) => observation,
            Err(e) => {
                let reason = e.to_string();
                warn!(
                    cycle = %cycle.0,
                    reason = %reason,
                    "fleet observation failed, skipping corrective phase"
                );

                self.append_event(&ReconcileEvent::CycleFailed {
                    cycle: cycle.clone(),
                    reason: reason.clone(),
                });

                return CycleReport {
                    cycle,
                    observed: None,
                    outcomes: Vec::new(),
                    failure: Some(reason),
                };
            }
        };

        let outcomes = self.repair(&cycle, &observation);

        if outcomes.is_empty() {
            debug!(
                cycle = %cycle.0,
                observed = observation.len(),
                "fleet healthy, nothing to record"
            );
        } else {
            info!(
                cycle = %cycle.0,
                observed = observation.len(),
                repaired = outcomes
                    .iter()
                    .filter(|o| o.status == OutcomeStatus::Restarted)
                    .count(),
                failed = outcomes
                    .iter()
                    .filter(|o| o.status == OutcomeStatus::RestartFailed)
                    .count(),
                "reconciliation cycle complete"
            );
        }

        CycleReport {
            cycle,
            observed: Some(observation.len()),
            outcomes,
            failure: None,
        }
    }

    /// Issue a start command for every shut-off VM and record each outcome.
    ///
    /// VMs are processed strictly in observer order. Per-VM failures are
    /// isolated: a `Control` error becomes that VM's outcome and processing
    /// continues with the rest of the fleet.
    fn repair(&self, cycle: &CycleId, observation: &VmObservation) -> Vec<ReconcileOutcome> {
        let mut outcomes = Vec::new();

        for status in &observation.vms {
            match status.state {
                VmRunState::Running | VmRunState::Unknown => continue,
                VmRunState::ShutOff => {}
            }

            let outcome = match self.controller.start(&status.id) {
                Ok(()) => {
                    info!(cycle = %cycle.0, vm = %status.id, "restarted shut-off vm");
                    ReconcileOutcome {
                        vm: status.id.clone(),
                        action: ReconcileAction::Restart,
                        status: OutcomeStatus::Restarted,
                        reason: None,
                    }
                }
                Err(e) => {
                    let reason = e.to_string();
                    warn!(
                        cycle = %cycle.0,
                        vm = %status.id,
                        reason = %reason,
                        "restart command failed"
                    );
                    ReconcileOutcome {
                        vm: status.id.clone(),
                        action: ReconcileAction::Restart,
                        status: OutcomeStatus::RestartFailed,
                        reason: Some(reason),
                    }
                }
            };

            self.append_event(&outcome.to_event(cycle.clone()));
            outcomes.push(outcome);
        }

        outcomes
    }

    /// Append one typed event to the ledger, absorbing append failures.
    ///
    /// A broken ledger must not stop corrective work, so failures are logged
    /// at error level and the cycle continues.
    fn append_event(&self, event: &ReconcileEvent) {
        let payload = match serde_json::to_value(event) {
            Ok(payload) => payload,
            Err(e) => {
                error!(reason = %e, "reconcile event could not be serialized");
                return;
            }
        };

        if let Err(e) = self.ledger.append(&payload) {
            error!(reason = %e, "ledger append failed for reconcile event");
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
