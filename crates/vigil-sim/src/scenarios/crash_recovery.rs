//! Scenario: crash recovery with a partial failure.
//!
//! A three-VM fleet is created (each creation recorded through the ledger's
//! public append API, the same path external request handlers use), two VMs
//! crash, and the reconciler runs two cycles:
//!
//! - Cycle 1: `web-02` restarts cleanly; `db-01`'s start command is refused
//!   by the hypervisor. Both outcomes are recorded.
//! - Cycle 2: the refusal clears and `db-01` recovers.
//!
//! The resulting chain carries the full story — creations, the failed
//! restart, both successful restarts — and still verifies.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use vigil_contracts::error::VigilResult;
use vigil_core::reconciler::{CycleReport, Reconciler};
use vigil_ledger::Ledger;

use crate::hypervisor::SimHypervisor;

/// The VMs the scenario defines, in fleet order.
pub const FLEET: [&str; 3] = ["web-01", "web-02", "db-01"];

/// What the scenario did, for callers that want to inspect or print it.
pub struct ScenarioSummary {
    /// The per-cycle reports, in execution order.
    pub cycles: Vec<CycleReport>,
}

/// Run the scenario against the given ledger.
///
/// The caller owns the ledger so it can register subscribers before the
/// scenario starts appending. Returns the cycle reports; the ledger holds
/// the durable record.
pub fn run_scenario(ledger: &Ledger) -> VigilResult<ScenarioSummary> {
    let hypervisor = Arc::new(SimHypervisor::new());

    for name in FLEET {
        hypervisor.define(name);
        ledger.append(&json!({ "vm": name, "status": "created" }))?;
    }

    hypervisor.crash("web-02");
    hypervisor.crash("db-01");
    hypervisor.set_start_failure("db-01", true);
    info!("fleet degraded: web-02 and db-01 shut off, db-01 refusing starts");

    let reconciler = Reconciler::new(
        hypervisor.clone(),
        hypervisor.clone(),
        Arc::new(ledger.clone()),
    );

    let first = reconciler.run_cycle();

    hypervisor.set_start_failure("db-01", false);
    let second = reconciler.run_cycle();

    ledger.verify()?;

    Ok(ScenarioSummary {
        cycles: vec![first, second],
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use vigil_contracts::outcome::OutcomeStatus;
    use vigil_ledger::Ledger;

    use super::run_scenario;

    #[test]
    fn scenario_heals_the_fleet_and_the_chain_verifies() {
        let ledger = Ledger::new();
        let summary = run_scenario(&ledger).unwrap();

        // Cycle 1: web-02 restarted, db-01 refused.
        let first = &summary.cycles[0];
        assert_eq!(first.outcomes.len(), 2);
        assert_eq!(first.outcomes[0].vm.0, "web-02");
        assert_eq!(first.outcomes[0].status, OutcomeStatus::Restarted);
        assert_eq!(first.outcomes[1].vm.0, "db-01");
        assert_eq!(first.outcomes[1].status, OutcomeStatus::RestartFailed);

        // Cycle 2: db-01 recovers.
        let second = &summary.cycles[1];
        assert_eq!(second.outcomes.len(), 1);
        assert_eq!(second.outcomes[0].vm.0, "db-01");
        assert_eq!(second.outcomes[0].status, OutcomeStatus::Restarted);

        // Chain: genesis + 3 creations + 2 outcomes + 1 outcome.
        let chain = ledger.chain();
        assert_eq!(chain.len(), 7);
        assert!(ledger.verify().is_ok());

        let restarted = chain
            .iter()
            .filter(|r| r.payload["event"] == "vm-restarted")
            .count();
        let refused = chain
            .iter()
            .filter(|r| r.payload["event"] == "vm-restart-failed")
            .count();
        assert_eq!(restarted, 2);
        assert_eq!(refused, 1);
    }
}
