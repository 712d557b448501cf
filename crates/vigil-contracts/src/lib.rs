//! # vigil-contracts
//!
//! Shared types and error contracts for the vigil fleet warden.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions and error types.

pub mod error;
pub mod outcome;
pub mod record;
pub mod vm;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use error::VigilError;
    use outcome::{CycleId, OutcomeStatus, ReconcileAction, ReconcileEvent, ReconcileOutcome};
    use record::EventRecord;
    use serde_json::json;
    use vm::{VmId, VmRunState};

    // ── VmRunState parsing ───────────────────────────────────────────────────

    #[test]
    fn run_state_parses_running() {
        assert_eq!(VmRunState::parse_cli_state("running"), VmRunState::Running);
        assert_eq!(VmRunState::parse_cli_state("running\n"), VmRunState::Running);
    }

    #[test]
    fn run_state_parses_shut_off() {
        assert_eq!(VmRunState::parse_cli_state("shut off"), VmRunState::ShutOff);
        assert_eq!(VmRunState::parse_cli_state("  shut off\n"), VmRunState::ShutOff);
    }

    #[test]
    fn run_state_anything_else_is_unknown() {
        assert_eq!(VmRunState::parse_cli_state("paused"), VmRunState::Unknown);
        assert_eq!(VmRunState::parse_cli_state("crashed"), VmRunState::Unknown);
        assert_eq!(VmRunState::parse_cli_state(""), VmRunState::Unknown);
    }

    // ── CycleId ──────────────────────────────────────────────────────────────

    #[test]
    fn cycle_id_new_produces_unique_values() {
        let ids: Vec<CycleId> = (0..100).map(|_| CycleId::new()).collect();

        let unique: std::collections::HashSet<String> =
            ids.iter().map(|id| id.0.to_string()).collect();
        assert_eq!(unique.len(), 100);
    }

    // ── ReconcileEvent serde ─────────────────────────────────────────────────

    #[test]
    fn restarted_event_round_trips() {
        let original = ReconcileEvent::VmRestarted {
            cycle: CycleId::new(),
            vm: VmId::new("web-01"),
        };
        let json = serde_json::to_string(&original).unwrap();
        let decoded: ReconcileEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn restart_failed_event_round_trips() {
        let original = ReconcileEvent::VmRestartFailed {
            cycle: CycleId::new(),
            vm: VmId::new("db-02"),
            reason: "domain is locked".to_string(),
        };
        let json = serde_json::to_string(&original).unwrap();
        let decoded: ReconcileEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn cycle_failed_event_round_trips() {
        let original = ReconcileEvent::CycleFailed {
            cycle: CycleId::new(),
            reason: "observer timed out".to_string(),
        };
        let json = serde_json::to_string(&original).unwrap();
        let decoded: ReconcileEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn event_tag_is_kebab_case() {
        let event = ReconcileEvent::VmRestarted {
            cycle: CycleId::new(),
            vm: VmId::new("web-01"),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["event"], "vm-restarted");
    }

    // ── ReconcileOutcome → ReconcileEvent ────────────────────────────────────

    #[test]
    fn successful_outcome_becomes_restarted_event() {
        let outcome = ReconcileOutcome {
            vm: VmId::new("web-01"),
            action: ReconcileAction::Restart,
            status: OutcomeStatus::Restarted,
            reason: None,
        };
        let cycle = CycleId::new();
        match outcome.to_event(cycle.clone()) {
            ReconcileEvent::VmRestarted { cycle: c, vm } => {
                assert_eq!(c, cycle);
                assert_eq!(vm, VmId::new("web-01"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn failed_outcome_becomes_restart_failed_event() {
        let outcome = ReconcileOutcome {
            vm: VmId::new("db-02"),
            action: ReconcileAction::Restart,
            status: OutcomeStatus::RestartFailed,
            reason: Some("no such domain".to_string()),
        };
        match outcome.to_event(CycleId::new()) {
            ReconcileEvent::VmRestartFailed { vm, reason, .. } => {
                assert_eq!(vm, VmId::new("db-02"));
                assert_eq!(reason, "no such domain");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    // ── EventRecord serde ────────────────────────────────────────────────────

    #[test]
    fn event_record_round_trips() {
        let record = EventRecord {
            index: 7,
            timestamp: Utc::now(),
            payload: json!({ "vm": "web-01", "status": "restarted" }),
            prev_hash: EventRecord::GENESIS_HASH.to_string(),
            hash: "ab".repeat(32),
        };
        let json = serde_json::to_string(&record).unwrap();
        let decoded: EventRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded.index, record.index);
        assert_eq!(decoded.timestamp, record.timestamp);
        assert_eq!(decoded.payload, record.payload);
        assert_eq!(decoded.prev_hash, record.prev_hash);
        assert_eq!(decoded.hash, record.hash);
    }

    #[test]
    fn genesis_hash_is_64_hex_zeros() {
        assert_eq!(EventRecord::GENESIS_HASH.len(), 64);
        assert!(EventRecord::GENESIS_HASH.chars().all(|c| c == '0'));
    }

    // ── VigilError display messages ──────────────────────────────────────────

    #[test]
    fn error_serialization_display() {
        let err = VigilError::Serialization {
            reason: "NaN is not a valid JSON number".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("payload serialization failed"));
        assert!(msg.contains("NaN"));
    }

    #[test]
    fn error_observation_display() {
        let err = VigilError::Observation {
            reason: "virsh list timed out".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("observation failed"));
        assert!(msg.contains("timed out"));
    }

    #[test]
    fn error_control_display() {
        let err = VigilError::Control {
            vm: VmId::new("web-01"),
            reason: "domain is locked".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("web-01"));
        assert!(msg.contains("domain is locked"));
    }

    #[test]
    fn error_integrity_display() {
        let err = VigilError::Integrity {
            index: 3,
            reason: "stored hash does not match recomputed hash".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("index 3"));
        assert!(msg.contains("recomputed"));
    }

    #[test]
    fn error_config_display() {
        let err = VigilError::Config {
            reason: "missing interval_secs".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("configuration error"));
        assert!(msg.contains("interval_secs"));
    }
}
