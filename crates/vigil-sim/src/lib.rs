//! # vigil-sim
//!
//! In-process hypervisor simulation for the vigil fleet warden.
//!
//! `SimHypervisor` stands in for a real hypervisor behind the `VmObserver`
//! and `VmController` capability traits: VMs are rows in a mutex-guarded
//! table, crashes are flag flips, and start failures can be injected per VM.
//! The `scenarios` module scripts whole runs (fleet setup, crashes,
//! reconciliation) against a real ledger.
//!
//! No external systems are contacted. Production deployments replace this
//! crate with an observer/controller backed by their hypervisor CLI or cloud
//! API.

pub mod hypervisor;
pub mod scenarios;

pub use hypervisor::SimHypervisor;
