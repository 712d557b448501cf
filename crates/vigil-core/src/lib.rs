//! # vigil-core
//!
//! The self-healing reconciliation loop for the vigil fleet warden.
//!
//! This crate provides:
//! - The four capability traits (`VmObserver`, `VmController`, `EventLedger`,
//!   `EventSink`) that form the seam between the core and the outside world
//! - The `Reconciler` that diffs observed fleet state against "should be
//!   running" and issues corrective commands
//! - The periodic `ReconcilerRunner` that drives cycles on a fixed interval
//!   with clean shutdown
//! - `ReconcilerConfig`, the TOML-driven loop configuration
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vigil_core::{Reconciler, ReconcilerRunner, traits::{VmObserver, VmController}};
//! ```

pub mod config;
pub mod reconciler;
pub mod runner;
pub mod traits;

pub use config::ReconcilerConfig;
pub use reconciler::{CycleReport, Reconciler};
pub use runner::{ReconcilerRunner, RunnerHandle};
