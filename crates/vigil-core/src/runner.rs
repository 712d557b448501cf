//! The periodic scheduler that drives reconciliation cycles.
//!
//! One dedicated thread runs the loop. The shutdown channel doubles as the
//! tick timer: the loop blocks in `recv_timeout(interval)` and runs a cycle
//! on each timeout. Because cycles execute inline on the loop thread, a
//! cycle that overruns the interval delays the next tick instead of
//! overlapping it — two cycles can never race corrective commands against
//! the same fleet.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::reconciler::Reconciler;

/// Spawns and owns the reconciliation loop thread.
pub struct ReconcilerRunner;

impl ReconcilerRunner {
    /// Start the loop, running one cycle every `interval`.
    ///
    /// The first cycle runs after one full interval, matching a cron-style
    /// schedule. Returns a handle used to stop the loop; if the handle is
    /// dropped without calling `shutdown()`, the loop stops at its next tick
    /// and the thread is detached.
    pub fn spawn(reconciler: Reconciler, interval: Duration) -> RunnerHandle {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let join = thread::Builder::new()
            .name("vigil-reconciler".to_string())
            .spawn(move || {
                info!(interval_secs = interval.as_secs(), "reconciler loop started");

                loop {
                    match shutdown_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            let report = reconciler.run_cycle();
                            debug!(
                                cycle = %report.cycle.0,
                                outcomes = report.outcomes.len(),
                                "cycle finished"
                            );
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                            info!("reconciler loop stopping");
                            break;
                        }
                    }
                }
            })
            .expect("spawning the reconciler thread cannot fail");

        RunnerHandle {
            shutdown_tx,
            join,
        }
    }
}

/// Handle to a running reconciliation loop.
pub struct RunnerHandle {
    shutdown_tx: mpsc::Sender<()>,
    join: JoinHandle<()>,
}

impl RunnerHandle {
    /// Stop the loop and wait for it to exit.
    ///
    /// No further cycles are scheduled after the signal; an in-flight cycle
    /// finishes normally before the thread exits, so no record is ever left
    /// half-written.
    pub fn shutdown(self) {
        // A send error means the loop already exited; joining is still safe.
        let _ = self.shutdown_tx.send(());

        if self.join.join().is_err() {
            warn!("reconciler thread panicked before shutdown");
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use std::time::Duration;

    use vigil_contracts::{
        error::VigilResult,
        record::EventRecord,
        vm::{VmId, VmObservation},
    };

    use crate::reconciler::Reconciler;
    use crate::traits::{EventLedger, VmController, VmObserver};

    use super::ReconcilerRunner;

    /// An observer that counts calls and reports an empty fleet.
    struct CountingObserver {
        calls: Arc<AtomicUsize>,
    }

    impl VmObserver for CountingObserver {
        fn observe(&self) -> VigilResult<VmObservation> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(VmObservation::default())
        }
    }

    struct NoopController;

    impl VmController for NoopController {
        fn start(&self, _vm: &VmId) -> VigilResult<()> {
            Ok(())
        }
    }

    struct NoopLedger;

    impl EventLedger for NoopLedger {
        fn append(&self, payload: &serde_json::Value) -> VigilResult<EventRecord> {
            Ok(EventRecord {
                index: 0,
                timestamp: chrono::Utc::now(),
                payload: payload.clone(),
                prev_hash: EventRecord::GENESIS_HASH.to_string(),
                hash: String::new(),
            })
        }
    }

    /// The loop runs cycles on the interval and stops cleanly on shutdown.
    #[test]
    fn runs_cycles_then_shuts_down() {
        let calls = Arc::new(AtomicUsize::new(0));
        let reconciler = Reconciler::new(
            Arc::new(CountingObserver { calls: calls.clone() }),
            Arc::new(NoopController),
            Arc::new(NoopLedger),
        );

        let handle = ReconcilerRunner::spawn(reconciler, Duration::from_millis(10));

        // Give the loop time for a few ticks.
        std::thread::sleep(Duration::from_millis(100));
        handle.shutdown();

        let observed = calls.load(Ordering::SeqCst);
        assert!(observed >= 2, "expected several cycles, got {observed}");

        // After shutdown no further cycles run.
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(calls.load(Ordering::SeqCst), observed);
    }

    /// Shutdown before the first tick stops the loop without running a cycle.
    #[test]
    fn immediate_shutdown_runs_no_cycle() {
        let calls = Arc::new(AtomicUsize::new(0));
        let reconciler = Reconciler::new(
            Arc::new(CountingObserver { calls: calls.clone() }),
            Arc::new(NoopController),
            Arc::new(NoopLedger),
        );

        let handle = ReconcilerRunner::spawn(reconciler, Duration::from_secs(3600));
        handle.shutdown();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
