//! vigil fleet warden — Demo CLI
//!
//! Drives the simulated fleet through crash-and-recovery runs using real
//! vigil components (ledger, reconciler, periodic runner) and prints the
//! resulting hash chain with its integrity verdict.
//!
//! Usage:
//!   cargo run -p demo -- audit
//!   cargo run -p demo -- run
//!   cargo run -p demo -- run --interval-secs 2
//!   cargo run -p demo -- run --config warden.toml

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use vigil_contracts::{error::VigilResult, record::EventRecord};
use vigil_core::{
    reconciler::Reconciler, runner::ReconcilerRunner, traits::EventSink, ReconcilerConfig,
};
use vigil_ledger::Ledger;
use vigil_sim::{scenarios::crash_recovery, SimHypervisor};

// ── CLI definition ────────────────────────────────────────────────────────────

/// vigil — self-healing VM fleet warden demo.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "vigil fleet warden demo",
    long_about = "Runs the vigil crash-recovery simulation, showing the reconciliation\n\
                  loop repairing a degraded fleet while every action lands in the\n\
                  tamper-evident event ledger."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the scripted crash-recovery scenario and dump the audited chain.
    Audit,
    /// Run a live fleet with the periodic reconciler for a few cycles.
    Run {
        /// Seconds between reconciliation cycles.
        #[arg(long, default_value_t = 1)]
        interval_secs: u64,

        /// Optional TOML config file; its interval overrides --interval-secs.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

// ── Live subscription sink ────────────────────────────────────────────────────

/// Prints each newly appended record as one JSON line.
///
/// Stands in for the socket broadcast a real deployment would push records
/// through.
struct StdoutSink;

impl EventSink for StdoutSink {
    fn on_record(&self, record: &EventRecord) {
        if let Ok(line) = serde_json::to_string(record) {
            println!("ledger >> {}", line);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::Audit => run_audit(),
        Command::Run {
            interval_secs,
            config,
        } => run_live(interval_secs, config),
    };

    match result {
        Ok(()) => {
            println!("Demo completed; chain integrity verified.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// Scripted scenario, then a full pretty-printed chain dump.
fn run_audit() -> VigilResult<()> {
    let ledger = Ledger::new();
    let summary = crash_recovery::run_scenario(&ledger)?;

    for (n, cycle) in summary.cycles.iter().enumerate() {
        println!(
            "cycle {} — observed {:?}, {} corrective action(s)",
            n + 1,
            cycle.observed,
            cycle.outcomes.len()
        );
    }
    println!();

    print_chain(&ledger)
}

/// Live fleet: the periodic runner heals crashes as they happen.
fn run_live(interval_secs: u64, config: Option<PathBuf>) -> VigilResult<()> {
    let interval = match config {
        Some(path) => ReconcilerConfig::from_file(&path)?.interval(),
        None => Duration::from_secs(interval_secs),
    };

    let ledger = Ledger::new();
    ledger.subscribe(Arc::new(StdoutSink));

    let hypervisor = Arc::new(SimHypervisor::new());
    for name in crash_recovery::FLEET {
        hypervisor.define(name);
        ledger.append(&json!({ "vm": name, "status": "created" }))?;
    }

    let reconciler = Reconciler::new(
        hypervisor.clone(),
        hypervisor.clone(),
        Arc::new(ledger.clone()),
    );
    let handle = ReconcilerRunner::spawn(reconciler, interval);

    println!("crashing web-02 ...");
    hypervisor.crash("web-02");
    std::thread::sleep(interval * 2);

    println!("crashing db-01 ...");
    hypervisor.crash("db-01");
    std::thread::sleep(interval * 2);

    handle.shutdown();

    println!();
    print_chain(&ledger)
}

// ── Output helpers ────────────────────────────────────────────────────────────

fn print_chain(ledger: &Ledger) -> VigilResult<()> {
    let chain = ledger.chain();
    println!("event chain ({} records):", chain.len());
    for record in &chain {
        println!(
            "  [{}] {} {}",
            record.index,
            &record.hash[..12],
            record.payload
        );
    }

    ledger.verify()?;
    println!();
    println!("verify: chain intact, {} records", chain.len());
    Ok(())
}

fn print_banner() {
    println!();
    println!("vigil — Self-healing VM Fleet Warden");
    println!("====================================");
    println!();
    println!("Each reconciliation cycle:");
    println!("  [1] Observe the fleet's run states");
    println!("  [2] Every shut-off VM is drift — issue a start command");
    println!("  [3] Record each outcome in the SHA-256 hash-chained ledger");
    println!("  [4] Push the new records to live subscribers");
    println!();
}
