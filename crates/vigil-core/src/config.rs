//! TOML-driven reconciler configuration.
//!
//! The loop interval defaults to five minutes — the cadence the warden is
//! designed around. Deployments override it with a small TOML document:
//!
//! ```toml
//! interval_secs = 60
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use vigil_contracts::error::{VigilError, VigilResult};

fn default_interval_secs() -> u64 {
    300
}

/// Configuration for the periodic reconciliation loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Seconds between reconciliation cycles.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

impl ReconcilerConfig {
    /// Parse `s` as a TOML configuration document.
    ///
    /// Returns `VigilError::Config` if the TOML is malformed or does not
    /// match the expected schema.
    pub fn from_toml_str(s: &str) -> VigilResult<Self> {
        toml::from_str(s).map_err(|e| VigilError::Config {
            reason: format!("failed to parse reconciler TOML: {}", e),
        })
    }

    /// Read the file at `path` and parse it as TOML configuration.
    ///
    /// Returns `VigilError::Config` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> VigilResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| VigilError::Config {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The loop interval as a `Duration`.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
