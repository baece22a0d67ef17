// --- File: config.rs ---
use crate::constants::*;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// User-editable simulation configuration.
///
/// Always read and written as a whole snapshot through a
/// [`ParameterStore`](crate::store::ParameterStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    /// Aging limit per color, in ticks. Driven by the balancer when enabled.
    pub cell_max_age: [i32; MAX_COLORS],
    pub cell_max_age_balancer: bool,
    /// Ticks between balancer decisions. Non-positive disables decisions.
    pub cell_max_age_balancer_interval: i32,
    /// Per-tick probability that a self-replicating cell spawns offspring.
    pub cell_replication_rate: [f32; MAX_COLORS],
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            cell_max_age: [DEFAULT_CELL_MAX_AGE; MAX_COLORS],
            cell_max_age_balancer: false,
            cell_max_age_balancer_interval: DEFAULT_BALANCER_INTERVAL,
            cell_replication_rate: [DEFAULT_REPLICATION_RATE; MAX_COLORS],
        }
    }
}

impl SimulationParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters with the balancer switched on at the given interval.
    pub fn with_balancer(mut self, interval: i32) -> Self {
        self.cell_max_age_balancer = true;
        self.cell_max_age_balancer_interval = interval;
        self
    }

    pub fn with_cell_max_age(mut self, cell_max_age: [i32; MAX_COLORS]) -> Self {
        self.cell_max_age = cell_max_age;
        self
    }

    pub fn with_replication_rate(mut self, rates: [f32; MAX_COLORS]) -> Self {
        self.cell_replication_rate = rates;
        self
    }

    /// Loads parameters from a JSON file. Missing fields fall back to defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}

// --- End of File: config.rs ---
