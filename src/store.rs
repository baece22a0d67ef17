//! Whole-snapshot access to the simulation parameters.

use crate::config::SimulationParameters;
use std::sync::{Arc, RwLock};

/// Authoritative, user-editable simulation configuration.
pub trait ParameterStore {
    fn simulation_parameters(&self) -> SimulationParameters;

    /// Replaces the whole configuration in one step.
    fn set_simulation_parameters(&mut self, parameters: SimulationParameters);
}

/// Cloneable handle to a parameter snapshot shared between the tick loop and
/// editors.
///
/// Writers swap the entire snapshot under the lock, so a reader sees either
/// the previous or the next configuration, never a mix of both.
#[derive(Debug, Clone, Default)]
pub struct SharedParameters {
    current: Arc<RwLock<Arc<SimulationParameters>>>,
}

impl SharedParameters {
    pub fn new(parameters: SimulationParameters) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(parameters))),
        }
    }

    /// Cheap read of the current snapshot.
    pub fn snapshot(&self) -> Arc<SimulationParameters> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    pub fn replace(&self, parameters: SimulationParameters) {
        let next = Arc::new(parameters);
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = next;
    }
}

impl ParameterStore for SharedParameters {
    fn simulation_parameters(&self) -> SimulationParameters {
        (*self.snapshot()).clone()
    }

    fn set_simulation_parameters(&mut self, parameters: SimulationParameters) {
        self.replace(parameters);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_COLORS;

    #[test]
    fn clones_observe_the_same_snapshot() {
        let mut store = SharedParameters::new(SimulationParameters::default());
        let reader = store.clone();
        let before = reader.snapshot();

        store.set_simulation_parameters(
            SimulationParameters::default().with_cell_max_age([42; MAX_COLORS]),
        );

        assert_eq!(reader.simulation_parameters().cell_max_age, [42; MAX_COLORS]);
        // A snapshot taken earlier is untouched by the swap.
        assert_ne!(before.cell_max_age, [42; MAX_COLORS]);
    }
}
