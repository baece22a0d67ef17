//! Adaptive per-color aging limits.
//!
//! The balancer watches how many self-replicating cells each color fields and
//! nudges that color's cell max age so no color dies out or takes over.
//! Counts are averaged over a measurement window of
//! `cell_max_age_balancer_interval` ticks; at the end of each window every
//! active color outside the hysteresis band `[1 / ADAPTION_RATIO,
//! ADAPTION_RATIO]` around the cross-color average has its limit multiplied
//! or divided by `ADAPTION_FACTOR`.

use crate::config::SimulationParameters;
use crate::constants::*;
use crate::statistics::StatisticsFeed;
use crate::store::ParameterStore;

/// Balancer-relevant parameter values as of the previous tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ParameterSnapshot {
    cell_max_age: [i32; MAX_COLORS],
    balancer_enabled: bool,
}

impl ParameterSnapshot {
    fn of(parameters: &SimulationParameters) -> Self {
        Self {
            cell_max_age: parameters.cell_max_age,
            balancer_enabled: parameters.cell_max_age_balancer,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BalancerController {
    // Fractional working copy; the store only holds the rounded values.
    cell_max_age: [f64; MAX_COLORS],
    num_replicators: [u64; MAX_COLORS],
    num_measurements: u64,
    last_timestep: Option<u64>,
    last_state: Option<ParameterSnapshot>,
}

impl Default for BalancerController {
    fn default() -> Self {
        Self::new()
    }
}

impl BalancerController {
    pub fn new() -> Self {
        Self {
            cell_max_age: [f64::from(DEFAULT_CELL_MAX_AGE); MAX_COLORS],
            num_replicators: [0; MAX_COLORS],
            num_measurements: 0,
            last_timestep: None,
            last_state: None,
        }
    }

    /// Runs one balancer step. Call exactly once per simulation tick.
    pub fn process<S>(&mut self, sim: &mut S)
    where
        S: ParameterStore + StatisticsFeed,
    {
        let parameters = sim.simulation_parameters();
        if parameters.cell_max_age_balancer {
            self.initialize_if_necessary(&parameters, sim.current_timestep());
            self.do_adaption_if_necessary(sim, &parameters);
        }

        self.save_last_state(&sim.simulation_parameters());
    }

    pub fn cell_max_age(&self) -> &[f64; MAX_COLORS] {
        &self.cell_max_age
    }

    pub fn num_replicators(&self) -> &[u64; MAX_COLORS] {
        &self.num_replicators
    }

    pub fn num_measurements(&self) -> u64 {
        self.num_measurements
    }

    /// Tick at which the current measurement window began.
    pub fn window_start(&self) -> Option<u64> {
        self.last_timestep
    }

    fn initialize_if_necessary(&mut self, parameters: &SimulationParameters, now: u64) {
        if self.last_state == Some(ParameterSnapshot::of(parameters)) {
            return;
        }
        for (working, &limit) in self.cell_max_age.iter_mut().zip(&parameters.cell_max_age) {
            *working = f64::from(limit).max(MIN_CELL_AGE);
        }
        log::debug!(
            "Balancer (re)initialized at tick {} with cell max age {:?}",
            now,
            parameters.cell_max_age
        );
        self.start_new_measurement(now);
    }

    fn do_adaption_if_necessary<S>(&mut self, sim: &mut S, parameters: &SimulationParameters)
    where
        S: ParameterStore + StatisticsFeed,
    {
        let now = sim.current_timestep();
        if self.last_timestep.is_some_and(|start| now < start) {
            // Tick counter went backwards (simulation restarted).
            self.start_new_measurement(now);
        }
        let window_start = *self.last_timestep.get_or_insert(now);

        let statistics = sim.statistics();
        for (total, &count) in self
            .num_replicators
            .iter_mut()
            .zip(&statistics.num_self_replicators)
        {
            *total += count;
        }
        self.num_measurements += 1;

        let interval = parameters.cell_max_age_balancer_interval;
        if interval <= 0 || now - window_start < interval as u64 {
            return;
        }

        if self.adapt_cell_max_age() {
            let mut updated = sim.simulation_parameters();
            for (limit, &working) in updated.cell_max_age.iter_mut().zip(&self.cell_max_age) {
                *limit = working.round() as i32;
            }
            log::info!(
                "Balancer adjusted cell max age at tick {}: {:?}",
                now,
                updated.cell_max_age
            );
            sim.set_simulation_parameters(updated);
        }
        self.start_new_measurement(now);
    }

    /// Applies one adaption cycle to the working limits. Returns `false` when
    /// no color is populous enough to judge.
    fn adapt_cell_max_age(&mut self) -> bool {
        let measurements = self.num_measurements.max(1) as f64;
        let mut max_replicators = 0;
        let mut sum_replicators = 0u64;
        let mut colors = Vec::with_capacity(MAX_COLORS);
        for (color, &replicators) in self.num_replicators.iter().enumerate() {
            max_replicators = max_replicators.max(replicators);
            // Whole replicators per tick; a fractional excess does not count.
            if (replicators / self.num_measurements.max(1)) as f64 > MIN_REPLICATORS_LOWER_VALUE {
                sum_replicators += replicators;
                colors.push(color);
            }
        }
        log::debug!(
            "Balancer window closed: {} measurements, max replicators {}, active colors {:?}",
            self.num_measurements,
            max_replicators,
            colors
        );
        if colors.is_empty() {
            return false;
        }

        let average_replicators = (sum_replicators / colors.len() as u64) as f64;
        for color in colors {
            let replicators = self.num_replicators[color] as f64;
            let cell_max_age = &mut self.cell_max_age[color];
            if replicators / measurements > MIN_REPLICATORS_UPPER_VALUE
                && replicators / average_replicators > ADAPTION_RATIO
            {
                *cell_max_age = (*cell_max_age / ADAPTION_FACTOR).max(MIN_CELL_AGE);
            } else if *cell_max_age < MAX_CELL_AGE
                && average_replicators / replicators > ADAPTION_RATIO
            {
                *cell_max_age *= ADAPTION_FACTOR;
            }
        }
        true
    }

    fn start_new_measurement(&mut self, now: u64) {
        self.last_timestep = Some(now);
        self.num_replicators = [0; MAX_COLORS];
        self.num_measurements = 0;
    }

    fn save_last_state(&mut self, parameters: &SimulationParameters) {
        self.last_state = Some(ParameterSnapshot::of(parameters));
    }
}
