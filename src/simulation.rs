// --- File: simulation.rs ---
// Headless stand-in for the simulation proper: aging, death and
// replication only, no forces. Enough to close the balancer's control loop.
use crate::config::SimulationParameters;
use crate::constants::*;
use crate::entities::*;
use crate::error::ConstructionError;
use crate::statistics::{StatisticsFeed, TimestepStatistics};
use crate::store::{ParameterStore, SharedParameters};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

pub type SimRng = StdRng;

pub struct SimulationState {
    context: UnitContext,
    parameters: SharedParameters,
    factory: StandardEntityFactory,
    rng: SimRng,
    timestep: u64,
    is_paused: bool,
    statistics: TimestepStatistics,
    initial_cells_per_color: usize,
    at_capacity: bool,
    // Buffers reused across ticks
    removal_buffer: Vec<CellKey>,
    offspring_buffer: Vec<CellDescription>,
}

impl SimulationState {
    pub fn new(parameters: SharedParameters, seed: u64) -> Self {
        Self {
            context: UnitContext::new(Vec2::new(UNIVERSE_WIDTH, UNIVERSE_HEIGHT)),
            parameters,
            factory: StandardEntityFactory,
            rng: SimRng::seed_from_u64(seed),
            timestep: 0,
            is_paused: false,
            statistics: TimestepStatistics::default(),
            initial_cells_per_color: 0,
            at_capacity: false,
            removal_buffer: Vec::new(),
            offspring_buffer: Vec::new(),
        }
    }

    /// Scatters `cells_per_color` self-replicating single-cell clusters of
    /// every color, with ages spread over their lifespan.
    pub fn seed_population(&mut self, cells_per_color: usize) {
        self.initial_cells_per_color = cells_per_color;
        let parameters = self.parameters.snapshot();
        let size = self.context.size();
        for color in 0..MAX_COLORS {
            let max_age = parameters.cell_max_age[color].max(1) as u32;
            for _ in 0..cells_per_color {
                let pos = Vec2::new(
                    self.rng.gen_range(0.0..size.x),
                    self.rng.gen_range(0.0..size.y),
                );
                let mut desc = CellDescription::new(0, pos)
                    .with_color(color as u8)
                    .with_genome(vec![color as u8; 8]);
                desc.age = self.rng.gen_range(0..max_age);
                if let Err(err) = self.spawn_cell(&desc) {
                    log::warn!("Failed to seed cell: {}", err);
                }
            }
        }
        self.statistics = self.count_statistics();
    }

    fn spawn_cell(&mut self, desc: &CellDescription) -> Result<CellKey, ConstructionError> {
        let cluster = self
            .factory
            .build_cluster(&ClusterDescription::new(desc.id, desc.pos), &mut self.context)?;
        let cell = self.factory.build_cell(desc, &mut self.context)?;
        let cluster = self.context.insert_cluster(cluster);
        let cell = self.context.insert_cell(cell);
        self.context.attach_to_cluster(cell, cluster);
        Ok(cell)
    }

    pub fn update(&mut self) {
        if self.is_paused {
            return;
        }
        self.timestep += 1;
        let parameters = self.parameters.snapshot();
        let population = self.context.cells().len();
        let mut skipped_offspring = 0usize;

        self.removal_buffer.clear();
        self.offspring_buffer.clear();

        // --- Aging & Replication ---
        for (key, cell) in self.context.cells_mut() {
            let color = cell.color as usize;
            let (Some(&max_age), Some(&rate)) = (
                parameters.cell_max_age.get(color),
                parameters.cell_replication_rate.get(color),
            ) else {
                continue;
            };

            cell.age = cell.age.saturating_add(1);
            if i64::from(cell.age) > i64::from(max_age) {
                self.removal_buffer.push(key);
                continue;
            }

            if cell.is_self_replicator()
                && rate > 0.0
                && self.rng.gen_bool(rate.clamp(0.0, 1.0) as f64)
            {
                let potential_next_count =
                    population - self.removal_buffer.len() + self.offspring_buffer.len() + 1;
                if potential_next_count <= MAX_CELLS {
                    let offset = Vec2::from_angle(self.rng.gen_range(0.0..TAU)) * SPAWN_OFFSET_RADIUS;
                    self.offspring_buffer.push(
                        CellDescription::new(cell.id, cell.pos + offset)
                            .with_color(cell.color)
                            .with_genome(cell.genome.clone()),
                    );
                } else {
                    skipped_offspring += 1;
                }
            }
        }

        if skipped_offspring > 0 && !self.at_capacity {
            log::warn!(
                "Cell cap of {} reached at tick {}; {} offspring skipped",
                MAX_CELLS,
                self.timestep,
                skipped_offspring
            );
        }
        self.at_capacity = skipped_offspring > 0;

        // --- Apply Removals and Additions ---
        for &key in &self.removal_buffer {
            self.context.remove_cell(key);
        }
        let offspring = std::mem::take(&mut self.offspring_buffer);
        for desc in &offspring {
            if let Err(err) = self.spawn_cell(desc) {
                log::warn!("Failed to spawn offspring of cell {}: {}", desc.id, err);
            }
        }
        self.offspring_buffer = offspring;

        self.statistics = self.count_statistics();
    }

    fn count_statistics(&self) -> TimestepStatistics {
        let mut statistics = TimestepStatistics {
            num_particles: self.context.particles().len() as u64,
            ..Default::default()
        };
        for cell in self.context.cells().values() {
            let color = cell.color as usize;
            if let Some(count) = statistics.num_cells.get_mut(color) {
                *count += 1;
            }
            if cell.is_self_replicator() {
                if let Some(count) = statistics.num_self_replicators.get_mut(color) {
                    *count += 1;
                }
            }
        }
        statistics
    }

    pub fn toggle_pause(&mut self) {
        self.is_paused = !self.is_paused;
        log::info!(
            "Simulation {}",
            if self.is_paused { "paused" } else { "resumed" }
        );
    }

    pub fn restart(&mut self, seed: u64) {
        log::info!("Restarting simulation with seed {}", seed);
        self.rng = SimRng::seed_from_u64(seed);
        self.context.clear();
        self.timestep = 0;
        self.is_paused = false;
        self.at_capacity = false;
        self.removal_buffer.clear();
        self.offspring_buffer.clear();
        self.seed_population(self.initial_cells_per_color);
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn context(&self) -> &UnitContext {
        &self.context
    }

    /// Edits go through here, between ticks.
    pub fn context_mut(&mut self) -> &mut UnitContext {
        &mut self.context
    }

    pub fn shared_parameters(&self) -> &SharedParameters {
        &self.parameters
    }
}

impl ParameterStore for SimulationState {
    fn simulation_parameters(&self) -> SimulationParameters {
        self.parameters.simulation_parameters()
    }

    fn set_simulation_parameters(&mut self, parameters: SimulationParameters) {
        self.parameters.replace(parameters);
    }
}

impl StatisticsFeed for SimulationState {
    fn statistics(&self) -> TimestepStatistics {
        self.statistics
    }

    fn current_timestep(&self) -> u64 {
        self.timestep
    }
}

// --- End of File: simulation.rs ---
