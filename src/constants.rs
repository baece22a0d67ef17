// --- File: constants.rs ---
// --- Global Simulation Constants ---

/// Number of distinct cell colors (species identities).
pub const MAX_COLORS: usize = 7;

pub const UNIVERSE_WIDTH: f32 = 1024.0;
pub const UNIVERSE_HEIGHT: f32 = 1024.0;
pub const MAX_CELLS: usize = 20_000;

// --- Default Parameters ---
pub const DEFAULT_CELL_MAX_AGE: i32 = 3_000;
pub const DEFAULT_BALANCER_INTERVAL: i32 = 1_000;
pub const DEFAULT_REPLICATION_RATE: f32 = 0.002;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 6;
pub const DEFAULT_CELL_ENERGY: f64 = 100.0;
pub const DEFAULT_PARTICLE_ENERGY: f64 = 10.0;

// --- Balancer ---
// A color is overrepresented/underrepresented once its ratio to the
// cross-color average leaves [1 / ADAPTION_RATIO, ADAPTION_RATIO].
pub const ADAPTION_RATIO: f64 = 1.3;
pub const ADAPTION_FACTOR: f64 = 1.1;
// Limits at or above this no longer grow. One last step may overshoot it.
pub const MAX_CELL_AGE: f64 = 300_000.0;
// Shrink floor, keeps every working max age positive.
pub const MIN_CELL_AGE: f64 = 1.0;
pub const MIN_REPLICATORS_UPPER_VALUE: f64 = 100.0;
pub const MIN_REPLICATORS_LOWER_VALUE: f64 = 20.0;

// --- Offspring Placement ---
pub const SPAWN_OFFSET_RADIUS: f32 = 3.0;

// --- End of File: constants.rs ---
