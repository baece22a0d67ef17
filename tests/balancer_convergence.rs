use cellforge::balancer::BalancerController;
use cellforge::config::SimulationParameters;
use cellforge::constants::*;
use cellforge::statistics::{StatisticsFeed, TimestepStatistics};
use cellforge::store::ParameterStore;

const INTERVAL: i32 = 10;
const CYCLES: usize = 1_000;

/// Population model where each color's replicator count is proportional to
/// its current max age, with a per-color fitness factor.
struct ProportionalPopulation {
    parameters: SimulationParameters,
    fitness: [f64; MAX_COLORS],
    timestep: u64,
}

impl ProportionalPopulation {
    fn new(fitness: [f64; MAX_COLORS]) -> Self {
        Self {
            parameters: SimulationParameters::default().with_balancer(INTERVAL),
            fitness,
            timestep: 0,
        }
    }

    fn counts(&self) -> [u64; MAX_COLORS] {
        let mut counts = [0; MAX_COLORS];
        for (color, count) in counts.iter_mut().enumerate() {
            *count = (self.fitness[color] * f64::from(self.parameters.cell_max_age[color])) as u64;
        }
        counts
    }
}

impl ParameterStore for ProportionalPopulation {
    fn simulation_parameters(&self) -> SimulationParameters {
        self.parameters.clone()
    }

    fn set_simulation_parameters(&mut self, parameters: SimulationParameters) {
        self.parameters = parameters;
    }
}

impl StatisticsFeed for ProportionalPopulation {
    fn statistics(&self) -> TimestepStatistics {
        TimestepStatistics {
            num_self_replicators: self.counts(),
            ..Default::default()
        }
    }

    fn current_timestep(&self) -> u64 {
        self.timestep
    }
}

/// Runs the balancer for `CYCLES` windows and returns the stored max ages at
/// the end of each window.
fn run(population: &mut ProportionalPopulation) -> Vec<[i32; MAX_COLORS]> {
    let mut balancer = BalancerController::new();
    let mut history = Vec::with_capacity(CYCLES);
    for _ in 0..CYCLES {
        for _ in 0..INTERVAL {
            balancer.process(population);
            population.timestep += 1;
        }
        history.push(population.parameters.cell_max_age);
    }
    history
}

#[test]
fn active_colors_converge_into_the_hysteresis_band() {
    let mut population = ProportionalPopulation::new([0.05, 0.1, 0.2, 0.0, 0.002, 0.1, 0.1]);
    run(&mut population);

    let counts = population.counts();
    let active: Vec<f64> = counts
        .iter()
        .filter(|&&count| count as f64 > MIN_REPLICATORS_LOWER_VALUE)
        .map(|&count| count as f64)
        .collect();
    assert_eq!(active.len(), 5);
    let mean = active.iter().sum::<f64>() / active.len() as f64;
    for count in &active {
        let ratio = count / mean;
        assert!((0.75..=1.35).contains(&ratio), "ratio {ratio} out of band: {counts:?}");
    }

    // The weakest color got more time, the strongest less.
    let ages = population.parameters.cell_max_age;
    assert!(ages[0] > DEFAULT_CELL_MAX_AGE);
    assert!(ages[2] < DEFAULT_CELL_MAX_AGE);
}

#[test]
fn limits_settle_and_stay_in_range() {
    let mut population = ProportionalPopulation::new([0.05, 0.1, 0.2, 0.0, 0.002, 0.1, 0.1]);
    let history = run(&mut population);

    let last = history[history.len() - 1];
    for window in &history[history.len() - 100..] {
        assert_eq!(window, &last);
    }
    for window in &history {
        for &age in window {
            // Growth stops at the ceiling, at most one step past it.
            assert!(f64::from(age) >= MIN_CELL_AGE);
            assert!(f64::from(age) <= MAX_CELL_AGE * ADAPTION_FACTOR);
        }
    }
}

#[test]
fn sparse_colors_are_never_touched() {
    let mut population = ProportionalPopulation::new([0.05, 0.1, 0.2, 0.0, 0.002, 0.1, 0.1]);
    let history = run(&mut population);

    for window in &history {
        assert_eq!(window[3], DEFAULT_CELL_MAX_AGE);
        assert_eq!(window[4], DEFAULT_CELL_MAX_AGE);
    }
}

#[test]
fn uniform_population_is_left_alone() {
    let mut population = ProportionalPopulation::new([0.1; MAX_COLORS]);
    let history = run(&mut population);

    assert!(history.iter().all(|window| *window == [DEFAULT_CELL_MAX_AGE; MAX_COLORS]));
}
