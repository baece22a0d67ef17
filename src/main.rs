use cellforge::balancer::BalancerController;
use cellforge::config::SimulationParameters;
use cellforge::constants::*;
use cellforge::simulation::SimulationState;
use cellforge::statistics::StatisticsFeed;
use cellforge::store::SharedParameters;
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;

// --- Global Constants ---
// Colors replicate at different speeds so the balancer has something to do.
const REPLICATION_RATE_SPREAD: [f32; MAX_COLORS] = [0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0];
const INITIAL_CELLS_PER_COLOR: usize = 100;

#[derive(Parser, Debug)]
#[command(name = "cellforge")]
#[command(about = "Run a headless cell population under the max-age balancer")]
struct Args {
    /// Number of ticks to simulate
    #[arg(short, long, default_value = "20000")]
    ticks: u64,

    /// Random seed
    #[arg(short, long, default_value = "0")]
    seed: u64,

    /// Balancer measurement window in ticks (0 or less disables the balancer)
    #[arg(short, long)]
    interval: Option<i32>,

    /// JSON file with simulation parameters (overrides the built-in defaults)
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Log population and max ages every N ticks
    #[arg(long, default_value = "1000")]
    log_every: u64,

    /// Initial self-replicating cells per color
    #[arg(long, default_value_t = INITIAL_CELLS_PER_COLOR)]
    cells: usize,
}

fn initial_parameters(args: &Args) -> Result<SimulationParameters, Box<dyn std::error::Error>> {
    let parameters = match &args.params {
        Some(path) => {
            log::info!("Loading simulation parameters from {}", path.display());
            SimulationParameters::from_json_file(path)?
        }
        None => {
            let mut rates = [0.0; MAX_COLORS];
            for (rate, spread) in rates.iter_mut().zip(REPLICATION_RATE_SPREAD) {
                *rate = DEFAULT_REPLICATION_RATE * spread;
            }
            SimulationParameters::new()
                .with_replication_rate(rates)
                .with_balancer(DEFAULT_BALANCER_INTERVAL)
        }
    };
    Ok(match args.interval {
        Some(interval) if interval > 0 => parameters.with_balancer(interval),
        Some(interval) => SimulationParameters {
            cell_max_age_balancer: false,
            cell_max_age_balancer_interval: interval,
            ..parameters
        },
        None => parameters,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let parameters = SharedParameters::new(initial_parameters(&args)?);
    let mut simulation_state = SimulationState::new(parameters.clone(), args.seed);
    simulation_state.seed_population(args.cells);
    let mut balancer = BalancerController::new();

    let snapshot = parameters.snapshot();
    log::info!(
        "Running {} ticks (seed {}, balancer {}, interval {})",
        args.ticks,
        args.seed,
        if snapshot.cell_max_age_balancer { "on" } else { "off" },
        snapshot.cell_max_age_balancer_interval
    );
    let started = Instant::now();
    for _ in 0..args.ticks {
        simulation_state.update();
        balancer.process(&mut simulation_state);

        let timestep = simulation_state.current_timestep();
        if args.log_every > 0 && timestep % args.log_every == 0 {
            let statistics = simulation_state.statistics();
            log::info!(
                "tick {:>8} | cells {:>6} per color {:?} | particles {} | replicators {:?} | max age {:?}",
                timestep,
                statistics.total_cells(),
                statistics.num_cells,
                statistics.num_particles,
                statistics.num_self_replicators,
                parameters.snapshot().cell_max_age
            );
        }
        if simulation_state.context().cells().is_empty() {
            log::warn!("Population died out at tick {}", timestep);
            break;
        }
    }

    let statistics = simulation_state.statistics();
    println!(
        "Finished {} ticks in {:.2}s",
        simulation_state.current_timestep(),
        started.elapsed().as_secs_f64()
    );
    println!("Cells per color:            {:?}", statistics.num_cells);
    println!("Self-replicators per color: {:?}", statistics.num_self_replicators);
    println!("Cell max age per color:     {:?}", parameters.snapshot().cell_max_age);
    Ok(())
}
