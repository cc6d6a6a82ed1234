//! Route Optimizer - Command Line Interface
//!
//! Hill climbing and genetic algorithm solvers for the Euclidean TSP.

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use route_optimizer::benchmark::{load_instances_from_dir, Benchmark, BenchmarkConfig};
use route_optimizer::heuristics::{make_rng, GAConfig, GeneticAlgorithm, HillClimbing, TourSolver};
use route_optimizer::instance::{Instance, Point};
use route_optimizer::visualization::Visualizer;
use route_optimizer::Result;

use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "route-optimizer")]
#[command(version = "1.0")]
#[command(about = "Hill climbing and genetic algorithm solvers for the Euclidean TSP")]
struct Cli {
    /// Verbose logging (info, or debug when repeated)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve one instance
    Solve {
        /// Instance file (TSP-LIB or CSV with an x,y header)
        #[arg(short, long, conflicts_with = "random")]
        instance: Option<PathBuf>,

        /// Generate this many random cities instead of reading a file
        #[arg(short, long)]
        random: Option<usize>,

        /// Upper bound of random integer coordinates
        #[arg(long, default_value = "100")]
        max_coord: u32,

        /// Algorithm to use
        #[arg(short, long, value_enum, default_value = "genetic")]
        algorithm: Algorithm,

        #[command(flatten)]
        params: SolverParams,

        /// Random seed (unseeded when omitted)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output solution to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write an SVG drawing of the route
        #[arg(long)]
        visualize: Option<PathBuf>,
    },

    /// Compare both algorithms over several seeds on one instance
    Compare {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,

        /// Number of runs
        #[arg(short, long, default_value = "10")]
        runs: usize,

        #[command(flatten)]
        params: SolverParams,

        /// Output CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run benchmarks on a directory of instances
    Benchmark {
        /// Directory containing instance files
        #[arg(short, long)]
        dir: PathBuf,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,

        /// Number of runs per algorithm
        #[arg(short, long, default_value = "5")]
        runs: usize,

        #[command(flatten)]
        params: SolverParams,

        /// Maximum instance size
        #[arg(long)]
        max_size: Option<usize>,
    },

    /// Analyze an instance
    Analyze {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,
    },

    /// Run the two classic lab examples
    Demo {
        /// Random seed (unseeded when omitted)
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

#[derive(clap::Args, Debug, Clone)]
struct SolverParams {
    /// Hill climbing iterations
    #[arg(long, default_value = "1000")]
    iterations: usize,

    /// GA population size
    #[arg(long, default_value = "100")]
    population_size: usize,

    /// GA generations
    #[arg(long, default_value = "500")]
    generations: usize,

    /// GA mutation probability
    #[arg(long, default_value = "0.2")]
    mutation_rate: f64,
}

impl SolverParams {
    fn ga_config(&self, seed: Option<u64>) -> GAConfig {
        GAConfig {
            population_size: self.population_size,
            generations: self.generations,
            mutation_rate: self.mutation_rate,
            seed,
        }
    }

    fn benchmark_config(&self, runs: usize) -> BenchmarkConfig {
        BenchmarkConfig {
            num_runs: runs,
            hill_climb_iterations: self.iterations,
            population_size: self.population_size,
            generations: self.generations,
            mutation_rate: self.mutation_rate,
            ..Default::default()
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Algorithm {
    /// Swap-move hill climbing
    HillClimbing,
    /// Genetic Algorithm
    Genetic,
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let outcome = match cli.command {
        Commands::Solve { instance, random, max_coord, algorithm, params, seed, output, visualize } => {
            solve_instance(instance, random, max_coord, algorithm, &params, seed, output, visualize)
        }

        Commands::Compare { instance, runs, params, output } => {
            compare_algorithms(&instance, runs, &params, output)
        }

        Commands::Benchmark { dir, output, runs, params, max_size } => {
            run_benchmark(&dir, &output, runs, &params, max_size)
        }

        Commands::Analyze { instance } => analyze_instance(&instance),

        Commands::Demo { seed } => run_demo(seed),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::with_template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

#[allow(clippy::too_many_arguments)]
fn solve_instance(
    path: Option<PathBuf>,
    random: Option<usize>,
    max_coord: u32,
    algorithm: Algorithm,
    params: &SolverParams,
    seed: Option<u64>,
    output: Option<PathBuf>,
    visualize: Option<PathBuf>,
) -> Result<()> {
    let instance = match (path, random) {
        (Some(path), _) => {
            println!("Loading instance from {:?}...", path);
            Instance::load(&path)?
        }
        (None, n) => {
            let n = n.unwrap_or(10);
            println!("Generating {} random cities in [0, {}]...", n, max_coord);
            // Offset so the instance and the solver do not share a stream
            let mut rng = make_rng(seed.map(|s| s.wrapping_add(1)));
            Instance::random(n, max_coord, &mut rng)?
        }
    };

    log::info!("{}", instance.statistics());

    let solver: Box<dyn TourSolver> = match algorithm {
        Algorithm::HillClimbing => Box::new(HillClimbing::with_params(params.iterations, seed)),
        Algorithm::Genetic => Box::new(GeneticAlgorithm::new(params.ga_config(seed))),
    };

    println!("Solving with {}...", solver.name());
    let solution = solver.solve(&instance)?;

    println!("\n========== Results ==========");
    print!("{}", solution);

    if let Some(out_path) = output {
        let json = serde_json::to_string_pretty(&solution)?;
        std::fs::write(&out_path, json)?;
        println!("\nSolution saved to {:?}", out_path);
    }

    if let Some(svg_path) = visualize {
        let viz = Visualizer::new();
        viz.save_svg(&viz.generate_svg(&instance, &solution), &svg_path)?;
        println!("Visualization saved to {:?}", svg_path);

        let convergence_path = svg_path.with_extension("convergence.svg");
        viz.save_svg(&viz.generate_convergence_svg(&solution), &convergence_path)?;
        println!("Convergence chart saved to {:?}", convergence_path);
    }

    Ok(())
}

fn compare_algorithms(path: &Path, runs: usize, params: &SolverParams, output: Option<PathBuf>) -> Result<()> {
    let instance = Instance::load(path)?;

    println!("Comparing algorithms on {} (n={})...\n", instance.name, instance.dimension());

    let mut benchmark = Benchmark::new(params.benchmark_config(runs));
    benchmark.run_instance(&instance)?;

    println!("{:<20} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "Algorithm", "Best", "Average", "Worst", "Std", "Avg Time");
    println!("{}", "-".repeat(75));

    for stat in benchmark.compute_statistics() {
        println!("{:<20} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.4}",
            stat.algorithm, stat.best_distance, stat.avg_distance,
            stat.worst_distance, stat.std_distance, stat.avg_time);
    }

    if let Some(out_path) = output {
        benchmark.export_to_csv(&out_path)?;
        println!("\nResults exported to {:?}", out_path);
    }

    Ok(())
}

fn run_benchmark(
    dir: &Path,
    output: &Path,
    runs: usize,
    params: &SolverParams,
    max_size: Option<usize>,
) -> Result<()> {
    println!("Loading instances from {:?}...", dir);

    let mut instances = load_instances_from_dir(dir)?;

    if let Some(max) = max_size {
        instances.retain(|i| i.dimension() <= max);
    }

    println!("Found {} instances", instances.len());

    if instances.is_empty() {
        eprintln!("No instances found!");
        return Ok(());
    }

    std::fs::create_dir_all(output)?;

    let mut benchmark = Benchmark::new(params.benchmark_config(runs));

    let pb = progress_bar(instances.len() as u64);
    for instance in &instances {
        pb.set_message(format!("{} (n={})", instance.name, instance.dimension()));
        benchmark.run_instance(instance)?;
        pb.inc(1);
    }
    pb.finish_with_message("done");

    let results_path = output.join("results.csv");
    benchmark.export_to_csv(&results_path)?;
    println!("\nResults exported to {:?}", results_path);

    let stats_path = output.join("statistics.csv");
    benchmark.export_statistics_csv(&stats_path)?;
    println!("Statistics exported to {:?}", stats_path);

    let report = benchmark.generate_report();
    println!("\n{}", report);

    let report_path = output.join("report.txt");
    std::fs::write(&report_path, &report)?;
    println!("Report saved to {:?}", report_path);

    Ok(())
}

fn analyze_instance(path: &Path) -> Result<()> {
    let instance = Instance::load(path)?;

    println!("========== Instance Analysis ==========\n");
    println!("{}", instance.statistics());

    let hc = HillClimbing::with_params(1000, Some(0));
    let quick = hc.solve(&instance)?;

    println!("Quick Solution Estimate:");
    println!("  Hill climbing (1000 swaps): {:.2} (start {:.2})", quick.distance, quick.initial_distance);

    Ok(())
}

fn run_demo(seed: Option<u64>) -> Result<()> {
    let locations: Vec<Point> = [(0.0, 0.0), (2.0, 3.0), (5.0, 4.0), (7.0, 1.0), (6.0, 7.0), (8.0, 3.0)]
        .into_iter()
        .map(Point::from)
        .collect();
    let instance = Instance::new("six-locations", locations)?;

    let hc = HillClimbing::with_params(1000, seed);
    let solution = hc.solve(&instance)?;
    println!("Hill climbing");
    println!("  Optimized Route: {}", solution.route);
    println!("  Total Distance: {:.4}", solution.distance);

    let mut rng = make_rng(seed.map(|s| s.wrapping_add(1)));
    let cities = Instance::random(10, 100, &mut rng)?;

    let ga = GeneticAlgorithm::new(GAConfig { seed, ..Default::default() });
    let solution = ga.solve(&cities)?;
    println!("\nGenetic algorithm (10 random cities)");
    println!("  Best Route: {}", solution.route);
    println!("  Total Distance: {:.4}", solution.distance);

    Ok(())
}
