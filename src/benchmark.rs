//! Benchmarking and experimentation module.
//!
//! Runs both solvers over several seeds, collects per-run results and
//! aggregates them into per-algorithm statistics.

use crate::error::Result;
use crate::heuristics::{GAConfig, GeneticAlgorithm, HillClimbing, TourSolver};
use crate::instance::Instance;
use crate::solution::Solution;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::path::Path;

/// Result of running a single algorithm on an instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Algorithm name
    pub algorithm: String,
    /// Instance name
    pub instance: String,
    /// Instance dimension
    pub dimension: usize,
    /// Seed used for this run
    pub seed: u64,
    /// Best tour distance
    pub distance: f64,
    /// Distance of the starting tour
    pub initial_distance: f64,
    /// Computation time in seconds
    pub time: f64,
    /// Number of iterations (if applicable)
    pub iterations: Option<usize>,
    /// Gap to best distance seen on the instance, in percent
    pub gap_to_best: Option<f64>,
}

impl RunResult {
    fn from_solution(instance: &Instance, seed: u64, solution: &Solution) -> Self {
        RunResult {
            algorithm: solution.algorithm.clone(),
            instance: instance.name.clone(),
            dimension: instance.dimension(),
            seed,
            distance: solution.distance,
            initial_distance: solution.initial_distance,
            time: solution.computation_time,
            iterations: solution.iterations,
            gap_to_best: None,
        }
    }
}

/// Aggregated statistics for an algorithm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmStatistics {
    /// Algorithm name
    pub algorithm: String,
    /// Number of runs
    pub num_runs: usize,
    /// Average distance
    pub avg_distance: f64,
    /// Best distance
    pub best_distance: f64,
    /// Worst distance
    pub worst_distance: f64,
    /// Standard deviation of distance
    pub std_distance: f64,
    /// Average time
    pub avg_time: f64,
    /// Total time
    pub total_time: f64,
    /// Average gap to best known
    pub avg_gap: Option<f64>,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of seeded runs per algorithm
    pub num_runs: usize,
    /// Seed of the first run; run `r` uses `base_seed + r`
    pub base_seed: u64,
    /// Hill climbing iterations
    pub hill_climb_iterations: usize,
    /// GA population size
    pub population_size: usize,
    /// GA generations
    pub generations: usize,
    /// GA mutation rate
    pub mutation_rate: f64,
    /// Run seeds in parallel
    pub parallel: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        let ga = GAConfig::default();
        BenchmarkConfig {
            num_runs: 5,
            base_seed: 0,
            hill_climb_iterations: HillClimbing::new().max_iterations,
            population_size: ga.population_size,
            generations: ga.generations,
            mutation_rate: ga.mutation_rate,
            parallel: true,
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<RunResult>,
    best_known: HashMap<String, f64>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
            best_known: HashMap::new(),
        }
    }

    /// Solvers for one seeded run
    fn solvers(&self, seed: u64) -> Vec<Box<dyn TourSolver + Send + Sync>> {
        vec![
            Box::new(HillClimbing::with_params(self.config.hill_climb_iterations, Some(seed))),
            Box::new(GeneticAlgorithm::new(GAConfig {
                population_size: self.config.population_size,
                generations: self.config.generations,
                mutation_rate: self.config.mutation_rate,
                seed: Some(seed),
            })),
        ]
    }

    fn run_seed(&self, instance: &Instance, seed: u64) -> Result<Vec<RunResult>> {
        self.solvers(seed)
            .iter()
            .map(|solver| {
                let solution = solver.solve(instance)?;
                Ok(RunResult::from_solution(instance, seed, &solution))
            })
            .collect()
    }

    /// Run every solver `num_runs` times on an instance
    pub fn run_instance(&mut self, instance: &Instance) -> Result<()> {
        log::info!("Running benchmark on instance: {}", instance.name);

        let seeds: Vec<u64> = (0..self.config.num_runs as u64)
            .map(|r| self.config.base_seed + r)
            .collect();

        let per_seed: Vec<Vec<RunResult>> = if self.config.parallel {
            seeds
                .par_iter()
                .map(|&seed| self.run_seed(instance, seed))
                .collect::<Result<_>>()?
        } else {
            seeds
                .iter()
                .map(|&seed| self.run_seed(instance, seed))
                .collect::<Result<_>>()?
        };

        let mut results: Vec<RunResult> = per_seed.into_iter().flatten().collect();
        if results.is_empty() {
            log::warn!("No runs configured for instance {}", instance.name);
            return Ok(());
        }

        let run_best = results.iter().map(|r| r.distance).fold(f64::INFINITY, f64::min);
        let best = self
            .best_known
            .get(&instance.name)
            .copied()
            .map_or(run_best, |known| known.min(run_best));
        self.best_known.insert(instance.name.clone(), best);

        for result in &mut results {
            if best > 0.0 {
                result.gap_to_best = Some((result.distance - best) / best * 100.0);
            }
        }

        self.results.extend(results);
        Ok(())
    }

    /// Run benchmark on multiple instances
    pub fn run_on_instances(&mut self, instances: &[Instance]) -> Result<()> {
        for instance in instances {
            self.run_instance(instance)?;
        }
        Ok(())
    }

    /// Compute statistics for each algorithm, best average distance first
    pub fn compute_statistics(&self) -> Vec<AlgorithmStatistics> {
        let mut grouped: BTreeMap<&str, Vec<&RunResult>> = BTreeMap::new();

        for result in &self.results {
            grouped.entry(result.algorithm.as_str()).or_default().push(result);
        }

        let mut statistics: Vec<AlgorithmStatistics> = grouped
            .into_iter()
            .map(|(algorithm, results)| {
                let distances: Vec<f64> = results.iter().map(|r| r.distance).collect();
                let times: Vec<f64> = results.iter().map(|r| r.time).collect();
                let gaps: Vec<f64> = results.iter().filter_map(|r| r.gap_to_best).collect();

                AlgorithmStatistics {
                    algorithm: algorithm.to_string(),
                    num_runs: results.len(),
                    avg_distance: distances.iter().mean(),
                    best_distance: Statistics::min(distances.iter()),
                    worst_distance: Statistics::max(distances.iter()),
                    std_distance: distances.iter().population_std_dev(),
                    avg_time: times.iter().mean(),
                    total_time: times.iter().sum(),
                    avg_gap: if gaps.is_empty() { None } else { Some(gaps.iter().mean()) },
                }
            })
            .collect();

        statistics.sort_by(|a, b| a.avg_distance.total_cmp(&b.avg_distance));

        statistics
    }

    /// Export results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Export statistics to CSV
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);

        for stat in self.compute_statistics() {
            writer.serialize(stat)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("        TSP Benchmark Report\n");
        report.push_str("========================================\n");
        report.push_str(&format!(
            "Generated: {}\n\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));

        report.push_str("Algorithm Performance Summary:\n");
        report.push_str("-".repeat(80).as_str());
        report.push('\n');
        report.push_str(&format!("{:<20} {:>6} {:>12} {:>12} {:>10} {:>10} {:>8}\n",
            "Algorithm", "Runs", "Avg Dist", "Best Dist", "Std", "Avg Gap%", "Avg Time"));
        report.push_str("-".repeat(80).as_str());
        report.push('\n');

        for stat in self.compute_statistics() {
            let gap_str = stat.avg_gap
                .map(|g| format!("{:.2}%", g))
                .unwrap_or_else(|| "-".to_string());

            report.push_str(&format!("{:<20} {:>6} {:>12.2} {:>12.2} {:>10.2} {:>10} {:>8.4}\n",
                stat.algorithm,
                stat.num_runs,
                stat.avg_distance,
                stat.best_distance,
                stat.std_distance,
                gap_str,
                stat.avg_time));
        }

        report.push_str("-".repeat(80).as_str());
        report.push('\n');

        report.push_str("\nBest Solutions per Instance:\n");

        let mut instance_best: BTreeMap<&str, &RunResult> = BTreeMap::new();
        for result in &self.results {
            let entry = instance_best.entry(result.instance.as_str()).or_insert(result);
            if result.distance < entry.distance {
                *entry = result;
            }
        }

        for (instance, best) in &instance_best {
            report.push_str(&format!("  {}: {:.2} ({}, seed {})\n",
                instance, best.distance, best.algorithm, best.seed));
        }

        report
    }

    /// Get all results
    pub fn results(&self) -> &[RunResult] {
        &self.results
    }

    /// Best distance seen so far on each instance
    pub fn best_known(&self) -> &HashMap<String, f64> {
        &self.best_known
    }
}

/// Load every `.tsp` and `.csv` instance in a directory, smallest first.
/// Files that fail to parse are skipped.
pub fn load_instances_from_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<Instance>> {
    let mut instances = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let supported = path
            .extension()
            .map(|e| e == "tsp" || e == "csv")
            .unwrap_or(false);
        if !supported {
            continue;
        }

        match Instance::load(&path) {
            Ok(instance) => instances.push(instance),
            Err(e) => log::warn!("Skipping {:?}: {}", path, e),
        }
    }

    instances.sort_by(|a, b| a.dimension().cmp(&b.dimension()).then_with(|| a.name.cmp(&b.name)));

    Ok(instances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Point;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("route-optimizer-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn tsplib(name: &str, coords: &[(f64, f64)]) -> String {
        let mut text = format!("NAME: {}\nTYPE: TSP\nDIMENSION: {}\nEDGE_WEIGHT_TYPE: EUC_2D\nNODE_COORD_SECTION\n", name, coords.len());
        for (i, (x, y)) in coords.iter().enumerate() {
            text.push_str(&format!("{} {} {}\n", i + 1, x, y));
        }
        text.push_str("EOF\n");
        text
    }

    fn small_config() -> BenchmarkConfig {
        BenchmarkConfig {
            num_runs: 3,
            hill_climb_iterations: 200,
            population_size: 10,
            generations: 10,
            ..Default::default()
        }
    }

    fn square() -> Instance {
        Instance::new("square", vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
        ]).unwrap()
    }

    #[test]
    fn test_benchmark_config() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.num_runs, 5);
        assert_eq!(config.hill_climb_iterations, 1000);
        assert_eq!(config.population_size, 100);
    }

    #[test]
    fn test_run_instance_records_every_run() {
        let mut benchmark = Benchmark::new(small_config());
        benchmark.run_instance(&square()).unwrap();

        assert_eq!(benchmark.results().len(), 6);
        let seeds: Vec<u64> = benchmark.results().iter().map(|r| r.seed).collect();
        assert_eq!(seeds, vec![0, 0, 1, 1, 2, 2]);

        let best = benchmark.best_known()["square"];
        assert!((best - 4.0).abs() < 1e-9);
        assert!(benchmark.results().iter().all(|r| r.gap_to_best.unwrap() >= 0.0));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut parallel = Benchmark::new(small_config());
        let mut sequential = Benchmark::new(BenchmarkConfig { parallel: false, ..small_config() });

        parallel.run_instance(&square()).unwrap();
        sequential.run_instance(&square()).unwrap();

        let a: Vec<f64> = parallel.results().iter().map(|r| r.distance).collect();
        let b: Vec<f64> = sequential.results().iter().map(|r| r.distance).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_statistics_per_algorithm() {
        let mut benchmark = Benchmark::new(small_config());
        benchmark.run_instance(&square()).unwrap();

        let stats = benchmark.compute_statistics();
        assert_eq!(stats.len(), 2);
        for stat in &stats {
            assert_eq!(stat.num_runs, 3);
            assert!(stat.best_distance <= stat.avg_distance + 1e-12);
            assert!(stat.avg_distance <= stat.worst_distance + 1e-12);
            assert!(stat.std_distance >= 0.0);
        }

        let report = benchmark.generate_report();
        assert!(report.contains("HillClimbing"));
        assert!(report.contains("GeneticAlgorithm"));
        assert!(report.contains("square"));
    }

    #[test]
    fn test_zero_runs_records_nothing() {
        let mut benchmark = Benchmark::new(BenchmarkConfig { num_runs: 0, ..small_config() });
        benchmark.run_instance(&square()).unwrap();

        assert!(benchmark.results().is_empty());
        assert!(benchmark.best_known().is_empty());
        assert!(benchmark.compute_statistics().is_empty());
    }

    #[test]
    fn test_best_known_carries_across_calls() {
        let mut benchmark = Benchmark::new(small_config());
        benchmark.run_on_instances(&[square(), square()]).unwrap();

        assert_eq!(benchmark.results().len(), 12);
        assert_eq!(benchmark.best_known().len(), 1);
        assert!((benchmark.best_known()["square"] - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_instances_from_dir() {
        let dir = scratch_dir("load");
        let triangle = [(0.0, 0.0), (3.0, 0.0), (0.0, 4.0)];
        std::fs::write(dir.join("zeta.tsp"), tsplib("zeta", &triangle)).unwrap();
        std::fs::write(dir.join("alpha.tsp"), tsplib("alpha", &triangle)).unwrap();
        std::fs::write(dir.join("pair.csv"), "x,y\n0,0\n5,5\n").unwrap();
        std::fs::write(
            dir.join("big.tsp"),
            tsplib("big", &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (2.0, 2.0)]),
        ).unwrap();
        // Skipped with a warning
        std::fs::write(dir.join("broken.tsp"), "NAME: broken\nNODE_COORD_SECTION\n1 abc 2\nEOF\n").unwrap();
        // Ignored by extension
        std::fs::write(dir.join("notes.txt"), "x,y\n0,0\n1,1\n").unwrap();

        let instances = load_instances_from_dir(&dir).unwrap();
        let names: Vec<&str> = instances.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["pair", "alpha", "zeta", "big"]);
        assert_eq!(instances[0].points[1], Point::new(5.0, 5.0));
        assert_eq!(instances[3].dimension(), 5);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_instances_from_missing_dir() {
        let dir = std::env::temp_dir().join(format!("route-optimizer-missing-{}", std::process::id()));
        assert!(load_instances_from_dir(&dir).is_err());
    }

    #[test]
    fn test_export_csv_files() {
        let dir = scratch_dir("export");
        let mut benchmark = Benchmark::new(small_config());
        benchmark.run_instance(&square()).unwrap();

        let results_path = dir.join("results.csv");
        benchmark.export_to_csv(&results_path).unwrap();

        let mut reader = csv::Reader::from_path(&results_path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "algorithm");
        assert!(headers.iter().any(|h| h == "gap_to_best"));

        let rows: Vec<RunResult> = reader.deserialize().collect::<std::result::Result<_, _>>().unwrap();
        assert_eq!(rows.len(), benchmark.results().len());
        for (row, result) in rows.iter().zip(benchmark.results()) {
            assert_eq!(row.algorithm, result.algorithm);
            assert_eq!(row.instance, "square");
            assert_eq!(row.seed, result.seed);
            assert!((row.distance - result.distance).abs() < 1e-9);
        }

        let stats_path = dir.join("statistics.csv");
        benchmark.export_statistics_csv(&stats_path).unwrap();

        let mut reader = csv::Reader::from_path(&stats_path).unwrap();
        assert_eq!(&reader.headers().unwrap()[0], "algorithm");
        let stats: Vec<AlgorithmStatistics> = reader.deserialize().collect::<std::result::Result<_, _>>().unwrap();
        assert_eq!(stats.len(), 2);
        assert!(stats.iter().all(|s| s.num_runs == 3));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
