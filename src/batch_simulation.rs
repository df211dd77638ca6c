use crate::algorithms::AlgorithmKind;
use crate::config::Config;
use crate::controller::{Outcome, RunState};
use crate::error::Result;
use crate::simulation::{AlgorithmResult, Simulation};
use log::{debug, info};
use rustc_hash::FxHashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::time::Instant;

const CSV_HEADER: &str = "simulation_id,algorithm,rows,cols,num_walls,outcome,nodes_expanded,path_length,path_cost,optimal_hops,elapsed_us";

#[derive(Debug, Clone)]
pub struct BatchResult {
    pub simulation_id: usize,
    pub algorithm: AlgorithmKind,
    pub rows: usize,
    pub cols: usize,
    pub num_walls: usize,
    pub state: RunState,
    pub nodes_expanded: usize,
    pub path_length: usize,
    pub path_cost: f64,
    pub optimal_hops: Option<usize>,
    pub elapsed_us: u128,
}

impl BatchResult {
    pub fn success(&self) -> bool {
        self.state == RunState::Finished(Outcome::Success)
    }

    fn csv_row(&self) -> String {
        let outcome = match self.state {
            RunState::Finished(Outcome::Success) => "found".to_string(),
            RunState::Finished(Outcome::Failure(reason)) => reason.to_string().replace(' ', "_"),
            other => other.to_string(),
        };
        format!(
            "{},{},{},{},{},{},{},{},{:.6},{},{}",
            self.simulation_id,
            self.algorithm.name(),
            self.rows,
            self.cols,
            self.num_walls,
            outcome,
            self.nodes_expanded,
            self.path_length,
            self.path_cost,
            self.optimal_hops.map_or(String::new(), |h| h.to_string()),
            self.elapsed_us
        )
    }
}

/// Runs the selected algorithms over many random grids and appends one CSV
/// row per run.
pub struct BatchSimulation {
    config: Config,
    results: Vec<BatchResult>,
    pending: usize,
    batch_size: usize,
    start_time: Instant,
}

impl BatchSimulation {
    pub fn new(config: Config) -> Self {
        BatchSimulation {
            config,
            results: Vec::new(),
            pending: 0,
            batch_size: 100,
            start_time: Instant::now(),
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn results(&self) -> &[BatchResult] {
        &self.results
    }

    pub fn run(&mut self) -> Result<()> {
        self.initialize_csv_file()?;
        let algorithms = self.config.algorithms()?;
        let mut rng = self.config.rng();

        if !self.config.quiet {
            println!("=== BATCH SIMULATION STARTED ===");
            println!("Grid size: {}x{}", self.config.rows, self.config.cols);
            println!("Walls per grid: {}", self.config.num_walls);
            println!("Simulations: {}", self.config.num_simulations);
            println!("Algorithms: {:?}", algorithms);
            println!("Output file: {}", self.config.output_file);
            println!();
        }

        for sim_id in 0..self.config.num_simulations {
            let grid = self.config.build_grid(&mut rng)?;
            let optimal_hops = grid.shortest_hops();
            let num_walls = grid.wall_count();

            for &kind in &algorithms {
                let started = Instant::now();
                let result = Simulation::new(self.no_visualization(), grid.clone(), kind).run()?;
                self.record(
                    sim_id,
                    &result,
                    grid.rows,
                    grid.cols,
                    num_walls,
                    optimal_hops,
                    started,
                );
            }

            if self.pending >= self.batch_size {
                self.flush_results_to_csv()?;
            }
            debug!("simulation {} done", sim_id);
        }

        self.flush_results_to_csv()?;
        info!(
            "batch of {} runs finished in {:.2?}",
            self.results.len(),
            self.start_time.elapsed()
        );
        if !self.config.quiet {
            println!("\n=== BATCH SIMULATION COMPLETED ===");
            println!("Total results collected: {}", self.results.len());
            println!("Results saved to: {}", self.config.output_file);
            println!("Total time: {:.2?}", self.start_time.elapsed());
        }
        Ok(())
    }

    fn no_visualization(&self) -> Config {
        let mut config = self.config.clone();
        config.no_visualization = true;
        config.quiet = true;
        config
    }

    #[allow(clippy::too_many_arguments)]
    fn record(
        &mut self,
        simulation_id: usize,
        result: &AlgorithmResult,
        rows: usize,
        cols: usize,
        num_walls: usize,
        optimal_hops: Option<usize>,
        started: Instant,
    ) {
        self.results.push(BatchResult {
            simulation_id,
            algorithm: result.algorithm,
            rows,
            cols,
            num_walls,
            state: result.state,
            nodes_expanded: result.stats.nodes_expanded,
            path_length: result.stats.path_length,
            path_cost: result.stats.path_cost,
            optimal_hops,
            elapsed_us: started.elapsed().as_micros(),
        });
        self.pending += 1;
    }

    fn initialize_csv_file(&self) -> Result<()> {
        let mut file = File::create(&self.config.output_file)?;
        writeln!(file, "{}", CSV_HEADER)?;
        Ok(())
    }

    fn flush_results_to_csv(&mut self) -> Result<()> {
        if self.pending == 0 {
            return Ok(());
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.config.output_file)?;

        let start = self.results.len() - self.pending;
        for result in &self.results[start..] {
            writeln!(file, "{}", result.csv_row())?;
        }
        if !self.config.quiet {
            println!("Flushed {} results to {}", self.pending, self.config.output_file);
        }
        self.pending = 0;
        Ok(())
    }

    pub fn print_summary(&self) {
        if self.results.is_empty() {
            println!("No results to summarize.");
            return;
        }

        println!("\n=== BATCH SIMULATION SUMMARY ===");
        let mut groups: FxHashMap<AlgorithmKind, Vec<&BatchResult>> = FxHashMap::default();
        for result in &self.results {
            groups.entry(result.algorithm).or_default().push(result);
        }

        for kind in AlgorithmKind::ALL {
            let Some(results) = groups.get(&kind) else {
                continue;
            };
            let successful: Vec<_> = results.iter().filter(|r| r.success()).collect();
            let total = results.len();
            println!("\n{} Results:", kind);
            println!(
                "  Success rate: {}/{} ({:.1}%)",
                successful.len(),
                total,
                successful.len() as f64 / total as f64 * 100.0
            );

            let avg_expanded =
                results.iter().map(|r| r.nodes_expanded as f64).sum::<f64>() / total as f64;
            println!("  Average expansions: {:.1}", avg_expanded);

            if !successful.is_empty() {
                let n = successful.len() as f64;
                let avg_len = successful.iter().map(|r| r.path_length as f64).sum::<f64>() / n;
                let avg_cost = successful.iter().map(|r| r.path_cost).sum::<f64>() / n;
                let optimal = successful
                    .iter()
                    .filter(|r| r.optimal_hops.map(|h| h + 1) == Some(r.path_length))
                    .count();
                println!("  Average path length: {:.1}", avg_len);
                println!("  Average path cost: {:.3}", avg_cost);
                println!("  Hop-optimal paths: {}/{}", optimal, successful.len());
            }
        }
    }
}
