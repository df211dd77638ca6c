use crate::algorithms::AlgorithmKind;
use crate::config::Config;
use crate::controller::{Engine, Outcome, RunState};
use crate::error::Result;
use crate::grid::Grid;
use crate::node::Path;
use crate::render::{clear_screen, render_frame};
use crate::statistics::RunStats;
use crate::worker::SearchWorker;
use log::info;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AlgorithmResult {
    pub algorithm: AlgorithmKind,
    pub state: RunState,
    pub stats: RunStats,
    pub path: Path,
}

impl AlgorithmResult {
    pub fn from_engine(engine: &Engine) -> Self {
        AlgorithmResult {
            algorithm: engine.algorithm(),
            state: engine.state(),
            stats: engine.stats().clone(),
            path: engine.path().clone(),
        }
    }

    pub fn success(&self) -> bool {
        self.state == RunState::Finished(Outcome::Success)
    }
}

/// One search over one grid, either paced frame by frame or at full speed.
pub struct Simulation {
    config: Config,
    grid: Grid,
    algorithm: AlgorithmKind,
}

impl Simulation {
    pub fn new(config: Config, grid: Grid, algorithm: AlgorithmKind) -> Self {
        Simulation {
            config,
            grid,
            algorithm,
        }
    }

    pub fn run(&self) -> Result<AlgorithmResult> {
        let engine = self.config.build_engine(self.grid.clone(), self.algorithm);
        if self.config.no_visualization {
            Self::run_fast(engine)
        } else {
            self.run_visualized(engine)
        }
    }

    fn run_fast(mut engine: Engine) -> Result<AlgorithmResult> {
        engine.start()?;
        engine.run_to_completion()?;
        Ok(AlgorithmResult::from_engine(&engine))
    }

    /// Runs the search on a worker thread and redraws the latest snapshot
    /// every `delay_ms`.
    fn run_visualized(&self, engine: Engine) -> Result<AlgorithmResult> {
        let delay = Duration::from_millis(self.config.delay_ms);
        let worker = SearchWorker::spawn(engine, delay)?;

        loop {
            let finished = worker.is_finished();
            let snapshot = worker.snapshot();
            clear_screen();
            println!("=== {} SEARCH ===", self.algorithm);
            println!(
                "Start: {} | Target: {} | State: {}",
                self.grid.start(),
                self.grid.target(),
                snapshot.state
            );
            print!("{}", render_frame(&self.grid, &snapshot));
            println!("{}", snapshot.stats);
            if finished {
                break;
            }
            thread::sleep(delay.max(Duration::from_millis(1)));
        }

        let engine = worker.join()?;
        Ok(AlgorithmResult::from_engine(&engine))
    }

    /// Runs every algorithm on the same grid at full speed.
    pub fn run_all_algorithms(config: &Config, grid: &Grid) -> Result<Vec<AlgorithmResult>> {
        let mut results = Vec::with_capacity(AlgorithmKind::ALL.len());
        for (i, kind) in AlgorithmKind::ALL.iter().enumerate() {
            if !config.quiet {
                println!("Running algorithm {} of {}: {}", i + 1, AlgorithmKind::ALL.len(), kind);
            }
            let engine = config.build_engine(grid.clone(), *kind);
            let result = Self::run_fast(engine)?;
            info!("{} finished: {}", kind, result.stats.status);
            results.push(result);
        }
        Ok(results)
    }

    /// Print comparison results in a table
    pub fn print_comparison_results(results: &[AlgorithmResult], optimal_hops: Option<usize>) {
        println!("\n=== ALGORITHM COMPARISON RESULTS ===");
        match optimal_hops {
            Some(hops) => println!("Reference shortest path: {} moves", hops),
            None => println!("Reference shortest path: unreachable"),
        }
        println!();

        println!(
            "{:<15} {:<8} {:<10} {:<10} {:<10} {:<12} {:<25}",
            "Algorithm", "Success", "Expanded", "Length", "Cost", "Time", "Status"
        );
        println!("{}", "-".repeat(95));

        for result in results {
            let success_str = if result.success() { "✓" } else { "✗" };
            println!(
                "{:<15} {:<8} {:<10} {:<10} {:<10.3} {:<12} {:<25}",
                result.algorithm.name(),
                success_str,
                result.stats.nodes_expanded,
                result.stats.path_length,
                result.stats.path_cost,
                format!("{:.2?}", result.stats.elapsed),
                result.stats.status
            );
        }

        let successful: Vec<_> = results.iter().filter(|r| r.success()).collect();
        if successful.is_empty() {
            println!("\nNo algorithm reached the target.");
            return;
        }

        println!("\n=== PERFORMANCE ANALYSIS ===");
        if let Some(fewest) = successful.iter().min_by_key(|r| r.stats.nodes_expanded) {
            println!(
                "Fewest expansions: {} ({} nodes)",
                fewest.algorithm, fewest.stats.nodes_expanded
            );
        }
        if let Some(cheapest) = successful
            .iter()
            .min_by(|a, b| a.stats.path_cost.total_cmp(&b.stats.path_cost))
        {
            println!(
                "Cheapest path: {} (cost {:.3})",
                cheapest.algorithm, cheapest.stats.path_cost
            );
        }
        if let Some(fastest) = successful.iter().min_by_key(|r| r.stats.elapsed) {
            println!("Fastest: {} ({:.2?})", fastest.algorithm, fastest.stats.elapsed);
        }
    }
}
