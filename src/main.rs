use clap::Parser;

use uninformed_search::batch_simulation::BatchSimulation;
use uninformed_search::config::Config;
use uninformed_search::simulation::Simulation;
use uninformed_search::Result;

fn run(config: Config) -> Result<()> {
    config.validate()?;

    if config.batch_mode {
        let mut batch = BatchSimulation::new(config.clone());
        batch.run()?;
        if !config.quiet {
            batch.print_summary();
        }
        return Ok(());
    }

    let mut rng = config.rng();
    let grid = config.build_grid(&mut rng)?;
    let optimal_hops = grid.shortest_hops();

    if !config.quiet {
        println!("Grid size: {}x{}", config.rows, config.cols);
        println!("Walls: {}", grid.wall_count());
        println!("Start: {} | Target: {}", grid.start(), grid.target());
        match optimal_hops {
            Some(hops) => println!("Reference shortest path: {} moves", hops),
            None => println!("Target is unreachable with this wall layout"),
        }
        println!();
    }

    if config.runs_all() {
        let results = Simulation::run_all_algorithms(&config, &grid)?;
        Simulation::print_comparison_results(&results, optimal_hops);
        return Ok(());
    }

    let algorithm = config.algorithm.parse()?;
    let result = Simulation::new(config.clone(), grid, algorithm).run()?;

    println!("\n=== FINAL RESULTS ===");
    println!("Algorithm: {}", result.algorithm);
    println!("{}", result.stats);
    if !result.path.is_empty() && !config.quiet {
        let cells: Vec<String> = result.path.cells().iter().map(|p| p.to_string()).collect();
        println!("Path: {}", cells.join(" -> "));
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let config = Config::parse();

    if let Err(e) = run(config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
