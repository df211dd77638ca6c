use crate::algorithms::{AlgorithmKind, DEFAULT_DEPTH_LIMIT};
use crate::controller::Engine;
use crate::error::{Result, SearchError};
use crate::grid::Grid;
use crate::obstacles::ObstacleSpawner;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Step-by-step uninformed search on a six-direction grid",
    long_about = None
)]
pub struct Config {
    #[arg(long, default_value_t = 20)]
    pub rows: usize,

    #[arg(long, default_value_t = 20)]
    pub cols: usize,

    #[arg(long, default_value_t = 60)]
    pub num_walls: usize,

    /// bfs, dfs, ucs, dls, iddfs, bidirectional, or all
    #[arg(long, default_value = "bfs")]
    pub algorithm: String,

    #[arg(long, default_value_t = DEFAULT_DEPTH_LIMIT)]
    pub depth_limit: usize,

    #[arg(long, default_value_t = 40)]
    pub delay_ms: u64,

    /// Chance per expansion of a dynamic obstacle appearing
    #[arg(long, default_value_t = 0.0)]
    pub obstacle_probability: f64,

    /// Obstacles never spawn within this many cells of the start or target
    #[arg(long, default_value_t = 1)]
    pub exclusion_radius: usize,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = false)]
    pub no_visualization: bool,

    #[arg(long, default_value_t = false)]
    pub quiet: bool,

    #[arg(long, default_value_t = false)]
    pub batch_mode: bool,

    #[arg(long, default_value_t = 10)]
    pub num_simulations: usize,

    #[arg(long, default_value = "search_results.csv")]
    pub output_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Config::parse_from(["uninformed_search"])
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.rows * self.cols < 2 {
            return Err(SearchError::InvalidConfig(format!(
                "a {}x{} grid cannot hold a start and a target",
                self.rows, self.cols
            )));
        }
        if !(0.0..=1.0).contains(&self.obstacle_probability) {
            return Err(SearchError::InvalidConfig(format!(
                "obstacle probability {} is outside [0, 1]",
                self.obstacle_probability
            )));
        }
        if self.batch_mode && self.num_simulations == 0 {
            return Err(SearchError::InvalidConfig(
                "batch mode needs at least one simulation".to_string(),
            ));
        }
        self.algorithms()?;
        Ok(())
    }

    pub fn runs_all(&self) -> bool {
        self.algorithm.eq_ignore_ascii_case("all")
    }

    /// The algorithms selected on the command line.
    pub fn algorithms(&self) -> Result<Vec<AlgorithmKind>> {
        if self.runs_all() {
            Ok(AlgorithmKind::ALL.to_vec())
        } else {
            Ok(vec![self.algorithm.parse()?])
        }
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Builds a grid with the default endpoints and randomly scattered walls.
    pub fn build_grid(&self, rng: &mut StdRng) -> Result<Grid> {
        let mut grid =
            Grid::new(self.rows, self.cols)?.with_exclusion_radius(self.exclusion_radius);
        grid.scatter_walls(self.num_walls, rng);
        Ok(grid)
    }

    /// Wraps `grid` in an engine carrying this configuration's tunables.
    pub fn build_engine(&self, grid: Grid, algorithm: AlgorithmKind) -> Engine {
        let mut engine = Engine::new(grid)
            .with_algorithm(algorithm)
            .with_depth_limit(self.depth_limit);
        if self.obstacle_probability > 0.0 {
            let spawner = ObstacleSpawner::new(self.obstacle_probability, self.seed);
            engine = engine.with_spawner(spawner);
        }
        engine
    }
}
