use crate::grid::{Grid, Position};
use log::trace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Randomly injects dynamic obstacles while a search runs.
pub struct ObstacleSpawner {
    probability: f64,
    rng: StdRng,
    max_attempts: usize,
}

impl ObstacleSpawner {
    /// `probability` is the chance per expansion of placing one obstacle.
    /// A seed makes the sequence reproducible.
    pub fn new(probability: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        ObstacleSpawner {
            probability: probability.clamp(0.0, 1.0),
            rng,
            max_attempts: 10,
        }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Rolls once and, on success, places an obstacle on a random cell the
    /// grid accepts. Returns the cell used.
    pub fn maybe_spawn(&mut self, grid: &mut Grid) -> Option<Position> {
        if self.probability <= 0.0 || !self.rng.gen_bool(self.probability) {
            return None;
        }
        for _ in 0..self.max_attempts {
            let pos = Position::new(
                self.rng.gen_range(0..grid.rows),
                self.rng.gen_range(0..grid.cols),
            );
            if grid.add_dynamic_obstacle(pos).is_ok() {
                trace!("spawned dynamic obstacle at {}", pos);
                return Some(pos);
            }
        }
        None
    }
}
