//! Execution controller: owns the grid and the active search, and drives it
//! one expansion at a time.

use crate::algorithms::{
    AlgorithmKind, FailureReason, SearchAlgorithm, SearchContext, StepResult, DEFAULT_DEPTH_LIMIT,
};
use crate::error::{Result, SearchError};
use crate::grid::{Grid, Position};
use crate::node::Path;
use crate::obstacles::ObstacleSpawner;
use crate::statistics::{RunClock, RunStats};
use log::{debug, info};
use rustc_hash::FxHashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure(FailureReason),
}

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Paused,
    Finished(Outcome),
}

impl RunState {
    /// Running or paused: a search holds in-flight state.
    pub fn in_progress(&self) -> bool {
        matches!(self, RunState::Running | RunState::Paused)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, RunState::Finished(_))
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Idle => write!(f, "idle"),
            RunState::Running => write!(f, "running"),
            RunState::Paused => write!(f, "paused"),
            RunState::Finished(Outcome::Success) => write!(f, "finished (success)"),
            RunState::Finished(Outcome::Failure(reason)) => write!(f, "finished ({})", reason),
        }
    }
}

/// Copy of everything an observer needs to draw one frame.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub algorithm: AlgorithmKind,
    pub state: RunState,
    pub explored: FxHashSet<Position>,
    pub frontier: FxHashSet<Position>,
    pub dynamic_obstacles: FxHashSet<Position>,
    pub path: Path,
    pub stats: RunStats,
}

pub struct Engine {
    grid: Grid,
    algorithm: AlgorithmKind,
    depth_limit: usize,
    active: Option<Box<dyn SearchAlgorithm>>,
    context: SearchContext,
    path: Path,
    stats: RunStats,
    state: RunState,
    clock: RunClock,
    spawner: Option<ObstacleSpawner>,
}

impl Engine {
    pub fn new(grid: Grid) -> Self {
        Engine {
            grid,
            algorithm: AlgorithmKind::Bfs,
            depth_limit: DEFAULT_DEPTH_LIMIT,
            active: None,
            context: SearchContext::new(),
            path: Path::default(),
            stats: RunStats::new(),
            state: RunState::Idle,
            clock: RunClock::new(),
            spawner: None,
        }
    }

    pub fn with_algorithm(mut self, algorithm: AlgorithmKind) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_depth_limit(mut self, limit: usize) -> Self {
        self.depth_limit = limit;
        self
    }

    pub fn with_spawner(mut self, spawner: ObstacleSpawner) -> Self {
        self.spawner = Some(spawner);
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn algorithm(&self) -> AlgorithmKind {
        self.algorithm
    }

    pub fn depth_limit(&self) -> usize {
        self.depth_limit
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn explored(&self) -> &FxHashSet<Position> {
        &self.context.explored
    }

    pub fn frontier(&self) -> &FxHashSet<Position> {
        &self.context.frontier
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            algorithm: self.algorithm,
            state: self.state,
            explored: self.context.explored.clone(),
            frontier: self.context.frontier.clone(),
            dynamic_obstacles: self.grid.dynamic_obstacles().clone(),
            path: self.path.clone(),
            stats: self.stats.clone(),
        }
    }

    fn invalid(&self, command: &'static str) -> SearchError {
        SearchError::InvalidState {
            command,
            state: self.state,
        }
    }

    fn reject_while(&self, blocked: bool, what: &str) -> Result<()> {
        if blocked {
            return Err(SearchError::Rejected(format!(
                "cannot {} while the search is {}",
                what, self.state
            )));
        }
        Ok(())
    }

    // Grid edits.

    pub fn place_start(&mut self, pos: Position) -> Result<()> {
        self.reject_while(self.state.in_progress(), "move the start")?;
        self.grid.set_start(pos)
    }

    pub fn place_target(&mut self, pos: Position) -> Result<()> {
        self.reject_while(self.state.in_progress(), "move the target")?;
        self.grid.set_target(pos)
    }

    /// Wall edits are refused while running but allowed while paused; the
    /// search notices them lazily on its next pops.
    pub fn toggle_wall(&mut self, pos: Position) -> Result<bool> {
        self.reject_while(self.state == RunState::Running, "edit walls")?;
        self.grid.toggle_wall(pos)
    }

    pub fn erase(&mut self, pos: Position) -> Result<()> {
        self.reject_while(self.state == RunState::Running, "erase cells")?;
        self.grid.erase(pos)
    }

    /// Dynamic obstacles may be injected in any state.
    pub fn inject_obstacle(&mut self, pos: Position) -> Result<()> {
        self.grid.add_dynamic_obstacle(pos)?;
        debug!("dynamic obstacle injected at {}", pos);
        Ok(())
    }

    pub fn set_exclusion_radius(&mut self, radius: usize) {
        self.grid.set_exclusion_radius(radius);
    }

    pub fn set_spawner(&mut self, spawner: Option<ObstacleSpawner>) {
        self.spawner = spawner;
    }

    pub fn set_depth_limit(&mut self, limit: usize) -> Result<()> {
        if self.state.in_progress() {
            return Err(self.invalid("change the depth limit"));
        }
        self.depth_limit = limit;
        Ok(())
    }

    /// Switches strategy, discarding any run in progress.
    pub fn select_algorithm(&mut self, algorithm: AlgorithmKind) {
        if self.state.in_progress() {
            info!("{} run discarded by switching to {}", self.algorithm, algorithm);
        }
        self.reset_search();
        self.algorithm = algorithm;
    }

    // Run control.

    pub fn start(&mut self) -> Result<()> {
        if self.state != RunState::Idle {
            return Err(self.invalid("start"));
        }
        self.clear_run();

        let active = self.algorithm.build(&self.grid, self.depth_limit);
        self.stats.status = active.status();
        self.stats.depth_limit = active.depth_limit();
        self.active = Some(active);
        if let Some(spawner) = &self.spawner {
            debug!("obstacle spawning enabled at p={}", spawner.probability());
        }

        self.clock.resume();
        self.state = RunState::Running;
        info!(
            "{} started from {} to {}",
            self.algorithm,
            self.grid.start(),
            self.grid.target()
        );
        Ok(())
    }

    /// Performs one expansion and returns the resulting state.
    pub fn step(&mut self) -> Result<RunState> {
        if self.state != RunState::Running {
            return Err(self.invalid("step"));
        }

        if let Some(spawner) = self.spawner.as_mut() {
            if let Some(pos) = spawner.maybe_spawn(&mut self.grid) {
                debug!("obstacle spawned at {}", pos);
            }
        }

        let Some(active) = self.active.as_mut() else {
            return Err(self.invalid("step"));
        };
        let result = active.step(&self.grid, &mut self.context);

        self.stats.nodes_expanded = self.context.nodes_expanded;
        self.stats.frontier_size = self.context.frontier_size;
        self.stats.depth_limit = active.depth_limit();
        self.stats.elapsed = self.clock.elapsed();

        match result {
            StepResult::Continue => {
                self.stats.status = active.status();
            }
            StepResult::Found(path) => {
                let blocked: Vec<Position> = path
                    .cells()
                    .iter()
                    .copied()
                    .filter(|pos| !self.grid.is_traversable(*pos))
                    .collect();
                if !blocked.is_empty() {
                    self.replan(&blocked);
                    return Ok(self.state);
                }
                self.stats.status = active.found_status();
                self.stats.path_length = path.len();
                self.stats.path_cost = path.cost();
                self.path = path;
                self.finish(Outcome::Success);
            }
            StepResult::Exhausted(reason) => {
                self.stats.status = match (reason, active.depth_limit()) {
                    (FailureReason::DepthExceeded, Some(limit)) => {
                        format!("No path within depth {}", limit)
                    }
                    _ => "No path found".to_string(),
                };
                self.finish(Outcome::Failure(reason));
            }
        }
        Ok(self.state)
    }

    /// Steps until the run finishes.
    pub fn run_to_completion(&mut self) -> Result<RunState> {
        if self.state != RunState::Running {
            return Err(self.invalid("run to completion"));
        }
        while self.state == RunState::Running {
            self.step()?;
        }
        Ok(self.state)
    }

    pub fn pause(&mut self) -> Result<()> {
        if self.state != RunState::Running {
            return Err(self.invalid("pause"));
        }
        self.clock.pause();
        self.stats.elapsed = self.clock.elapsed();
        self.stats.status = "Paused".to_string();
        self.state = RunState::Paused;
        debug!("{} paused after {} expansions", self.algorithm, self.stats.nodes_expanded);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        if self.state != RunState::Paused {
            return Err(self.invalid("resume"));
        }
        if let Some(active) = self.active.as_ref() {
            self.stats.status = active.status();
        }
        self.clock.resume();
        self.state = RunState::Running;
        Ok(())
    }

    /// Stops a running or paused search and discards its in-flight state.
    pub fn cancel(&mut self) -> Result<()> {
        if !self.state.in_progress() {
            return Err(self.invalid("cancel"));
        }
        self.stats.status = "Cancelled".to_string();
        self.finish(Outcome::Failure(FailureReason::Cancelled));
        Ok(())
    }

    /// Returns to `Idle` from any state, clearing run results and transient
    /// obstacles.
    pub fn reset_search(&mut self) {
        self.clear_run();
        self.stats.status = "Ready".to_string();
        self.grid.clear_dynamic_obstacles();
        self.state = RunState::Idle;
    }

    /// Resets the search and restores the grid to its initial layout.
    pub fn reset_grid(&mut self) {
        self.reset_search();
        self.grid.reset();
    }

    /// Path of a successful run, or the reason there is none.
    pub fn outcome(&self) -> Result<&Path> {
        match self.state {
            RunState::Finished(Outcome::Success) => Ok(&self.path),
            RunState::Finished(Outcome::Failure(FailureReason::NoPath)) => Err(SearchError::NoPath),
            RunState::Finished(Outcome::Failure(FailureReason::DepthExceeded)) => {
                Err(SearchError::DepthExceeded {
                    limit: self.stats.depth_limit.unwrap_or(self.depth_limit),
                })
            }
            _ => Err(self.invalid("read the outcome")),
        }
    }

    /// Drops a search whose found path crosses cells blocked after they were
    /// expanded and searches again from the start on the current grid.
    /// Expansion counts carry over.
    fn replan(&mut self, blocked: &[Position]) {
        info!(
            "{} path crossed {} blocked cell(s), first at {}; replanning",
            self.algorithm,
            blocked.len(),
            blocked[0]
        );
        self.context.clear_sets();
        let active = self.algorithm.build(&self.grid, self.depth_limit);
        self.stats.status = active.status();
        self.stats.depth_limit = active.depth_limit();
        self.stats.frontier_size = 0;
        self.stats.replans += 1;
        self.active = Some(active);
    }

    fn clear_run(&mut self) {
        self.active = None;
        self.context.clear();
        self.path = Path::default();
        self.stats = RunStats::new();
        self.clock.reset();
    }

    fn finish(&mut self, outcome: Outcome) {
        self.clock.pause();
        self.stats.elapsed = self.clock.elapsed();
        self.active = None;
        self.state = RunState::Finished(outcome);
        info!(
            "{} {}: {} expanded, path length {}",
            self.algorithm, self.state, self.stats.nodes_expanded, self.stats.path_length
        );
    }
}
