use crate::grid::{Grid, Position};
use crate::node::Path;
use rustc_hash::FxHashSet;
use std::fmt;

/// Why a run ended without a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    NoPath,
    DepthExceeded,
    Cancelled,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::NoPath => write!(f, "no path"),
            FailureReason::DepthExceeded => write!(f, "depth exceeded"),
            FailureReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Outcome of a single expansion.
#[derive(Debug, Clone, PartialEq)]
pub enum StepResult {
    Continue,
    Found(Path),
    Exhausted(FailureReason),
}

/// Observable bookkeeping shared by every algorithm: the explored set, the
/// frontier cells (for display) and expansion counters.
#[derive(Debug, Clone, Default)]
pub struct SearchContext {
    pub explored: FxHashSet<Position>,
    pub frontier: FxHashSet<Position>,
    pub nodes_expanded: usize,
    pub frontier_size: usize,
}

impl SearchContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the expansion of `pos`.
    pub fn expand(&mut self, pos: Position) {
        self.explored.insert(pos);
        self.frontier.remove(&pos);
        self.nodes_expanded += 1;
    }

    /// Clears the explored and frontier sets but keeps the counters.
    pub fn clear_sets(&mut self) {
        self.explored.clear();
        self.frontier.clear();
        self.frontier_size = 0;
    }

    pub fn clear(&mut self) {
        self.clear_sets();
        self.nodes_expanded = 0;
    }
}

pub trait SearchAlgorithm: Send {
    fn name(&self) -> &'static str;

    /// Expands at most one node. Frontier entries whose cell is no longer
    /// traversable are dropped without counting as an expansion.
    fn step(&mut self, grid: &Grid, ctx: &mut SearchContext) -> StepResult;

    /// Status tag while the search is in progress.
    fn status(&self) -> String {
        format!("Running {}", self.name())
    }

    /// Status tag once a path has been found.
    fn found_status(&self) -> String {
        "Path found".to_string()
    }

    /// Depth bound currently in force, for depth-limited variants.
    fn depth_limit(&self) -> Option<usize> {
        None
    }
}
