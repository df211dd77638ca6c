pub mod bfs;
pub mod bidirectional;
pub mod common;
pub mod depth_limited;
pub mod dfs;
pub mod ucs;

use crate::error::SearchError;
use crate::grid::Grid;
use std::fmt;
use std::str::FromStr;

pub use bfs::Bfs;
pub use bidirectional::Bidirectional;
pub use common::{FailureReason, SearchAlgorithm, SearchContext, StepResult};
pub use depth_limited::{DepthLimited, IterativeDeepening, DEFAULT_DEPTH_LIMIT};
pub use dfs::Dfs;
pub use ucs::Ucs;

/// The selectable search strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmKind {
    Bfs,
    Dfs,
    Ucs,
    Dls,
    Iddfs,
    Bidirectional,
}

impl AlgorithmKind {
    pub const ALL: [AlgorithmKind; 6] = [
        AlgorithmKind::Bfs,
        AlgorithmKind::Dfs,
        AlgorithmKind::Ucs,
        AlgorithmKind::Dls,
        AlgorithmKind::Iddfs,
        AlgorithmKind::Bidirectional,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AlgorithmKind::Bfs => "BFS",
            AlgorithmKind::Dfs => "DFS",
            AlgorithmKind::Ucs => "UCS",
            AlgorithmKind::Dls => "DLS",
            AlgorithmKind::Iddfs => "IDDFS",
            AlgorithmKind::Bidirectional => "Bidirectional",
        }
    }

    /// Builds a fresh search rooted at the grid's current endpoints.
    /// `depth_limit` only applies to [`AlgorithmKind::Dls`].
    pub fn build(self, grid: &Grid, depth_limit: usize) -> Box<dyn SearchAlgorithm> {
        match self {
            AlgorithmKind::Bfs => Box::new(Bfs::new(grid)),
            AlgorithmKind::Dfs => Box::new(Dfs::new(grid)),
            AlgorithmKind::Ucs => Box::new(Ucs::new(grid)),
            AlgorithmKind::Dls => Box::new(DepthLimited::new(grid, depth_limit)),
            AlgorithmKind::Iddfs => Box::new(IterativeDeepening::new(grid)),
            AlgorithmKind::Bidirectional => Box::new(Bidirectional::new(grid)),
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlgorithmKind {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bfs" => Ok(AlgorithmKind::Bfs),
            "dfs" => Ok(AlgorithmKind::Dfs),
            "ucs" => Ok(AlgorithmKind::Ucs),
            "dls" => Ok(AlgorithmKind::Dls),
            "iddfs" => Ok(AlgorithmKind::Iddfs),
            "bidirectional" | "bidi" => Ok(AlgorithmKind::Bidirectional),
            _ => Err(SearchError::UnknownAlgorithm(s.to_string())),
        }
    }
}
