//! Error types for the search engine

use crate::controller::RunState;
use crate::grid::Position;
use thiserror::Error;

/// Search engine error type
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("invalid placement at {pos}: {reason}")]
    InvalidPlacement { pos: Position, reason: &'static str },

    #[error("edit rejected: {0}")]
    Rejected(String),

    #[error("no path exists between start and target")]
    NoPath,

    #[error("no path within depth limit {limit}")]
    DepthExceeded { limit: usize },

    #[error("cannot {command} while {state}")]
    InvalidState {
        command: &'static str,
        state: RunState,
    },

    #[error("grid of {rows}x{cols} cannot hold a start and a target")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("unknown algorithm '{0}', expected one of bfs, dfs, ucs, dls, iddfs, bidirectional")]
    UnknownAlgorithm(String),

    #[error("configuration error: {0}")]
    InvalidConfig(String),

    #[error("search worker is no longer running")]
    WorkerDisconnected,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SearchError>;
