pub mod algorithms;
pub mod batch_simulation;
pub mod config;
pub mod controller;
pub mod error;
pub mod grid;
pub mod neighbors;
pub mod node;
pub mod obstacles;
pub mod render;
pub mod simulation;
pub mod statistics;
pub mod worker;

pub use algorithms::{AlgorithmKind, FailureReason, SearchAlgorithm, StepResult};
pub use controller::{Engine, Outcome, RunState, Snapshot};
pub use error::{Result, SearchError};
pub use grid::{Cell, Grid, Position};
pub use node::Path;
pub use statistics::RunStats;
pub use worker::SearchWorker;
