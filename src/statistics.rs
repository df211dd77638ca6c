use std::fmt;
use std::time::{Duration, Instant};

/// Counters published with every snapshot. Only the engine mutates them.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStats {
    pub nodes_expanded: usize,
    pub frontier_size: usize,
    /// Cells on the path, endpoints included.
    pub path_length: usize,
    pub path_cost: f64,
    pub elapsed: Duration,
    pub status: String,
    pub depth_limit: Option<usize>,
    /// Searches restarted because a found path ran through a newly blocked cell.
    pub replans: usize,
}

impl Default for RunStats {
    fn default() -> Self {
        RunStats {
            nodes_expanded: 0,
            frontier_size: 0,
            path_length: 0,
            path_cost: 0.0,
            elapsed: Duration::ZERO,
            status: "Ready".to_string(),
            depth_limit: None,
            replans: 0,
        }
    }
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Status: {}", self.status)?;
        writeln!(f, "Nodes Expanded: {}", self.nodes_expanded)?;
        writeln!(f, "Frontier Size: {}", self.frontier_size)?;
        writeln!(f, "Path Length: {}", self.path_length)?;
        if self.path_length > 0 {
            writeln!(f, "Path Cost: {:.3}", self.path_cost)?;
        }
        if let Some(limit) = self.depth_limit {
            writeln!(f, "Depth Limit: {}", limit)?;
        }
        if self.replans > 0 {
            writeln!(f, "Replans: {}", self.replans)?;
        }
        writeln!(f, "Time: {:.3}s", self.elapsed.as_secs_f64())?;
        Ok(())
    }
}

/// Stopwatch that only accumulates while running. Pausing freezes it.
#[derive(Debug, Clone, Default)]
pub struct RunClock {
    accumulated: Duration,
    resumed_at: Option<Instant>,
}

impl RunClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resume(&mut self) {
        if self.resumed_at.is_none() {
            self.resumed_at = Some(Instant::now());
        }
    }

    pub fn pause(&mut self) {
        if let Some(since) = self.resumed_at.take() {
            self.accumulated += since.elapsed();
        }
    }

    pub fn elapsed(&self) -> Duration {
        match self.resumed_at {
            Some(since) => self.accumulated + since.elapsed(),
            None => self.accumulated,
        }
    }

    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        self.resumed_at = None;
    }
}
