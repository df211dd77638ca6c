use crate::algorithms::common::{FailureReason, SearchAlgorithm, SearchContext, StepResult};
use crate::grid::{Grid, Position};
use crate::neighbors::successors;
use crate::node::{NodeArena, NodeId};
use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

/// Default bound for depth-limited search.
pub const DEFAULT_DEPTH_LIMIT: usize = 20;

/// One depth-limited pass: a stack-based DFS that never expands children
/// past `limit` moves from the start.
///
/// A cell is marked on discovery together with the depth it was reached at.
/// It is re-opened only when a strictly shallower route turns up, so every
/// cell within `limit` moves is eventually expanded at its true depth.
pub struct DepthLimited {
    arena: NodeArena,
    stack: Vec<NodeId>,
    depth_of: FxHashMap<Position, usize>,
    limit: usize,
    target: Position,
    beyond: FxHashSet<Position>,
}

impl DepthLimited {
    pub fn new(grid: &Grid, limit: usize) -> Self {
        let mut arena = NodeArena::new();
        let root = arena.root(grid.start());
        let mut depth_of = FxHashMap::default();
        depth_of.insert(grid.start(), 0);
        DepthLimited {
            arena,
            stack: vec![root],
            depth_of,
            limit,
            target: grid.target(),
            beyond: FxHashSet::default(),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Whether some cell seen past the bound was never reached within it.
    pub fn was_cut_off(&self) -> bool {
        self.beyond.iter().any(|p| !self.depth_of.contains_key(p))
    }
}

impl SearchAlgorithm for DepthLimited {
    fn name(&self) -> &'static str {
        "DLS"
    }

    fn status(&self) -> String {
        format!("Running DLS (limit={})", self.limit)
    }

    fn depth_limit(&self) -> Option<usize> {
        Some(self.limit)
    }

    fn step(&mut self, grid: &Grid, ctx: &mut SearchContext) -> StepResult {
        let current = loop {
            let Some(id) = self.stack.pop() else {
                ctx.frontier_size = 0;
                let reason = if self.was_cut_off() {
                    FailureReason::DepthExceeded
                } else {
                    FailureReason::NoPath
                };
                return StepResult::Exhausted(reason);
            };
            let node = self.arena.get(id);
            if self.depth_of.get(&node.pos).is_some_and(|d| *d < node.depth) {
                // A shallower copy was pushed later and already handled.
                continue;
            }
            if grid.is_traversable(node.pos) {
                break id;
            }
            ctx.frontier.remove(&node.pos);
            self.depth_of.remove(&node.pos);
        };

        let node = *self.arena.get(current);
        ctx.expand(node.pos);

        if node.pos == self.target {
            ctx.frontier_size = self.stack.len();
            return StepResult::Found(self.arena.reconstruct(current));
        }

        let succ = successors(grid, node.pos);
        if node.depth < self.limit {
            let depth = node.depth + 1;
            for s in succ.into_iter().rev() {
                let shallower = self.depth_of.get(&s.pos).map_or(true, |d| depth < *d);
                if shallower {
                    self.depth_of.insert(s.pos, depth);
                    let child = self.arena.child(current, s.pos, s.cost);
                    self.stack.push(child);
                    ctx.frontier.insert(s.pos);
                }
            }
        } else {
            for s in succ {
                if !self.depth_of.contains_key(&s.pos) {
                    self.beyond.insert(s.pos);
                }
            }
        }

        ctx.frontier_size = self.stack.len();
        StepResult::Continue
    }
}

/// Iterative deepening: depth-limited passes with limit 1, 2, 3, ... until
/// one finds the target or a pass finishes without hitting the bound.
pub struct IterativeDeepening {
    pass: DepthLimited,
    max_limit: usize,
}

impl IterativeDeepening {
    pub fn new(grid: &Grid) -> Self {
        IterativeDeepening {
            pass: DepthLimited::new(grid, 1),
            max_limit: grid.rows * grid.cols,
        }
    }

    pub fn current_limit(&self) -> usize {
        self.pass.limit()
    }
}

impl SearchAlgorithm for IterativeDeepening {
    fn name(&self) -> &'static str {
        "IDDFS"
    }

    fn status(&self) -> String {
        format!("IDDFS - trying depth {}", self.pass.limit())
    }

    fn found_status(&self) -> String {
        format!("Found at depth {}", self.pass.limit())
    }

    fn depth_limit(&self) -> Option<usize> {
        Some(self.pass.limit())
    }

    fn step(&mut self, grid: &Grid, ctx: &mut SearchContext) -> StepResult {
        loop {
            match self.pass.step(grid, ctx) {
                StepResult::Exhausted(FailureReason::DepthExceeded)
                    if self.pass.limit() < self.max_limit =>
                {
                    let limit = self.pass.limit() + 1;
                    debug!("IDDFS deepening to limit {}", limit);
                    ctx.clear_sets();
                    self.pass = DepthLimited::new(grid, limit);
                }
                StepResult::Exhausted(_) => return StepResult::Exhausted(FailureReason::NoPath),
                other => return other,
            }
        }
    }
}
