use crate::algorithms::common::{FailureReason, SearchAlgorithm, SearchContext, StepResult};
use crate::grid::{Grid, Position};
use crate::neighbors::successors;
use crate::node::{NodeArena, NodeId};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// Breadth-first search. Cells are marked visited when discovered, so the
/// first path to the target is the shortest by hop count.
pub struct Bfs {
    arena: NodeArena,
    queue: VecDeque<NodeId>,
    visited: FxHashSet<Position>,
    target: Position,
}

impl Bfs {
    pub fn new(grid: &Grid) -> Self {
        let mut arena = NodeArena::new();
        let root = arena.root(grid.start());
        let mut visited = FxHashSet::default();
        visited.insert(grid.start());
        Bfs {
            arena,
            queue: VecDeque::from([root]),
            visited,
            target: grid.target(),
        }
    }
}

impl SearchAlgorithm for Bfs {
    fn name(&self) -> &'static str {
        "BFS"
    }

    fn step(&mut self, grid: &Grid, ctx: &mut SearchContext) -> StepResult {
        let current = loop {
            let Some(id) = self.queue.pop_front() else {
                ctx.frontier_size = 0;
                return StepResult::Exhausted(FailureReason::NoPath);
            };
            let pos = self.arena.get(id).pos;
            if grid.is_traversable(pos) {
                break id;
            }
            // Blocked since discovery; forget it so it can be found again.
            ctx.frontier.remove(&pos);
            self.visited.remove(&pos);
        };

        let pos = self.arena.get(current).pos;
        ctx.expand(pos);

        if pos == self.target {
            ctx.frontier_size = self.queue.len();
            return StepResult::Found(self.arena.reconstruct(current));
        }

        for succ in successors(grid, pos) {
            if self.visited.insert(succ.pos) {
                let child = self.arena.child(current, succ.pos, succ.cost);
                self.queue.push_back(child);
                ctx.frontier.insert(succ.pos);
            }
        }

        ctx.frontier_size = self.queue.len();
        StepResult::Continue
    }
}
