use crate::algorithms::common::{FailureReason, SearchAlgorithm, SearchContext, StepResult};
use crate::grid::{Grid, Position};
use crate::neighbors::successors;
use crate::node::{NodeArena, NodeId};
use rustc_hash::FxHashSet;

/// Depth-first search over an explicit stack. Neighbors are pushed in
/// reverse so that `Up` is explored first.
pub struct Dfs {
    arena: NodeArena,
    stack: Vec<NodeId>,
    visited: FxHashSet<Position>,
    target: Position,
}

impl Dfs {
    pub fn new(grid: &Grid) -> Self {
        let mut arena = NodeArena::new();
        let root = arena.root(grid.start());
        let mut visited = FxHashSet::default();
        visited.insert(grid.start());
        Dfs {
            arena,
            stack: vec![root],
            visited,
            target: grid.target(),
        }
    }
}

impl SearchAlgorithm for Dfs {
    fn name(&self) -> &'static str {
        "DFS"
    }

    fn step(&mut self, grid: &Grid, ctx: &mut SearchContext) -> StepResult {
        let current = loop {
            let Some(id) = self.stack.pop() else {
                ctx.frontier_size = 0;
                return StepResult::Exhausted(FailureReason::NoPath);
            };
            let pos = self.arena.get(id).pos;
            if grid.is_traversable(pos) {
                break id;
            }
            ctx.frontier.remove(&pos);
            self.visited.remove(&pos);
        };

        let pos = self.arena.get(current).pos;
        ctx.expand(pos);

        if pos == self.target {
            ctx.frontier_size = self.stack.len();
            return StepResult::Found(self.arena.reconstruct(current));
        }

        for succ in successors(grid, pos).into_iter().rev() {
            if self.visited.insert(succ.pos) {
                let child = self.arena.child(current, succ.pos, succ.cost);
                self.stack.push(child);
                ctx.frontier.insert(succ.pos);
            }
        }

        ctx.frontier_size = self.stack.len();
        StepResult::Continue
    }
}
