use crate::algorithms::common::{FailureReason, SearchAlgorithm, SearchContext, StepResult};
use crate::grid::{Grid, Position};
use crate::neighbors::successors;
use crate::node::{NodeArena, NodeId};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Forward,
    Backward,
}

#[derive(Default)]
struct Frontier {
    queue: VecDeque<NodeId>,
    visited: FxHashMap<Position, NodeId>,
}

impl Frontier {
    fn rooted(arena: &mut NodeArena, pos: Position) -> Self {
        let root = arena.root(pos);
        let mut frontier = Frontier::default();
        frontier.queue.push_back(root);
        frontier.visited.insert(pos, root);
        frontier
    }
}

/// Two breadth-first searches, one from the start and one from the target,
/// expanded alternately one node at a time.
///
/// A side checks its freshly popped cell against the other side's visited
/// map before queueing its own neighbors. Every queued cell is in its side's
/// visited map, so a cell still queued on one side can only be expanded by
/// the other as the meeting cell.
pub struct Bidirectional {
    arena: NodeArena,
    forward: Frontier,
    backward: Frontier,
    next: Side,
}

impl Bidirectional {
    pub fn new(grid: &Grid) -> Self {
        let mut arena = NodeArena::new();
        let forward = Frontier::rooted(&mut arena, grid.start());
        let backward = Frontier::rooted(&mut arena, grid.target());
        Bidirectional {
            arena,
            forward,
            backward,
            next: Side::Forward,
        }
    }

    /// Expands one live node from `side`, or returns `None` if that side has
    /// nothing left to expand.
    fn expand(&mut self, side: Side, grid: &Grid, ctx: &mut SearchContext) -> Option<StepResult> {
        let (own, other) = match side {
            Side::Forward => (&mut self.forward, &self.backward),
            Side::Backward => (&mut self.backward, &self.forward),
        };

        let current = loop {
            let id = own.queue.pop_front()?;
            let pos = self.arena.get(id).pos;
            if grid.is_traversable(pos) {
                break id;
            }
            ctx.frontier.remove(&pos);
            own.visited.remove(&pos);
        };

        let pos = self.arena.get(current).pos;
        ctx.expand(pos);

        if let Some(&meet) = other.visited.get(&pos) {
            let path = match side {
                Side::Forward => self.arena.join(current, meet),
                Side::Backward => self.arena.join(meet, current),
            };
            return Some(StepResult::Found(path));
        }

        for succ in successors(grid, pos) {
            if !own.visited.contains_key(&succ.pos) {
                let child = self.arena.child(current, succ.pos, succ.cost);
                own.visited.insert(succ.pos, child);
                own.queue.push_back(child);
                ctx.frontier.insert(succ.pos);
            }
        }
        Some(StepResult::Continue)
    }
}

impl SearchAlgorithm for Bidirectional {
    fn name(&self) -> &'static str {
        "Bidirectional"
    }

    fn found_status(&self) -> String {
        "Paths met".to_string()
    }

    fn step(&mut self, grid: &Grid, ctx: &mut SearchContext) -> StepResult {
        let order = match self.next {
            Side::Forward => [Side::Forward, Side::Backward],
            Side::Backward => [Side::Backward, Side::Forward],
        };

        for side in order {
            if let Some(result) = self.expand(side, grid, ctx) {
                self.next = match side {
                    Side::Forward => Side::Backward,
                    Side::Backward => Side::Forward,
                };
                ctx.frontier_size = self.forward.queue.len() + self.backward.queue.len();
                return result;
            }
        }

        ctx.frontier_size = 0;
        StepResult::Exhausted(FailureReason::NoPath)
    }
}
