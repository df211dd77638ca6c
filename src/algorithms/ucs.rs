use crate::algorithms::common::{FailureReason, SearchAlgorithm, SearchContext, StepResult};
use crate::grid::{Grid, Position};
use crate::neighbors::successors;
use crate::node::{NodeArena, NodeId};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Priority queue entry. `Ord` is reversed to make the `BinaryHeap` a
/// min-heap, with ties broken by insertion order.
#[derive(Clone, Copy)]
struct Entry {
    cost: f64,
    seq: u64,
    node: NodeId,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Uniform-cost search. Duplicate heap entries are allowed; an entry whose
/// cell is already explored is discarded when popped.
pub struct Ucs {
    arena: NodeArena,
    heap: BinaryHeap<Entry>,
    best: FxHashMap<Position, f64>,
    next_seq: u64,
    target: Position,
}

impl Ucs {
    pub fn new(grid: &Grid) -> Self {
        let mut ucs = Ucs {
            arena: NodeArena::new(),
            heap: BinaryHeap::new(),
            best: FxHashMap::default(),
            next_seq: 0,
            target: grid.target(),
        };
        let root = ucs.arena.root(grid.start());
        ucs.best.insert(grid.start(), 0.0);
        ucs.push(root, 0.0);
        ucs
    }

    fn push(&mut self, node: NodeId, cost: f64) {
        self.heap.push(Entry {
            cost,
            seq: self.next_seq,
            node,
        });
        self.next_seq += 1;
    }
}

impl SearchAlgorithm for Ucs {
    fn name(&self) -> &'static str {
        "UCS"
    }

    fn step(&mut self, grid: &Grid, ctx: &mut SearchContext) -> StepResult {
        let current = loop {
            let Some(entry) = self.heap.pop() else {
                ctx.frontier_size = 0;
                return StepResult::Exhausted(FailureReason::NoPath);
            };
            let pos = self.arena.get(entry.node).pos;
            if ctx.explored.contains(&pos) {
                continue;
            }
            if grid.is_traversable(pos) {
                break entry.node;
            }
            ctx.frontier.remove(&pos);
            self.best.remove(&pos);
        };

        let node = *self.arena.get(current);
        ctx.expand(node.pos);

        if node.pos == self.target {
            ctx.frontier_size = self.heap.len();
            return StepResult::Found(self.arena.reconstruct(current));
        }

        for succ in successors(grid, node.pos) {
            if ctx.explored.contains(&succ.pos) {
                continue;
            }
            let cost = node.cost + succ.cost;
            let improves = self.best.get(&succ.pos).map_or(true, |known| cost < *known);
            if improves {
                self.best.insert(succ.pos, cost);
                let child = self.arena.child(current, succ.pos, succ.cost);
                self.push(child, cost);
                ctx.frontier.insert(succ.pos);
            }
        }

        ctx.frontier_size = self.heap.len();
        StepResult::Continue
    }
}
