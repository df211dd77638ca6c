//! Arena-allocated search nodes and path reconstruction.

use crate::grid::Position;
use crate::neighbors::move_cost;

/// Index of a node inside a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchNode {
    pub pos: Position,
    pub cost: f64,
    pub depth: usize,
    pub parent: Option<NodeId>,
}

/// Growable node store for one run. Parents are referenced by index and the
/// whole tree is dropped together when the run resets.
#[derive(Debug, Default, Clone)]
pub struct NodeArena {
    nodes: Vec<SearchNode>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&mut self, pos: Position) -> NodeId {
        self.push(SearchNode {
            pos,
            cost: 0.0,
            depth: 0,
            parent: None,
        })
    }

    /// Adds a child of `parent` reached with a move of `step_cost`.
    pub fn child(&mut self, parent: NodeId, pos: Position, step_cost: f64) -> NodeId {
        let p = self.nodes[parent.0];
        self.push(SearchNode {
            pos,
            cost: p.cost + step_cost,
            depth: p.depth + 1,
            parent: Some(parent),
        })
    }

    fn push(&mut self, node: SearchNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    /// Walks parent links from `id` back to its root, returned root first.
    pub fn reconstruct(&self, id: NodeId) -> Path {
        let mut cells = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.get(node_id);
            cells.push(node.pos);
            current = node.parent;
        }
        cells.reverse();
        Path::new(cells)
    }

    /// Joins a forward tree node and a backward tree node that sit on the
    /// same cell. The shared cell appears once.
    pub fn join(&self, forward: NodeId, backward: NodeId) -> Path {
        let mut cells = self.reconstruct(forward).cells;
        let back = self.reconstruct(backward).cells;
        cells.extend(back.iter().rev().skip(1));
        Path::new(cells)
    }
}

/// Ordered cells from start to target inclusive. Empty means not found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    cells: Vec<Position>,
}

impl Path {
    pub fn new(cells: Vec<Position>) -> Self {
        Path { cells }
    }

    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    /// Number of cells on the path.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn hops(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    pub fn contains(&self, pos: &Position) -> bool {
        self.cells.contains(pos)
    }

    /// Total move cost with diagonal steps weighted by sqrt(2). Pairs that
    /// are not a legal move contribute nothing.
    pub fn cost(&self) -> f64 {
        self.cells
            .windows(2)
            .filter_map(|w| move_cost(w[0], w[1]))
            .sum()
    }

    /// Every consecutive pair is a legal move.
    pub fn is_connected(&self) -> bool {
        self.cells.windows(2).all(|w| move_cost(w[0], w[1]).is_some())
    }
}
