use crate::grid::{Grid, Position};
use std::f64::consts::SQRT_2;

/// The six legal moves. Only the main diagonal is available, so moves are
/// not symmetric under reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Right,
    Down,
    DownRight,
    Left,
    UpLeft,
}

/// Expansion order. DFS-style frontiers push these in reverse so `Up` is
/// popped first.
pub const DIRECTIONS: [Direction; 6] = [
    Direction::Up,
    Direction::Right,
    Direction::Down,
    Direction::DownRight,
    Direction::Left,
    Direction::UpLeft,
];

impl Direction {
    /// Row and column delta.
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::DownRight => (1, 1),
            Direction::Left => (0, -1),
            Direction::UpLeft => (-1, -1),
        }
    }

    pub const fn is_diagonal(self) -> bool {
        matches!(self, Direction::DownRight | Direction::UpLeft)
    }

    pub fn cost(self) -> f64 {
        if self.is_diagonal() {
            SQRT_2
        } else {
            1.0
        }
    }

    pub fn apply(self, pos: Position) -> Option<Position> {
        let (dr, dc) = self.offset();
        Some(Position::new(
            pos.row.checked_add_signed(dr)?,
            pos.col.checked_add_signed(dc)?,
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Successor {
    pub pos: Position,
    pub cost: f64,
    pub direction: Direction,
}

/// Traversable neighbors of `pos` in expansion order.
pub fn successors(grid: &Grid, pos: Position) -> Vec<Successor> {
    let mut result = Vec::with_capacity(DIRECTIONS.len());
    for direction in DIRECTIONS {
        if let Some(next) = direction.apply(pos) {
            if grid.is_traversable(next) {
                result.push(Successor {
                    pos: next,
                    cost: direction.cost(),
                    direction,
                });
            }
        }
    }
    result
}

/// Cost of a single move between two cells, counting inverse moves as legal
/// (the backward half of a bidirectional path walks them).
pub fn move_cost(from: Position, to: Position) -> Option<f64> {
    let dr = to.row as isize - from.row as isize;
    let dc = to.col as isize - from.col as isize;
    DIRECTIONS
        .iter()
        .find(|d| {
            let (r, c) = d.offset();
            (r, c) == (dr, dc) || (-r, -c) == (dr, dc)
        })
        .map(|d| d.cost())
}

pub fn is_legal_move(from: Position, to: Position) -> bool {
    move_cost(from, to).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successors_follow_fixed_order() {
        let grid = Grid::new(5, 5).unwrap();
        let dirs: Vec<_> = successors(&grid, Position::new(2, 2))
            .iter()
            .map(|s| s.direction)
            .collect();
        assert_eq!(dirs, DIRECTIONS.to_vec());
    }

    #[test]
    fn successors_filter_blocked_and_edges() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.toggle_wall(Position::new(0, 1)).unwrap();
        let succ = successors(&grid, Position::new(0, 0));
        let cells: Vec<_> = succ.iter().map(|s| s.pos).collect();
        // (1, 1) is the start cell, which is traversable.
        assert_eq!(cells, vec![Position::new(1, 0), Position::new(1, 1)]);
        assert_eq!(succ[1].cost, SQRT_2);
    }

    #[test]
    fn anti_diagonal_is_not_a_move() {
        let a = Position::new(2, 2);
        assert!(is_legal_move(a, Position::new(3, 3)));
        assert!(is_legal_move(a, Position::new(1, 1)));
        assert!(!is_legal_move(a, Position::new(1, 3)));
        assert!(!is_legal_move(a, Position::new(3, 1)));
        assert!(!is_legal_move(a, a));
        assert_eq!(move_cost(a, Position::new(2, 1)), Some(1.0));
    }
}
