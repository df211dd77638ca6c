use crate::error::{Result, SearchError};
use crate::neighbors;
use pathfinding::prelude::bfs;
use rand::Rng;
use rustc_hash::FxHashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }

    /// Chebyshev distance, the number of king moves between two cells.
    pub fn chebyshev(&self, other: &Position) -> usize {
        self.row.abs_diff(other.row).max(self.col.abs_diff(other.col))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Wall,
    Start,
    Target,
}

/// Occupancy grid with a persistent wall layout and a transient
/// dynamic-obstacle overlay.
#[derive(Debug, Clone)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
    cells: Vec<Vec<Cell>>,
    start: Position,
    target: Position,
    initial_start: Position,
    initial_target: Position,
    dynamic_obstacles: FxHashSet<Position>,
    exclusion_radius: usize,
}

impl Grid {
    /// Creates an empty grid with the default endpoints: `(1, 1)` and
    /// `(rows - 2, cols - 2)`, or the opposite corners on grids thinner than 3.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        let (start, target) = if rows >= 3 && cols >= 3 {
            (Position::new(1, 1), Position::new(rows - 2, cols - 2))
        } else {
            (
                Position::new(0, 0),
                Position::new(rows.saturating_sub(1), cols.saturating_sub(1)),
            )
        };
        Self::with_endpoints(rows, cols, start, target)
    }

    pub fn with_endpoints(
        rows: usize,
        cols: usize,
        start: Position,
        target: Position,
    ) -> Result<Self> {
        if rows == 0 || cols == 0 || rows * cols < 2 {
            return Err(SearchError::InvalidDimensions { rows, cols });
        }

        let mut grid = Grid {
            rows,
            cols,
            cells: vec![vec![Cell::Empty; cols]; rows],
            start,
            target,
            initial_start: start,
            initial_target: target,
            dynamic_obstacles: FxHashSet::default(),
            exclusion_radius: 0,
        };

        for pos in [start, target] {
            if !grid.in_bounds(pos) {
                return Err(SearchError::InvalidPlacement {
                    pos,
                    reason: "outside the grid",
                });
            }
        }
        if start == target {
            return Err(SearchError::InvalidPlacement {
                pos: start,
                reason: "start and target must differ",
            });
        }

        grid.cells[start.row][start.col] = Cell::Start;
        grid.cells[target.row][target.col] = Cell::Target;
        Ok(grid)
    }

    pub fn with_exclusion_radius(mut self, radius: usize) -> Self {
        self.exclusion_radius = radius;
        self
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn target(&self) -> Position {
        self.target
    }

    pub fn exclusion_radius(&self) -> usize {
        self.exclusion_radius
    }

    pub fn set_exclusion_radius(&mut self, radius: usize) {
        self.exclusion_radius = radius;
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.cells.get(pos.row).and_then(|row| row.get(pos.col)).copied()
    }

    pub fn is_wall(&self, pos: Position) -> bool {
        self.cell(pos) == Some(Cell::Wall)
    }

    pub fn is_dynamic_obstacle(&self, pos: Position) -> bool {
        self.dynamic_obstacles.contains(&pos)
    }

    pub fn dynamic_obstacles(&self) -> &FxHashSet<Position> {
        &self.dynamic_obstacles
    }

    pub fn is_traversable(&self, pos: Position) -> bool {
        match self.cell(pos) {
            None | Some(Cell::Wall) => false,
            Some(_) => !self.dynamic_obstacles.contains(&pos),
        }
    }

    pub fn wall_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| **c == Cell::Wall).count()
    }

    fn check_bounds(&self, pos: Position) -> Result<()> {
        if self.in_bounds(pos) {
            Ok(())
        } else {
            Err(SearchError::InvalidPlacement {
                pos,
                reason: "outside the grid",
            })
        }
    }

    fn check_unprotected(&self, pos: Position, action: &str) -> Result<()> {
        if pos == self.start || pos == self.target {
            return Err(SearchError::Rejected(format!(
                "cannot {} the start or target cell {}",
                action, pos
            )));
        }
        Ok(())
    }

    /// Moves the start cell, displacing any wall or obstacle at `pos`.
    pub fn set_start(&mut self, pos: Position) -> Result<()> {
        self.check_bounds(pos)?;
        if pos == self.target {
            return Err(SearchError::InvalidPlacement {
                pos,
                reason: "start cannot share the target cell",
            });
        }
        self.dynamic_obstacles.remove(&pos);
        self.cells[self.start.row][self.start.col] = Cell::Empty;
        self.cells[pos.row][pos.col] = Cell::Start;
        self.start = pos;
        Ok(())
    }

    /// Moves the target cell, displacing any wall or obstacle at `pos`.
    pub fn set_target(&mut self, pos: Position) -> Result<()> {
        self.check_bounds(pos)?;
        if pos == self.start {
            return Err(SearchError::InvalidPlacement {
                pos,
                reason: "target cannot share the start cell",
            });
        }
        self.dynamic_obstacles.remove(&pos);
        self.cells[self.target.row][self.target.col] = Cell::Empty;
        self.cells[pos.row][pos.col] = Cell::Target;
        self.target = pos;
        Ok(())
    }

    /// Flips the wall state of `pos` and returns whether it is now a wall.
    pub fn toggle_wall(&mut self, pos: Position) -> Result<bool> {
        self.check_bounds(pos)?;
        self.check_unprotected(pos, "wall")?;
        let cell = &mut self.cells[pos.row][pos.col];
        if *cell == Cell::Wall {
            *cell = Cell::Empty;
            Ok(false)
        } else {
            *cell = Cell::Wall;
            self.dynamic_obstacles.remove(&pos);
            Ok(true)
        }
    }

    pub fn erase(&mut self, pos: Position) -> Result<()> {
        self.check_bounds(pos)?;
        self.check_unprotected(pos, "erase")?;
        self.cells[pos.row][pos.col] = Cell::Empty;
        self.dynamic_obstacles.remove(&pos);
        Ok(())
    }

    pub fn add_dynamic_obstacle(&mut self, pos: Position) -> Result<()> {
        self.check_bounds(pos)?;
        self.check_unprotected(pos, "block")?;
        if self.is_wall(pos) {
            return Err(SearchError::Rejected(format!("{} is already a wall", pos)));
        }
        if self.dynamic_obstacles.contains(&pos) {
            return Err(SearchError::Rejected(format!("{} is already blocked", pos)));
        }
        if pos.chebyshev(&self.start) <= self.exclusion_radius
            || pos.chebyshev(&self.target) <= self.exclusion_radius
        {
            return Err(SearchError::Rejected(format!(
                "{} is within {} cells of the start or target",
                pos, self.exclusion_radius
            )));
        }
        self.dynamic_obstacles.insert(pos);
        Ok(())
    }

    pub fn clear_dynamic_obstacles(&mut self) {
        self.dynamic_obstacles.clear();
    }

    /// Clears every wall and obstacle and restores the endpoints the grid
    /// was created with.
    pub fn reset(&mut self) {
        for row in self.cells.iter_mut() {
            row.fill(Cell::Empty);
        }
        self.dynamic_obstacles.clear();
        self.start = self.initial_start;
        self.target = self.initial_target;
        self.cells[self.start.row][self.start.col] = Cell::Start;
        self.cells[self.target.row][self.target.col] = Cell::Target;
    }

    /// Places up to `num_walls` walls at random empty cells and returns how
    /// many were placed.
    pub fn scatter_walls<R: Rng>(&mut self, num_walls: usize, rng: &mut R) -> usize {
        let mut walls_placed = 0;
        let mut attempts = 0;
        while walls_placed < num_walls && attempts < num_walls * 3 {
            let pos = Position::new(rng.gen_range(0..self.rows), rng.gen_range(0..self.cols));
            if self.cells[pos.row][pos.col] == Cell::Empty {
                self.cells[pos.row][pos.col] = Cell::Wall;
                self.dynamic_obstacles.remove(&pos);
                walls_placed += 1;
            }
            attempts += 1;
        }
        walls_placed
    }

    /// Reference hop distance from start to target under the current
    /// occupancy, or `None` when the target is unreachable.
    pub fn shortest_hops(&self) -> Option<usize> {
        bfs(
            &self.start,
            |p| {
                neighbors::successors(self, *p)
                    .into_iter()
                    .map(|s| s.pos)
                    .collect::<Vec<_>>()
            },
            |p| *p == self.target,
        )
        .map(|path| path.len() - 1)
    }
}
