use crate::controller::Snapshot;
use crate::grid::{Cell, Grid, Position};
use std::fmt::Write;

pub const LEGEND: &str =
    "Legend: S=Start, T=Target, #=Wall, O=Obstacle, *=Path, x=Explored, +=Frontier, .=Empty";

fn glyph(grid: &Grid, snapshot: &Snapshot, pos: Position) -> char {
    match grid.cell(pos) {
        Some(Cell::Start) => 'S',
        Some(Cell::Target) => 'T',
        Some(Cell::Wall) => '#',
        _ if snapshot.dynamic_obstacles.contains(&pos) => 'O',
        _ if snapshot.path.contains(&pos) => '*',
        _ if snapshot.explored.contains(&pos) => 'x',
        _ if snapshot.frontier.contains(&pos) => '+',
        _ => '.',
    }
}

/// Text frame of the grid with the snapshot's search overlay.
pub fn render_frame(grid: &Grid, snapshot: &Snapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", LEGEND);

    out.push_str("   ");
    for col in 0..grid.cols {
        let _ = write!(out, "{:2}", col % 10);
    }
    out.push('\n');

    for row in 0..grid.rows {
        let _ = write!(out, "{:2} ", row);
        for col in 0..grid.cols {
            out.push(glyph(grid, snapshot, Position::new(row, col)));
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

/// Clears the terminal, for paced visualization.
pub fn clear_screen() {
    print!("\x1B[2J\x1B[1;1H");
}
