//! Read-only query interface consumed by the encoder

use super::{AgentSpec, Direction, LaserSpec, Position};

/// Queries the constraint generators are allowed to make about a world.
///
/// Implementations must be immutable for the duration of a solve.
pub trait WorldView: Sync {
    /// Grid size as `(height, width)`
    fn dimensions(&self) -> (usize, usize);

    /// All agents, in row-major order of their start cells
    fn agents(&self) -> Vec<AgentSpec>;

    /// All laser sources, in row-major order
    fn lasers(&self) -> Vec<LaserSpec>;

    fn walls(&self) -> Vec<Position>;

    fn exits(&self) -> Vec<Position>;

    fn is_wall(&self, pos: Position) -> bool;

    /// Every cell of the grid, row-major
    fn positions(&self) -> Vec<Position> {
        let (height, width) = self.dimensions();
        (0..height)
            .flat_map(|row| (0..width).map(move |col| (row, col)))
            .collect()
    }

    /// In-bounds neighbours, east/south/west/north first, then diagonals if requested
    fn neighbors(&self, pos: Position, include_diagonals: bool) -> Vec<Position> {
        let mut deltas = vec![(0, 1), (1, 0), (0, -1), (-1, 0)];
        if include_diagonals {
            deltas.extend([(1, 1), (-1, -1), (1, -1), (-1, 1)]);
        }

        deltas
            .into_iter()
            .filter_map(|delta| self.shift(pos, delta))
            .collect()
    }

    /// The in-bounds cell one step from `pos` in `direction`
    fn offset(&self, pos: Position, direction: Direction) -> Option<Position> {
        self.shift(pos, direction.delta())
    }

    /// Apply a signed delta, returning `None` when it leaves the grid
    fn shift(&self, pos: Position, (dr, dc): (isize, isize)) -> Option<Position> {
        let (height, width) = self.dimensions();
        let row = pos.0 as isize + dr;
        let col = pos.1 as isize + dc;
        if row >= 0 && row < height as isize && col >= 0 && col < width as isize {
            Some((row as usize, col as usize))
        } else {
            None
        }
    }
}
