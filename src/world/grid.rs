//! Grid-backed world representation

use super::{AgentSpec, Cell, LaserSpec, Position, WorldView};
use anyhow::Result;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A rectangular level: one [`Cell`] per position, stored row-major
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Cell>,
}

impl World {
    /// Create an empty world
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    /// Create a world from rows of cells
    pub fn from_cells(cells: Vec<Vec<Cell>>) -> Result<Self> {
        if cells.is_empty() {
            anyhow::bail!("World cannot be empty");
        }

        let height = cells.len();
        let width = cells[0].len();

        if width == 0 {
            anyhow::bail!("World width cannot be zero");
        }

        for (i, row) in cells.iter().enumerate() {
            if row.len() != width {
                anyhow::bail!("Row {} has length {}, expected {}", i, row.len(), width);
            }
        }

        let world = Self {
            width,
            height,
            cells: cells.into_iter().flatten().collect(),
        };
        world.validate()?;
        Ok(world)
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    /// Cell at `pos`; out-of-bounds positions read as walls
    pub fn get(&self, pos: Position) -> Cell {
        let (row, col) = pos;
        if row < self.height && col < self.width {
            self.cells[self.index(row, col)]
        } else {
            Cell::Wall
        }
    }

    /// Place an entity, replacing whatever the cell held
    pub fn set(&mut self, pos: Position, cell: Cell) -> Result<()> {
        let (row, col) = pos;
        if row >= self.height || col >= self.width {
            anyhow::bail!("Position ({}, {}) out of bounds for {}x{} world", row, col, self.height, self.width);
        }
        let idx = self.index(row, col);
        self.cells[idx] = cell;
        Ok(())
    }

    pub fn is_within_bounds(&self, pos: Position) -> bool {
        pos.0 < self.height && pos.1 < self.width
    }

    /// Reject worlds where two agents share a color
    pub fn validate(&self) -> Result<()> {
        let duplicates: Vec<_> = self
            .agents()
            .iter()
            .map(|agent| agent.color)
            .duplicates()
            .collect();

        if !duplicates.is_empty() {
            anyhow::bail!("Agent colors must be unique, duplicated: {:?}", duplicates);
        }
        Ok(())
    }

    /// All cells holding `predicate`-matching content, row-major
    fn cells_matching(&self, predicate: impl Fn(&Cell) -> bool) -> Vec<(Position, Cell)> {
        WorldView::positions(self)
            .into_iter()
            .map(|pos| (pos, self.get(pos)))
            .filter(|(_, cell)| predicate(cell))
            .collect()
    }
}

impl WorldView for World {
    fn dimensions(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    fn agents(&self) -> Vec<AgentSpec> {
        self.cells_matching(|cell| matches!(cell, Cell::Agent(_)))
            .into_iter()
            .filter_map(|(position, cell)| match cell {
                Cell::Agent(color) => Some(AgentSpec { color, position }),
                _ => None,
            })
            .collect()
    }

    fn lasers(&self) -> Vec<LaserSpec> {
        self.cells_matching(|cell| matches!(cell, Cell::Laser { .. }))
            .into_iter()
            .filter_map(|(position, cell)| match cell {
                Cell::Laser { color, direction } => Some(LaserSpec { color, direction, position }),
                _ => None,
            })
            .collect()
    }

    fn walls(&self) -> Vec<Position> {
        self.cells_matching(Cell::is_wall)
            .into_iter()
            .map(|(pos, _)| pos)
            .collect()
    }

    fn exits(&self) -> Vec<Position> {
        self.cells_matching(|cell| matches!(cell, Cell::Exit))
            .into_iter()
            .map(|(pos, _)| pos)
            .collect()
    }

    fn is_wall(&self, pos: Position) -> bool {
        self.get(pos).is_wall()
    }
}

impl fmt::Display for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            let line = (0..self.width)
                .map(|col| format!("{:<4}", self.get((row, col)).token()))
                .join("");
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Direction;

    fn sample_world() -> World {
        let mut world = World::new(3, 2);
        world.set((0, 0), Cell::Agent(1)).unwrap();
        world.set((0, 2), Cell::Agent(0)).unwrap();
        world.set((1, 1), Cell::Wall).unwrap();
        world.set((1, 2), Cell::Exit).unwrap();
        world.set((1, 0), Cell::Laser { color: 0, direction: Direction::North }).unwrap();
        world
    }

    #[test]
    fn test_world_creation() {
        let world = World::new(4, 3);
        assert_eq!(world.width, 4);
        assert_eq!(world.height, 3);
        assert_eq!(world.cells.len(), 12);
        assert!(world.agents().is_empty());
        assert_eq!(world.positions().len(), 12);
    }

    #[test]
    fn test_entity_queries() {
        let world = sample_world();

        let agents = world.agents();
        assert_eq!(agents.len(), 2);
        assert_eq!(agents[0], AgentSpec { color: 1, position: (0, 0) });
        assert_eq!(agents[1], AgentSpec { color: 0, position: (0, 2) });

        assert_eq!(world.walls(), vec![(1, 1)]);
        assert_eq!(world.exits(), vec![(1, 2)]);
        assert_eq!(world.lasers()[0].direction, Direction::North);
        assert!(world.is_wall((1, 1)));
        assert!(!world.is_wall((0, 1)));
    }

    #[test]
    fn test_neighbors() {
        let world = World::new(3, 3);
        assert_eq!(world.neighbors((0, 0), false), vec![(0, 1), (1, 0)]);
        assert_eq!(world.neighbors((1, 1), false), vec![(1, 2), (2, 1), (1, 0), (0, 1)]);
        assert_eq!(world.neighbors((1, 1), true).len(), 8);
        assert_eq!(world.neighbors((2, 2), true).len(), 3);
    }

    #[test]
    fn test_offset_respects_bounds() {
        let world = World::new(2, 2);
        assert_eq!(world.offset((0, 0), Direction::East), Some((0, 1)));
        assert_eq!(world.offset((0, 0), Direction::North), None);
        assert_eq!(world.offset((1, 1), Direction::South), None);
    }

    #[test]
    fn test_duplicate_colors_rejected() {
        let cells = vec![vec![Cell::Agent(0), Cell::Agent(0)]];
        assert!(World::from_cells(cells).is_err());
    }

    #[test]
    fn test_out_of_bounds_set() {
        let mut world = World::new(2, 2);
        assert!(world.set((2, 0), Cell::Wall).is_err());
        assert_eq!(world.get((5, 5)), Cell::Wall);
    }
}
