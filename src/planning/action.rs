//! Per-step agent actions

use serde::{Deserialize, Serialize};
use std::fmt;

/// What one agent does between `t` and `t + 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Stay,
    North,
    South,
    West,
    East,
}

impl Action {
    /// Map a `(d_row, d_col)` step to its action; anything but a unit
    /// orthogonal step or standing still has no action
    pub fn from_delta(delta: (isize, isize)) -> Option<Self> {
        match delta {
            (0, 0) => Some(Action::Stay),
            (-1, 0) => Some(Action::North),
            (1, 0) => Some(Action::South),
            (0, -1) => Some(Action::West),
            (0, 1) => Some(Action::East),
            _ => None,
        }
    }

    pub fn delta(self) -> (isize, isize) {
        match self {
            Action::Stay => (0, 0),
            Action::North => (-1, 0),
            Action::South => (1, 0),
            Action::West => (0, -1),
            Action::East => (0, 1),
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Action::Stay => '.',
            Action::North => '^',
            Action::South => 'v',
            Action::West => '<',
            Action::East => '>',
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Stay => "STAY",
            Action::North => "NORTH",
            Action::South => "SOUTH",
            Action::West => "WEST",
            Action::East => "EAST",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_mapping() {
        for action in [Action::Stay, Action::North, Action::South, Action::West, Action::East] {
            assert_eq!(Action::from_delta(action.delta()), Some(action));
        }
    }

    #[test]
    fn test_illegal_deltas() {
        assert_eq!(Action::from_delta((1, 1)), None);
        assert_eq!(Action::from_delta((0, 2)), None);
        assert_eq!(Action::from_delta((-2, 0)), None);
    }
}
