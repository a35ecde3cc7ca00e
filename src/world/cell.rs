//! Cell kinds, directions and entity descriptions

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an agent, and of the lasers it owns
pub type Color = usize;

/// `(row, column)`; rows grow southward, columns grow eastward
pub type Position = (usize, usize);

/// Axis-aligned direction of a laser
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::North, Direction::South, Direction::East, Direction::West];

    /// Signed `(d_row, d_col)` step
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Direction::North => 'N',
            Direction::South => 'S',
            Direction::East => 'E',
            Direction::West => 'W',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'N' => Some(Direction::North),
            'S' => Some(Direction::South),
            'E' => Some(Direction::East),
            'W' => Some(Direction::West),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Content of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Wall,
    Void,
    Exit,
    Gem,
    Agent(Color),
    Laser { color: Color, direction: Direction },
}

impl Cell {
    /// Token used by the text level format
    pub fn token(&self) -> String {
        match self {
            Cell::Empty => ".".to_string(),
            Cell::Wall => "@".to_string(),
            Cell::Void => "V".to_string(),
            Cell::Exit => "X".to_string(),
            Cell::Gem => "G".to_string(),
            Cell::Agent(color) => format!("S{}", color),
            Cell::Laser { color, direction } => format!("L{}{}", color, direction.symbol()),
        }
    }

    /// Parse a token of the text level format
    pub fn parse_token(token: &str) -> Result<Self> {
        match token {
            "." => return Ok(Cell::Empty),
            "@" => return Ok(Cell::Wall),
            "V" => return Ok(Cell::Void),
            "X" => return Ok(Cell::Exit),
            "G" => return Ok(Cell::Gem),
            _ => {}
        }

        if let Some(color) = token.strip_prefix('S') {
            let color = color
                .parse::<Color>()
                .map_err(|_| anyhow::anyhow!("Invalid agent token '{}'", token))?;
            return Ok(Cell::Agent(color));
        }

        if let Some(rest) = token.strip_prefix('L') {
            let direction = rest
                .chars()
                .last()
                .and_then(Direction::from_symbol)
                .ok_or_else(|| anyhow::anyhow!("Laser token '{}' lacks a direction (N, S, E or W)", token))?;
            let color = rest[..rest.len() - 1]
                .parse::<Color>()
                .map_err(|_| anyhow::anyhow!("Invalid laser color in token '{}'", token))?;
            return Ok(Cell::Laser { color, direction });
        }

        anyhow::bail!("Unknown cell token '{}'", token)
    }

    pub fn is_wall(&self) -> bool {
        matches!(self, Cell::Wall)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// An agent and its starting position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSpec {
    pub color: Color,
    pub position: Position,
}

/// A laser source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaserSpec {
    pub color: Color,
    pub direction: Direction,
    pub position: Position,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_parsing() {
        assert_eq!(Cell::parse_token(".").unwrap(), Cell::Empty);
        assert_eq!(Cell::parse_token("@").unwrap(), Cell::Wall);
        assert_eq!(Cell::parse_token("S3").unwrap(), Cell::Agent(3));
        assert_eq!(
            Cell::parse_token("L12W").unwrap(),
            Cell::Laser { color: 12, direction: Direction::West }
        );
    }

    #[test]
    fn test_invalid_tokens() {
        assert!(Cell::parse_token("Q").is_err());
        assert!(Cell::parse_token("S").is_err());
        assert!(Cell::parse_token("L1").is_err());
        assert!(Cell::parse_token("LxE").is_err());
        assert!(Cell::parse_token("L").is_err());
    }

    #[test]
    fn test_token_display() {
        let laser = Cell::Laser { color: 0, direction: Direction::East };
        assert_eq!(laser.to_string(), "L0E");
        assert_eq!(Cell::Agent(1).to_string(), "S1");
        assert_eq!(Cell::Exit.to_string(), "X");
    }

    #[test]
    fn test_direction_deltas_are_unit_steps() {
        for direction in Direction::ALL {
            let (dr, dc) = direction.delta();
            assert_eq!(dr.abs() + dc.abs(), 1);
            assert_eq!(Direction::from_symbol(direction.symbol()), Some(direction));
        }
    }
}
