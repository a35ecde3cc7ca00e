//! Text level format
//!
//! One row per line, cells separated by whitespace:
//! `.` empty, `@` wall, `V` void, `X` exit, `G` gem, `S<c>` agent of color `c`,
//! `L<c><D>` laser of color `c` pointing `D` (one of `N`, `S`, `E`, `W`).
//! Blank lines and lines starting with `#` are ignored.

use super::{Cell, World};
use anyhow::{Context, Result};
use itertools::Itertools;
use std::path::Path;

/// Load a world from a level file
pub fn load_world_from_file<P: AsRef<Path>>(path: P) -> Result<World> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read level file: {}", path.as_ref().display()))?;

    parse_world_from_string(&content)
        .with_context(|| format!("Failed to parse level file: {}", path.as_ref().display()))
}

/// Parse a world from its text representation
pub fn parse_world_from_string(content: &str) -> Result<World> {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();

    if lines.is_empty() {
        anyhow::bail!("Level is empty or contains no rows");
    }

    let mut cells = Vec::with_capacity(lines.len());
    for (row_idx, line) in lines.iter().enumerate() {
        let row = line
            .split_whitespace()
            .enumerate()
            .map(|(col_idx, token)| {
                Cell::parse_token(token).with_context(|| format!("Invalid cell at ({}, {})", row_idx, col_idx))
            })
            .collect::<Result<Vec<_>>>()?;
        cells.push(row);
    }

    World::from_cells(cells)
}

/// Serialise a world to the text format, one space between cells
pub fn world_to_string(world: &World) -> String {
    let mut result = String::new();
    for row in 0..world.height {
        let line = (0..world.width).map(|col| world.get((row, col)).token()).join(" ");
        result.push_str(&line);
        result.push('\n');
    }
    result
}

/// Save a world to a level file
pub fn save_world_to_file<P: AsRef<Path>>(world: &World, path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, world_to_string(world))
        .with_context(|| format!("Failed to write level to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Write a handful of sample levels into `output_dir`
pub fn create_example_levels<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    // Single agent crossing an open room
    let open_room = "S0 . .\n. . .\n. . X\n";
    std::fs::write(dir.join("open_room.txt"), open_room).context("Failed to write open_room.txt")?;

    // Two agents sharing a one-cell gap
    let corridor = "S0 . S1\n@ . @\nX . X\n";
    std::fs::write(dir.join("corridor.txt"), corridor).context("Failed to write corridor.txt")?;

    // A foreign laser sits on the direct route
    let laser_detour = "S0 L1S X\n. . .\n";
    std::fs::write(dir.join("laser_detour.txt"), laser_detour).context("Failed to write laser_detour.txt")?;

    // Larger two-agent level with a laser beside a wall
    let two_agents = "\
S0 . . . . . . . . S1
. . . . . . . . . .
. . . . . . . . . .
. . . . . . . . . .
. . . . . . . . . .
. . . . . . . . L0W @
. . . . . . . . . .
. . . . . . . . . .
. . . . . . . . . .
X . . . . . . . . X
";
    std::fs::write(dir.join("two_agents.txt"), two_agents).context("Failed to write two_agents.txt")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Direction, WorldView};
    use tempfile::tempdir;

    #[test]
    fn test_parse_world_from_string() {
        let content = "S0 . L1E\n@ X .\n";
        let world = parse_world_from_string(content).unwrap();

        assert_eq!(world.width, 3);
        assert_eq!(world.height, 2);
        assert_eq!(world.get((0, 0)), Cell::Agent(0));
        assert_eq!(world.get((0, 2)), Cell::Laser { color: 1, direction: Direction::East });
        assert_eq!(world.walls(), vec![(1, 0)]);
        assert_eq!(world.exits(), vec![(1, 1)]);
    }

    #[test]
    fn test_comments_and_blank_lines_ignored() {
        let content = "# a tiny level\n\nS0 X\n\n";
        let world = parse_world_from_string(content).unwrap();
        assert_eq!(world.height, 1);
        assert_eq!(world.width, 2);
    }

    #[test]
    fn test_world_to_string() {
        let world = parse_world_from_string("S0   .\n@ L0N\n").unwrap();
        assert_eq!(world_to_string(&world), "S0 .\n@ L0N\n");
    }

    #[test]
    fn test_invalid_input() {
        assert!(parse_world_from_string("S0 Q\n").is_err());
        assert!(parse_world_from_string("S0 .\n.\n").is_err());
        assert!(parse_world_from_string("").is_err());
        assert!(parse_world_from_string("S1 S1\n").is_err());
    }

    #[test]
    fn test_file_operations() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("levels/level.txt");

        let original = parse_world_from_string("S0 . X\n@ . .\n").unwrap();
        save_world_to_file(&original, &file_path).unwrap();
        let loaded = load_world_from_file(&file_path).unwrap();

        assert_eq!(original, loaded);
    }

    #[test]
    fn test_create_example_levels() {
        let temp_dir = tempdir().unwrap();
        create_example_levels(temp_dir.path()).unwrap();

        for name in ["open_room.txt", "corridor.txt", "laser_detour.txt", "two_agents.txt"] {
            let world = load_world_from_file(temp_dir.path().join(name)).unwrap();
            assert!(!world.agents().is_empty(), "{} has no agents", name);
        }

        let big = load_world_from_file(temp_dir.path().join("two_agents.txt")).unwrap();
        assert_eq!((big.height, big.width), (10, 10));
        assert_eq!(big.exits().len(), 2);
    }
}
