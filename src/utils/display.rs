//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::planning::Solution;
use crate::world::{Cell, World, WorldView};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Format worlds and plans for display
pub struct PlanFormatter;

impl PlanFormatter {
    /// Format a solution for console output
    pub fn format_solution(solution: &Solution, world: &World, show_steps: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!("=== Plan for horizon {} ===\n", solution.horizon));
        output.push_str(&format!("Solve Time: {:.3}s\n", solution.solve_time.as_secs_f64()));
        output.push_str(&format!("Agents: {}\n", solution.plan.agents.len()));
        output.push_str(&format!("Moves: {}\n", solution.plan.move_count()));
        output.push('\n');

        output.push_str(&Self::format_plan_table(solution));

        if show_steps {
            output.push('\n');
            output.push_str(&Self::format_timeline(solution, world));
        }

        output
    }

    /// One row per time step, one column per agent
    pub fn format_plan_table(solution: &Solution) -> String {
        let mut output = String::new();

        output.push_str("  t |");
        for color in &solution.plan.agents {
            output.push_str(&format!(" {:>6} |", format!("S{}", color)));
        }
        output.push('\n');
        output.push_str("----|");
        output.push_str(&"--------|".repeat(solution.plan.agents.len()));
        output.push('\n');

        for (t, step) in solution.plan.steps.iter().enumerate() {
            output.push_str(&format!("{:3} |", t));
            for action in step {
                output.push_str(&format!(" {:>6} |", action.to_string()));
            }
            output.push('\n');
        }

        output
    }

    /// The world at every time step with agents drawn at their positions
    pub fn format_timeline(solution: &Solution, world: &World) -> String {
        let mut output = String::new();

        for t in 0..=solution.horizon {
            let mut frame = world.clone();
            // agents leave their start cells empty and are redrawn where they stand
            for agent in world.agents() {
                let _ = frame.set(agent.position, Cell::Empty);
            }
            for (color, pos) in solution.positions_at(t) {
                let _ = frame.set(pos, Cell::Agent(color));
            }

            output.push_str(&format!("t={}:\n", t));
            output.push_str(&Self::format_world_with_coords(&frame));
            output.push('\n');
        }

        output
    }

    /// Format a world with coordinates
    pub fn format_world_with_coords(world: &World) -> String {
        let cell_width = world.cells.iter().map(|cell| cell.token().len()).max().unwrap_or(1).max(2);
        let mut output = String::new();

        // Header with column numbers
        output.push_str("   ");
        for col in 0..world.width {
            output.push_str(&format!(" {:>width$}", col % 100, width = cell_width));
        }
        output.push('\n');

        // Rows with row numbers
        for row in 0..world.height {
            output.push_str(&format!("{:2} ", row));
            for col in 0..world.width {
                output.push_str(&format!(" {:>width$}", world.get((row, col)).token(), width = cell_width));
            }
            output.push('\n');
        }

        output
    }

    /// Save a solution based on output format; returns the written path
    pub fn save_solution<P: AsRef<Path>>(
        solution: &Solution,
        world: &World,
        output_dir: P,
        format: OutputFormat,
    ) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

        let path = match format {
            OutputFormat::Text => {
                let path = output_dir.join(format!("plan_h{:03}.txt", solution.horizon));
                std::fs::write(&path, Self::format_solution(solution, world, true))
                    .with_context(|| format!("Failed to write plan: {}", path.display()))?;
                path
            }
            OutputFormat::Json => {
                let path = output_dir.join(format!("plan_h{:03}.json", solution.horizon));
                solution
                    .save_to_file(&path)
                    .with_context(|| format!("Failed to write plan: {}", path.display()))?;
                path
            }
        };

        Ok(path)
    }

    /// Write a DIMACS dump next to the plans
    pub fn save_dimacs<P: AsRef<Path>>(dimacs: &str, output_dir: P, horizon: usize) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

        let path = output_dir.join(format!("formula_h{:03}.cnf", horizon));
        std::fs::write(&path, dimacs).with_context(|| format!("Failed to write DIMACS: {}", path.display()))?;
        Ok(path)
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err() && (std::env::var("TERM").unwrap_or_default() != "dumb")
    }

    /// Format success message
    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    /// Format error message
    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    /// Format warning message
    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    /// Format info message
    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}
