//! Laser Maze SAT Planner
//!
//! This library decides whether a multi-agent grid puzzle with walls, exits
//! and colored lasers can be solved within a fixed number of time steps, and
//! produces a joint plan when it can, using SAT solving techniques.

pub mod config;
pub mod error;
pub mod planning;
pub mod sat;
pub mod utils;
pub mod world;

pub use config::Settings;
pub use error::{InvariantViolation, PlannerError, PlannerResult};
pub use planning::{find_shortest_plan, solve, Plan, PlannerOptions, PlanningProblem, Solution, SolveOutcome};
pub use world::{World, WorldView};

use anyhow::{Context, Result};

/// Main entry point: load the configured level and solve it.
///
/// With `planning.max_horizon` set, horizons are searched from zero and the
/// shortest plan is returned; otherwise the fixed `planning.horizon` is used.
pub fn solve_level(settings: &Settings) -> Result<SolveOutcome> {
    let world = world::load_world_from_file(&settings.input.level_file).context("Failed to load level file")?;
    let options = PlannerOptions::from(settings);

    match settings.planning.max_horizon {
        Some(max_horizon) => {
            find_shortest_plan(&world, max_horizon, &options).context("Shortest-horizon search failed")
        }
        None => {
            let mut problem = PlanningProblem::new(&world, settings.planning.horizon, options)
                .context("Failed to create planning problem")?;
            problem.solve().context("Failed to solve planning problem")
        }
    }
}
