//! Planning problems, their solutions and plan checking

pub mod action;
pub mod decoder;
pub mod plan;
pub mod problem;
pub mod validator;

pub use action::Action;
pub use decoder::PlanDecoder;
pub use plan::{Plan, Solution, Trajectories};
pub use problem::{PlannerOptions, PlanningProblem, SolveOutcome};
pub use validator::{PlanValidator, ValidationResult, Violation};

use crate::error::PlannerResult;
use crate::world::WorldView;
use tracing::{info, warn};

/// Decide `world` at a fixed horizon with default options.
///
/// Returns `(true, Some(plan))` when solved and `(false, None)` otherwise.
pub fn solve(world: &dyn WorldView, horizon: usize) -> PlannerResult<(bool, Option<Plan>)> {
    let mut problem = PlanningProblem::new(world, horizon, PlannerOptions::default())?;
    Ok(match problem.solve()? {
        SolveOutcome::Solved(solution) => (true, Some(solution.plan)),
        SolveOutcome::Unsatisfiable => (false, None),
        SolveOutcome::Unknown => {
            warn!(horizon, "no verdict from the SAT engine");
            (false, None)
        }
    })
}

/// Try horizons `0..=max_horizon` in order, each with a fresh pool, and
/// return the first solution found.
///
/// A horizon whose engine call times out is skipped, so a solution is only
/// guaranteed minimal when no timeout fired. When nothing is solved the
/// result is [`SolveOutcome::Unknown`] if any horizon timed out and
/// [`SolveOutcome::Unsatisfiable`] otherwise.
pub fn find_shortest_plan(
    world: &dyn WorldView,
    max_horizon: usize,
    options: &PlannerOptions,
) -> PlannerResult<SolveOutcome> {
    let mut timed_out = Vec::new();
    for horizon in 0..=max_horizon {
        info!(horizon, max_horizon, "trying horizon");
        let mut problem = PlanningProblem::new(world, horizon, options.clone())?;
        match problem.solve()? {
            SolveOutcome::Solved(solution) => {
                if !timed_out.is_empty() {
                    warn!(?timed_out, horizon, "plan may not be minimal, earlier horizons timed out");
                }
                info!(horizon, moves = solution.plan.move_count(), "found plan");
                return Ok(SolveOutcome::Solved(solution));
            }
            SolveOutcome::Unsatisfiable => {}
            SolveOutcome::Unknown => {
                warn!(horizon, "horizon skipped after timeout");
                timed_out.push(horizon);
            }
        }
    }

    if timed_out.is_empty() {
        Ok(SolveOutcome::Unsatisfiable)
    } else {
        warn!(?timed_out, max_horizon, "no plan found and some horizons timed out");
        Ok(SolveOutcome::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::parse_world_from_string;
    use std::time::Duration;

    #[test]
    fn test_solve_returns_plan_only_when_satisfiable() {
        let world = parse_world_from_string("S0 .\n. X\n").unwrap();

        let (ok, plan) = solve(&world, 1).unwrap();
        assert!(!ok);
        assert!(plan.is_none());

        let (ok, plan) = solve(&world, 2).unwrap();
        assert!(ok);
        assert_eq!(plan.unwrap().len(), 2);
    }

    #[test]
    fn test_shortest_plan_is_minimal() {
        let world = parse_world_from_string("S0 . .\n. . .\n. . X\n").unwrap();

        let outcome = find_shortest_plan(&world, 8, &PlannerOptions::default()).unwrap();
        let solution = outcome.solution().unwrap();
        assert_eq!(solution.horizon, 4);
        assert_eq!(solution.plan.move_count(), 4);
    }

    #[test]
    fn test_shortest_plan_unsatisfiable_when_out_of_reach() {
        let world = parse_world_from_string("S0 @ X\n").unwrap();
        assert!(matches!(
            find_shortest_plan(&world, 3, &PlannerOptions::default()).unwrap(),
            SolveOutcome::Unsatisfiable
        ));
    }

    #[test]
    fn test_shortest_plan_unknown_when_every_horizon_times_out() {
        let world = parse_world_from_string("S0 . . . . .\n. . . . . .\n. . . . . .\n. . . . . X\n").unwrap();
        let options = PlannerOptions {
            timeout: Some(Duration::ZERO),
            ..PlannerOptions::default()
        };

        let outcome = find_shortest_plan(&world, 8, &options).unwrap();
        assert!(matches!(outcome, SolveOutcome::Unknown));
    }
}
