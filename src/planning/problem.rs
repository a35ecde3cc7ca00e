//! Planning problem definition and the solve pipeline

use super::{PlanDecoder, PlanValidator, Solution};
use crate::config::{BeamMode, Settings};
use crate::error::{InvariantViolation, PlannerError, PlannerResult};
use crate::sat::{EncodingStatistics, EngineVerdict, Formula, Model, SatEncoder, SatSolver, VariablePool};
use crate::world::{Color, WorldView};
use itertools::Itertools;
use std::time::Duration;
use tracing::{error, info, warn};

/// Knobs shared by every solve of a planning problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerOptions {
    pub beam_mode: BeamMode,
    pub parallel: bool,
    /// Deadline for one engine call; `None` waits forever
    pub timeout: Option<Duration>,
    pub validate_plans: bool,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            beam_mode: BeamMode::SourceOnly,
            parallel: false,
            timeout: None,
            validate_plans: true,
        }
    }
}

impl From<&Settings> for PlannerOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            beam_mode: settings.encoding.beam_mode,
            parallel: settings.encoding.parallel,
            timeout: settings.solver.timeout_seconds.map(Duration::from_secs),
            validate_plans: settings.solver.validate_plans,
        }
    }
}

/// Result of a full solve
#[derive(Debug, Clone)]
pub enum SolveOutcome {
    Solved(Solution),
    Unsatisfiable,
    /// The engine did not reach a verdict in time
    Unknown,
}

impl SolveOutcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, SolveOutcome::Solved(_))
    }

    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SolveOutcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }
}

/// A world, a horizon and the variable pool of one encoding
pub struct PlanningProblem<'w> {
    world: &'w dyn WorldView,
    horizon: usize,
    options: PlannerOptions,
    pool: VariablePool,
    encoder: SatEncoder,
    encoded: Option<(Formula, EncodingStatistics)>,
    last_solve_time: Duration,
}

impl<'w> PlanningProblem<'w> {
    /// Create a problem with a fresh variable pool
    pub fn new(world: &'w dyn WorldView, horizon: usize, options: PlannerOptions) -> PlannerResult<Self> {
        let agents = world.agents();
        if let Some(color) = agents.iter().map(|agent| agent.color).duplicates().next() {
            return Err(PlannerError::InvalidWorld(format!("agent color {} appears more than once", color)));
        }

        let encoder = SatEncoder::new(options.beam_mode, options.parallel);
        Ok(Self {
            world,
            horizon,
            options,
            pool: VariablePool::new(),
            encoder,
            encoded: None,
            last_solve_time: Duration::ZERO,
        })
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn options(&self) -> &PlannerOptions {
        &self.options
    }

    pub fn pool(&self) -> &VariablePool {
        &self.pool
    }

    fn encoded(&mut self) -> &(Formula, EncodingStatistics) {
        self.encoded
            .get_or_insert_with(|| self.encoder.encode(self.world, &self.pool, self.horizon))
    }

    /// Run every generator once; later calls reuse the same formula
    pub fn build_formula(&mut self) -> &Formula {
        &self.encoded().0
    }

    /// Get encoding statistics
    pub fn statistics(&mut self) -> EncodingStatistics {
        self.encoded().1.clone()
    }

    /// The formula in DIMACS CNF, sized to the whole pool
    pub fn to_dimacs(&mut self) -> String {
        let variables = self.pool.len();
        self.build_formula().to_dimacs(variables)
    }

    /// Hand the formula to the engine and return its verdict untouched
    pub fn check(&mut self) -> PlannerResult<EngineVerdict> {
        let mut solver = SatSolver::new()?;
        if let Some(timeout) = self.options.timeout {
            solver.set_timeout(timeout);
        }
        solver.add_formula(self.build_formula());

        let (verdict, solve_time) = solver.solve();
        if verdict == EngineVerdict::Unknown {
            warn!(horizon = self.horizon, timeout = ?self.options.timeout, "SAT engine gave up without a verdict");
        }

        self.last_solve_time = solve_time;
        info!(
            horizon = self.horizon,
            satisfiable = verdict.is_satisfiable(),
            elapsed_ms = solve_time.as_millis() as u64,
            "engine verdict"
        );
        Ok(verdict)
    }

    /// Encode, solve, decode and (optionally) validate
    pub fn solve(&mut self) -> PlannerResult<SolveOutcome> {
        let verdict = self.check()?;
        self.outcome(verdict)
    }

    /// Turn a verdict from [`check`](Self::check) into an outcome, decoding
    /// and validating the plan when there is a model
    pub fn outcome(&mut self, verdict: EngineVerdict) -> PlannerResult<SolveOutcome> {
        let model = match verdict {
            EngineVerdict::Satisfiable(model) => model,
            EngineVerdict::Unsatisfiable => return Ok(SolveOutcome::Unsatisfiable),
            EngineVerdict::Unknown => return Ok(SolveOutcome::Unknown),
        };

        let colors: Vec<Color> = self.world.agents().iter().map(|agent| agent.color).collect();
        let decoder = PlanDecoder::new(&self.pool, colors);
        let trajectories = decoder.trajectories(&model, self.horizon)?;
        let plan = PlanDecoder::plan_from_trajectories(&trajectories, self.horizon)?;

        if self.options.validate_plans {
            let result = PlanValidator::new(self.options.beam_mode).validate(self.world, &trajectories, self.horizon);
            if !result.is_valid() {
                error!(horizon = self.horizon, %result, "decoded plan failed validation");
                return Err(InvariantViolation::ValidationFailed(result.to_string()).into());
            }
        }

        let statistics = self.statistics();
        Ok(SolveOutcome::Solved(Solution::new(
            self.horizon,
            plan,
            trajectories,
            statistics,
            self.last_solve_time,
        )))
    }

    /// Render every literal of `model` as its proposition, `¬`-prefixed when false
    pub fn explain(&self, model: &Model) -> PlannerResult<Vec<String>> {
        model
            .literals()
            .map(|literal| -> PlannerResult<String> {
                let proposition = self.pool.proposition(literal)?;
                Ok(if literal > 0 {
                    proposition.to_string()
                } else {
                    format!("¬{}", proposition)
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{parse_world_from_string, AgentSpec, LaserSpec, Position};

    const OPEN_ROOM: &str = "S0 . . . . .\n. . . . . .\n. . . . . .\n. . . . . X\n";

    fn solve_text(text: &str, horizon: usize) -> SolveOutcome {
        let world = parse_world_from_string(text).unwrap();
        PlanningProblem::new(&world, horizon, PlannerOptions::default())
            .unwrap()
            .solve()
            .unwrap()
    }

    #[test]
    fn test_reachability_needs_enough_steps() {
        assert!(matches!(solve_text("S0 .\n. X\n", 1), SolveOutcome::Unsatisfiable));
        assert!(solve_text("S0 .\n. X\n", 2).is_solved());
    }

    #[test]
    fn test_solution_contents() {
        let outcome = solve_text("S0 .\n. X\n", 2);
        let solution = outcome.solution().unwrap();

        assert_eq!(solution.horizon, 2);
        assert_eq!(solution.plan.len(), 2);
        assert_eq!(solution.trajectories[&0][0], (0, 0));
        assert_eq!(solution.trajectories[&0][2], (1, 1));
        assert_eq!(solution.statistics.horizon, 2);
    }

    #[test]
    fn test_check_is_idempotent_per_problem() {
        let world = parse_world_from_string("S0 . X\n").unwrap();
        let mut problem = PlanningProblem::new(&world, 2, PlannerOptions::default()).unwrap();

        let clauses = problem.build_formula().len();
        assert!(problem.check().unwrap().is_satisfiable());
        assert_eq!(problem.build_formula().len(), clauses);
        assert!(problem.check().unwrap().is_satisfiable());
    }

    #[test]
    fn test_explain_renders_every_literal() {
        let world = parse_world_from_string("S0 X\n").unwrap();
        let mut problem = PlanningProblem::new(&world, 1, PlannerOptions::default()).unwrap();

        let EngineVerdict::Satisfiable(model) = problem.check().unwrap() else {
            panic!("expected a model");
        };
        let lines = problem.explain(&model).unwrap();

        assert_eq!(lines.len(), model.len());
        assert!(lines.contains(&"agent(0, (0, 0), t=0)".to_string()));
        assert!(lines.contains(&"agent(0, (0, 1), t=1)".to_string()));
        assert!(lines.contains(&"¬agent(0, (0, 1), t=0)".to_string()));
    }

    #[test]
    fn test_missed_deadline_is_unknown() {
        let world = parse_world_from_string(OPEN_ROOM).unwrap();
        let options = PlannerOptions {
            timeout: Some(Duration::ZERO),
            ..PlannerOptions::default()
        };

        let outcome = PlanningProblem::new(&world, 8, options).unwrap().solve().unwrap();
        assert!(matches!(outcome, SolveOutcome::Unknown));
    }

    #[test]
    fn test_outcome_reuses_checked_model() {
        let world = parse_world_from_string("S0 . X\n").unwrap();
        let mut problem = PlanningProblem::new(&world, 2, PlannerOptions::default()).unwrap();

        let verdict = problem.check().unwrap();
        assert!(verdict.is_satisfiable());

        let outcome = problem.outcome(verdict).unwrap();
        assert_eq!(outcome.solution().unwrap().plan.len(), 2);
        assert!(matches!(
            problem.outcome(EngineVerdict::Unknown).unwrap(),
            SolveOutcome::Unknown
        ));
    }

    #[test]
    fn test_agentless_plan_spans_horizon() {
        let outcome = solve_text(". .\n", 3);
        let solution = outcome.solution().unwrap();

        assert_eq!(solution.plan.len(), 3);
        assert!(solution.plan.steps.iter().all(|step| step.is_empty()));
    }

    #[test]
    fn test_timeout_still_solves_small_problems() {
        let world = parse_world_from_string("S0 . X\n").unwrap();
        let options = PlannerOptions {
            timeout: Some(Duration::from_secs(30)),
            ..PlannerOptions::default()
        };

        let outcome = PlanningProblem::new(&world, 2, options).unwrap().solve().unwrap();
        assert!(outcome.is_solved());
    }

    struct DuplicateAgents;

    impl WorldView for DuplicateAgents {
        fn dimensions(&self) -> (usize, usize) {
            (1, 2)
        }

        fn agents(&self) -> Vec<AgentSpec> {
            vec![
                AgentSpec { color: 0, position: (0, 0) },
                AgentSpec { color: 0, position: (0, 1) },
            ]
        }

        fn lasers(&self) -> Vec<LaserSpec> {
            Vec::new()
        }

        fn walls(&self) -> Vec<Position> {
            Vec::new()
        }

        fn exits(&self) -> Vec<Position> {
            Vec::new()
        }

        fn is_wall(&self, _pos: Position) -> bool {
            false
        }
    }

    #[test]
    fn test_duplicate_colors_rejected() {
        let result = PlanningProblem::new(&DuplicateAgents, 1, PlannerOptions::default());
        assert!(matches!(result, Err(PlannerError::InvalidWorld(_))));
    }
}
