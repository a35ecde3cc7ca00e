//! SAT solver integration using CaDiCaL

use super::{Clause, Formula};
use crate::error::{PlannerError, PlannerResult};
use cadical::{Solver, Timeout};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// SAT solver wrapper for CaDiCaL
pub struct SatSolver {
    solver: Solver,
    variable_count: usize,
    clause_count: usize,
}

/// Verdict of a single engine call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineVerdict {
    Satisfiable(Model),
    Unsatisfiable,
    /// The engine gave up or missed its deadline
    Unknown,
}

impl EngineVerdict {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, EngineVerdict::Satisfiable(_))
    }
}

/// Total assignment returned by the engine for a satisfiable formula
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    assignment: BTreeMap<i32, bool>,
}

impl Model {
    pub fn new(assignment: BTreeMap<i32, bool>) -> Self {
        Self { assignment }
    }

    /// Value of variable `var`; the sign of a literal is ignored
    pub fn value(&self, var: i32) -> Option<bool> {
        self.assignment.get(&var.abs()).copied()
    }

    /// Variables assigned true, ascending
    pub fn true_variables(&self) -> impl Iterator<Item = i32> + '_ {
        self.assignment.iter().filter(|&(_, &value)| value).map(|(&var, _)| var)
    }

    /// Every assigned variable as a signed literal, ascending by variable
    pub fn literals(&self) -> impl Iterator<Item = i32> + '_ {
        self.assignment
            .iter()
            .map(|(&var, &value)| if value { var } else { -var })
    }

    pub fn len(&self) -> usize {
        self.assignment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignment.is_empty()
    }
}

impl SatSolver {
    /// Create a new SAT solver instance
    pub fn new() -> PlannerResult<Self> {
        let solver: Solver =
            Solver::with_config("default").map_err(|e| PlannerError::EngineUnavailable(e.to_string()))?;

        Ok(Self {
            solver,
            variable_count: 0,
            clause_count: 0,
        })
    }

    /// Abort the next `solve` once it has run for `timeout`; the verdict is
    /// then [`EngineVerdict::Unknown`]
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.solver.set_callbacks(Some(Timeout::new(timeout.as_secs_f32())));
    }

    /// Add every clause of `formula`
    pub fn add_formula(&mut self, formula: &Formula) {
        for clause in formula.clauses() {
            self.add_clause(clause);
        }
    }

    /// Add a single clause; an empty clause makes the formula unsatisfiable
    pub fn add_clause(&mut self, clause: &Clause) {
        for &literal in &clause.literals {
            self.variable_count = self.variable_count.max(literal.unsigned_abs() as usize);
        }

        self.solver.add_clause(clause.literals.iter().copied());
        self.clause_count += 1;
    }

    /// Run the engine on everything added so far
    pub fn solve(&mut self) -> (EngineVerdict, Duration) {
        let start_time = Instant::now();
        let result = self.solver.solve();
        let solve_time = start_time.elapsed();

        debug!(
            variables = self.variable_count,
            clauses = self.clause_count,
            ?result,
            elapsed_ms = solve_time.as_millis() as u64,
            "engine returned"
        );

        let verdict = match result {
            Some(true) => EngineVerdict::Satisfiable(self.extract_model()),
            Some(false) => EngineVerdict::Unsatisfiable,
            None => EngineVerdict::Unknown,
        };
        (verdict, solve_time)
    }

    fn extract_model(&self) -> Model {
        let assignment = (1..=self.variable_count as i32)
            .filter_map(|var| self.solver.value(var).map(|value| (var, value)))
            .collect();
        Model::new(assignment)
    }

    /// Get the number of variables
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    /// Get the number of clauses
    pub fn clause_count(&self) -> usize {
        self.clause_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_creation() {
        let solver = SatSolver::new().unwrap();
        assert_eq!(solver.variable_count(), 0);
        assert_eq!(solver.clause_count(), 0);
    }

    #[test]
    fn test_simple_satisfiable() {
        let mut solver = SatSolver::new().unwrap();

        // (x1 ∨ x2) ∧ (¬x1 ∨ x2)
        solver.add_clause(&Clause::new(vec![1, 2]));
        solver.add_clause(&Clause::new(vec![-1, 2]));

        let (verdict, _) = solver.solve();
        match verdict {
            EngineVerdict::Satisfiable(model) => {
                assert_eq!(model.value(2), Some(true));
                assert_eq!(model.value(-2), Some(true));
                assert!(model.true_variables().any(|var| var == 2));
                assert_eq!(model.literals().count(), 2);
            }
            other => panic!("expected a model, got {:?}", other),
        }
    }

    #[test]
    fn test_unsatisfiable() {
        let mut solver = SatSolver::new().unwrap();
        solver.add_clause(&Clause::unit(1));
        solver.add_clause(&Clause::unit(-1));

        assert_eq!(solver.solve().0, EngineVerdict::Unsatisfiable);
    }

    #[test]
    fn test_empty_clause_is_unsatisfiable() {
        let mut solver = SatSolver::new().unwrap();
        let mut formula = Formula::new();
        formula.add(Clause::binary(1, 2));
        formula.add(Clause::new(vec![]));
        solver.add_formula(&formula);

        assert_eq!(solver.clause_count(), 2);
        assert_eq!(solver.solve().0, EngineVerdict::Unsatisfiable);
    }

    #[test]
    fn test_expired_timeout_gives_unknown() {
        let mut solver = SatSolver::new().unwrap();
        solver.add_clause(&Clause::new(vec![1, 2]));
        solver.add_clause(&Clause::new(vec![-1, 3]));
        solver.set_timeout(Duration::ZERO);

        assert_eq!(solver.solve().0, EngineVerdict::Unknown);
    }

    #[test]
    fn test_generous_timeout_still_solves() {
        let mut solver = SatSolver::new().unwrap();
        solver.add_clause(&Clause::new(vec![1, 2]));
        solver.set_timeout(Duration::from_secs(30));

        assert!(solver.solve().0.is_satisfiable());
    }

    #[test]
    fn test_variable_count_tracking() {
        let mut solver = SatSolver::new().unwrap();

        solver.add_clause(&Clause::new(vec![1, -5, 3]));
        assert_eq!(solver.variable_count(), 5);

        solver.add_clause(&Clause::new(vec![2, -7]));
        assert_eq!(solver.variable_count(), 7);
    }
}
