//! Clauses and the CNF accumulator

use itertools::Itertools;

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub literals: Vec<i32>, // Positive for variable, negative for negation
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<i32>) -> Self {
        Self { literals }
    }

    /// Create a unit clause (single literal)
    pub fn unit(literal: i32) -> Self {
        Self { literals: vec![literal] }
    }

    /// Create a binary clause (two literals)
    pub fn binary(lit1: i32, lit2: i32) -> Self {
        Self { literals: vec![lit1, lit2] }
    }

    /// `premise → (c1 ∨ c2 ∨ ...)`
    pub fn implies_any(premise: i32, conclusions: impl IntoIterator<Item = i32>) -> Self {
        let mut literals = vec![-premise];
        literals.extend(conclusions);
        Self { literals }
    }

    /// Check if clause is empty (unsatisfiable)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Check if clause is unit
    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }
}

/// Append-only CNF accumulator.
///
/// No deduplication or simplification happens here; insertion order is kept
/// so DIMACS dumps of the same problem are byte-identical.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formula {
    clauses: Vec<Clause>,
}

impl Formula {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    pub fn extend(&mut self, clauses: impl IntoIterator<Item = Clause>) {
        self.clauses.extend(clauses);
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn into_clauses(self) -> Vec<Clause> {
        self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Highest variable id referenced by any clause
    pub fn max_variable(&self) -> usize {
        self.clauses
            .iter()
            .flat_map(|clause| clause.literals.iter())
            .map(|literal| literal.unsigned_abs() as usize)
            .max()
            .unwrap_or(0)
    }

    pub fn has_empty_clause(&self) -> bool {
        self.clauses.iter().any(Clause::is_empty)
    }

    /// Render in DIMACS CNF; `variable_count` is raised to cover every literal
    pub fn to_dimacs(&self, variable_count: usize) -> String {
        let variables = variable_count.max(self.max_variable());
        let mut output = format!("p cnf {} {}\n", variables, self.clauses.len());
        for clause in &self.clauses {
            if !clause.is_empty() {
                output.push_str(&clause.literals.iter().join(" "));
                output.push(' ');
            }
            output.push_str("0\n");
        }
        output
    }
}
