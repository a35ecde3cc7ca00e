//! SAT encoder for laser maze planning problems

use super::constraints::{default_generators, ConstraintGenerator, EncodingContext};
use super::{Formula, VariablePool};
use crate::config::BeamMode;
use crate::world::WorldView;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Runs the constraint generators and accumulates their clauses
pub struct SatEncoder {
    generators: Vec<Box<dyn ConstraintGenerator>>,
    beam_mode: BeamMode,
    parallel: bool,
}

impl SatEncoder {
    /// Create an encoder with the standard generators
    pub fn new(beam_mode: BeamMode, parallel: bool) -> Self {
        Self::with_generators(default_generators(), beam_mode, parallel)
    }

    pub fn with_generators(generators: Vec<Box<dyn ConstraintGenerator>>, beam_mode: BeamMode, parallel: bool) -> Self {
        Self {
            generators,
            beam_mode,
            parallel,
        }
    }

    pub fn beam_mode(&self) -> BeamMode {
        self.beam_mode
    }

    /// Encode `world` over `0..=horizon` into a single formula.
    ///
    /// Clauses appear in generator order regardless of `parallel`; only the
    /// variable ids may differ between the two modes.
    pub fn encode(&self, world: &dyn WorldView, pool: &VariablePool, horizon: usize) -> (Formula, EncodingStatistics) {
        let ctx = EncodingContext::new(world, pool, horizon, self.beam_mode);

        let batches: Vec<(&'static str, Vec<_>)> = if self.parallel {
            self.generators
                .par_iter()
                .map(|generator| (generator.name(), generator.generate(&ctx)))
                .collect()
        } else {
            self.generators
                .iter()
                .map(|generator| (generator.name(), generator.generate(&ctx)))
                .collect()
        };

        let mut formula = Formula::new();
        let mut clauses_by_generator = Vec::with_capacity(batches.len());
        for (name, clauses) in batches {
            debug!(generator = name, clauses = clauses.len(), "generator finished");
            clauses_by_generator.push((name.to_string(), clauses.len()));
            formula.extend(clauses);
        }

        let (height, width) = world.dimensions();
        let statistics = EncodingStatistics {
            width,
            height,
            horizon,
            agents: world.agents().len(),
            lasers: world.lasers().len(),
            beam_mode: self.beam_mode,
            total_variables: pool.len(),
            total_clauses: formula.len(),
            clauses_by_generator,
        };

        info!(
            horizon,
            variables = statistics.total_variables,
            clauses = statistics.total_clauses,
            "encoded planning problem"
        );

        (formula, statistics)
    }
}

/// Statistics about the SAT encoding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingStatistics {
    pub width: usize,
    pub height: usize,
    pub horizon: usize,
    pub agents: usize,
    pub lasers: usize,
    pub beam_mode: BeamMode,
    pub total_variables: usize,
    pub total_clauses: usize,
    pub clauses_by_generator: Vec<(String, usize)>,
}

impl fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SAT Encoding Statistics:")?;
        writeln!(f, "  Grid: {}x{}", self.height, self.width)?;
        writeln!(f, "  Horizon: {}", self.horizon)?;
        writeln!(f, "  Agents: {}, lasers: {}", self.agents, self.lasers)?;
        writeln!(f, "  Beam mode: {:?}", self.beam_mode)?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  Total clauses: {}", self.total_clauses)?;
        for (name, count) in &self.clauses_by_generator {
            writeln!(f, "    {}: {}", name, count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::constraints::test_support::world;

    #[test]
    fn test_statistics_match_formula() {
        let world = world("S0 .\n. X\n");
        let pool = VariablePool::new();
        let encoder = SatEncoder::new(BeamMode::SourceOnly, false);

        let (formula, stats) = encoder.encode(&world, &pool, 2);

        assert_eq!(stats.total_clauses, formula.len());
        assert_eq!(stats.total_variables, pool.len());
        assert_eq!(stats.horizon, 2);
        let names: Vec<&str> = stats.clauses_by_generator.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["initialization", "movement", "lasers"]);
        assert_eq!(stats.clauses_by_generator[2].1, 0);
        let sum: usize = stats.clauses_by_generator.iter().map(|(_, count)| count).sum();
        assert_eq!(sum, formula.len());
    }

    #[test]
    fn test_fresh_pools_give_identical_formulas() {
        let world = world("S0 L1E .\n. @ X\n");
        let encoder = SatEncoder::new(BeamMode::Propagate, false);

        let (first, _) = encoder.encode(&world, &VariablePool::new(), 3);
        let (second, _) = encoder.encode(&world, &VariablePool::new(), 3);

        assert_eq!(first, second);
        assert_eq!(first.to_dimacs(0), second.to_dimacs(0));
    }

    #[test]
    fn test_parallel_keeps_generator_order() {
        let world = world("S0 L1E .\n. . X\n");
        let sequential = SatEncoder::new(BeamMode::SourceOnly, false);
        let parallel = SatEncoder::new(BeamMode::SourceOnly, true);

        let (_, seq_stats) = sequential.encode(&world, &VariablePool::new(), 2);
        let (par_formula, par_stats) = parallel.encode(&world, &VariablePool::new(), 2);

        assert_eq!(seq_stats.clauses_by_generator, par_stats.clauses_by_generator);
        assert_eq!(seq_stats.total_variables, par_stats.total_variables);
        assert_eq!(par_formula.len(), par_stats.total_clauses);
    }
}
