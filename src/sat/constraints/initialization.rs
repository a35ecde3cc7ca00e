//! Initial state: agent start cells, laser sources and static facts

use super::{ConstraintGenerator, EncodingContext};
use crate::sat::Clause;

pub struct InitializationConstraints;

impl InitializationConstraints {
    /// Each agent stands on its start cell at t=0
    fn agent_start_positions(ctx: &EncodingContext<'_>) -> Vec<Clause> {
        ctx.world
            .agents()
            .into_iter()
            .map(|agent| Clause::unit(ctx.pool.agent(agent.color, agent.position, 0)))
            .collect()
    }

    /// Every source emits its beam for the whole horizon
    fn laser_sources(ctx: &EncodingContext<'_>) -> Vec<Clause> {
        let mut clauses = Vec::new();
        for laser in ctx.world.lasers() {
            for t in ctx.time_steps() {
                clauses.push(Clause::unit(ctx.pool.beam(laser.color, laser.direction, laser.position, t)));
            }
        }
        clauses
    }

    fn static_facts(ctx: &EncodingContext<'_>) -> Vec<Clause> {
        let walls = ctx.world.walls().into_iter().map(|pos| Clause::unit(ctx.pool.wall(pos)));
        let exits = ctx.world.exits().into_iter().map(|pos| Clause::unit(ctx.pool.exit(pos)));
        walls.chain(exits).collect()
    }
}

impl ConstraintGenerator for InitializationConstraints {
    fn name(&self) -> &'static str {
        "initialization"
    }

    fn generate(&self, ctx: &EncodingContext<'_>) -> Vec<Clause> {
        let mut clauses = Self::agent_start_positions(ctx);
        clauses.extend(Self::laser_sources(ctx));
        clauses.extend(Self::static_facts(ctx));
        clauses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BeamMode;
    use crate::sat::constraints::test_support::world;
    use crate::sat::VariablePool;
    use crate::world::Direction;

    #[test]
    fn test_agent_start_units() {
        let world = world("S0 . S1\n. X .\n");
        let pool = VariablePool::new();
        let ctx = EncodingContext::new(&world, &pool, 3, BeamMode::SourceOnly);

        let clauses = InitializationConstraints.generate(&ctx);

        assert!(clauses.contains(&Clause::unit(pool.agent(0, (0, 0), 0))));
        assert!(clauses.contains(&Clause::unit(pool.agent(1, (0, 2), 0))));
        assert!(clauses.contains(&Clause::unit(pool.exit((1, 1)))));
        assert!(clauses.iter().all(Clause::is_unit));
    }

    #[test]
    fn test_laser_source_lit_for_whole_horizon() {
        let world = world("S0 L1E\n. X\n");
        let pool = VariablePool::new();
        let horizon = 4;
        let ctx = EncodingContext::new(&world, &pool, horizon, BeamMode::SourceOnly);

        let clauses = InitializationConstraints.generate(&ctx);

        for t in 0..=horizon {
            assert!(clauses.contains(&Clause::unit(pool.beam(1, Direction::East, (0, 1), t))));
        }
        // agent + (horizon + 1) beams + exit
        assert_eq!(clauses.len(), 1 + horizon + 1 + 1);
    }
}
