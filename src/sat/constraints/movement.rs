//! Agent positions, moves, collisions and the exit goal

use super::{ConstraintGenerator, EncodingContext};
use crate::sat::Clause;
use crate::world::{AgentSpec, Position};
use itertools::Itertools;

pub struct MovementConstraints;

impl MovementConstraints {
    /// Exactly one cell per agent per time step: one at-least-one clause plus
    /// pairwise at-most-one clauses.
    fn unique_position(ctx: &EncodingContext<'_>, agents: &[AgentSpec], positions: &[Position]) -> Vec<Clause> {
        let mut clauses = Vec::new();
        for agent in agents {
            let c = agent.color;
            for t in ctx.time_steps() {
                clauses.push(Clause::new(
                    positions.iter().map(|&pos| ctx.pool.agent(c, pos, t)).collect(),
                ));

                for (&p1, &p2) in positions.iter().tuple_combinations() {
                    clauses.push(Clause::binary(-ctx.pool.agent(c, p1, t), -ctx.pool.agent(c, p2, t)));
                }
            }
        }
        clauses
    }

    /// Moves go to the same cell or a non-wall neighbour, in both time
    /// directions: a cell occupied at t+1 needs a legal predecessor at t.
    fn movement_rules(ctx: &EncodingContext<'_>, agents: &[AgentSpec], positions: &[Position]) -> Vec<Clause> {
        let reachable: Vec<Vec<Position>> = positions
            .iter()
            .map(|&pos| {
                std::iter::once(pos)
                    .chain(
                        ctx.world
                            .neighbors(pos, false)
                            .into_iter()
                            .filter(|&n| !ctx.world.is_wall(n)),
                    )
                    .collect()
            })
            .collect();

        let mut clauses = Vec::new();
        for agent in agents {
            let c = agent.color;
            for t in 0..ctx.horizon {
                for (&pos, targets) in positions.iter().zip(&reachable) {
                    clauses.push(Clause::implies_any(
                        ctx.pool.agent(c, pos, t),
                        targets.iter().map(|&n| ctx.pool.agent(c, n, t + 1)),
                    ));
                    clauses.push(Clause::implies_any(
                        ctx.pool.agent(c, pos, t + 1),
                        targets.iter().map(|&n| ctx.pool.agent(c, n, t)),
                    ));
                }
            }
        }
        clauses
    }

    /// No agent ever stands on a wall
    fn avoid_walls(ctx: &EncodingContext<'_>, agents: &[AgentSpec]) -> Vec<Clause> {
        let walls = ctx.world.walls();
        let mut clauses = Vec::new();
        for agent in agents {
            for t in ctx.time_steps() {
                for &wall in &walls {
                    clauses.push(Clause::binary(-ctx.pool.wall(wall), -ctx.pool.agent(agent.color, wall, t)));
                }
            }
        }
        clauses
    }

    /// Two distinct agents never share a cell
    fn no_overlap(ctx: &EncodingContext<'_>, agents: &[AgentSpec], positions: &[Position]) -> Vec<Clause> {
        let mut clauses = Vec::new();
        for (a1, a2) in agents.iter().tuple_combinations() {
            for t in ctx.time_steps() {
                for &pos in positions {
                    clauses.push(Clause::binary(
                        -ctx.pool.agent(a1.color, pos, t),
                        -ctx.pool.agent(a2.color, pos, t),
                    ));
                }
            }
        }
        clauses
    }

    /// Every exit holds some agent at the final step. With no agents at all
    /// this is the empty clause.
    fn must_be_on_exit(ctx: &EncodingContext<'_>, agents: &[AgentSpec]) -> Vec<Clause> {
        ctx.world
            .exits()
            .into_iter()
            .map(|exit| {
                Clause::new(
                    agents
                        .iter()
                        .map(|agent| ctx.pool.agent(agent.color, exit, ctx.horizon))
                        .collect(),
                )
            })
            .collect()
    }
}

impl ConstraintGenerator for MovementConstraints {
    fn name(&self) -> &'static str {
        "movement"
    }

    fn generate(&self, ctx: &EncodingContext<'_>) -> Vec<Clause> {
        let agents = ctx.world.agents();
        let positions = ctx.world.positions();

        let mut clauses = Self::movement_rules(ctx, &agents, &positions);
        clauses.extend(Self::unique_position(ctx, &agents, &positions));
        clauses.extend(Self::avoid_walls(ctx, &agents));
        clauses.extend(Self::no_overlap(ctx, &agents, &positions));
        clauses.extend(Self::must_be_on_exit(ctx, &agents));
        clauses
    }
}
