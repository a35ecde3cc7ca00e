//! Laser safety, beam/laser linkage and optional beam propagation

use super::{ConstraintGenerator, EncodingContext};
use crate::config::BeamMode;
use crate::sat::Clause;
use crate::world::{Color, Direction, LaserSpec, Position};
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet};

pub struct LaserConstraints;

impl LaserConstraints {
    /// Beam directions used by each laser color, both sorted
    fn directions_by_color(lasers: &[LaserSpec]) -> BTreeMap<Color, BTreeSet<Direction>> {
        let mut directions: BTreeMap<Color, BTreeSet<Direction>> = BTreeMap::new();
        for laser in lasers {
            directions.entry(laser.color).or_default().insert(laser.direction);
        }
        directions
    }

    /// An agent never stands where a laser of another color is active
    fn no_step_on_active_laser(ctx: &EncodingContext<'_>, laser_colors: &[Color], positions: &[Position]) -> Vec<Clause> {
        let mut clauses = Vec::new();
        for agent in ctx.world.agents() {
            for &laser_color in laser_colors.iter().filter(|&&c| c != agent.color) {
                for t in ctx.time_steps() {
                    for &pos in positions {
                        clauses.push(Clause::binary(
                            -ctx.pool.agent(agent.color, pos, t),
                            -ctx.pool.laser(laser_color, pos, t),
                        ));
                    }
                }
            }
        }
        clauses
    }

    /// `laser(c, p, t) ↔ ⋁_d beam(c, d, p, t)` over the directions of color `c`
    fn link_beam_and_laser(
        ctx: &EncodingContext<'_>,
        directions: &BTreeMap<Color, BTreeSet<Direction>>,
        positions: &[Position],
    ) -> Vec<Clause> {
        let mut clauses = Vec::new();
        for (&color, dirs) in directions {
            for &pos in positions {
                for t in ctx.time_steps() {
                    let laser = ctx.pool.laser(color, pos, t);
                    let beams: Vec<i32> = dirs.iter().map(|&d| ctx.pool.beam(color, d, pos, t)).collect();

                    for &beam in &beams {
                        clauses.push(Clause::binary(-beam, laser));
                    }
                    clauses.push(Clause::implies_any(laser, beams));
                }
            }
        }
        clauses
    }

    /// Beams travel away from their source. A cell is lit iff its predecessor
    /// along the beam is lit, the cell is not a wall, and no agent of the
    /// beam's color stands on the predecessor. Source cells are fixed by the
    /// initialization constraints.
    fn beam_propagation(ctx: &EncodingContext<'_>, lasers: &[LaserSpec], positions: &[Position]) -> Vec<Clause> {
        let agent_colors: BTreeSet<Color> = ctx.world.agents().iter().map(|agent| agent.color).collect();
        let sources: BTreeMap<(Color, Direction), BTreeSet<Position>> = lasers
            .iter()
            .map(|laser| ((laser.color, laser.direction), laser.position))
            .into_group_map()
            .into_iter()
            .map(|(key, positions)| (key, positions.into_iter().collect()))
            .collect();

        let mut clauses = Vec::new();
        for (&(color, direction), source_cells) in &sources {
            let blocker_exists = agent_colors.contains(&color);
            let opposite = match direction {
                Direction::North => Direction::South,
                Direction::South => Direction::North,
                Direction::East => Direction::West,
                Direction::West => Direction::East,
            };

            for &pos in positions.iter().filter(|pos| !source_cells.contains(pos)) {
                let predecessor = ctx.world.offset(pos, opposite).filter(|_| !ctx.world.is_wall(pos));

                for t in ctx.time_steps() {
                    let beam = ctx.pool.beam(color, direction, pos, t);
                    match predecessor {
                        None => clauses.push(Clause::unit(-beam)),
                        Some(prev) => {
                            let prev_beam = ctx.pool.beam(color, direction, prev, t);
                            clauses.push(Clause::binary(-beam, prev_beam));
                            if blocker_exists {
                                let blocker = ctx.pool.agent(color, prev, t);
                                clauses.push(Clause::binary(-beam, -blocker));
                                clauses.push(Clause::new(vec![beam, -prev_beam, blocker]));
                            } else {
                                clauses.push(Clause::binary(beam, -prev_beam));
                            }
                        }
                    }
                }
            }
        }
        clauses
    }
}

impl ConstraintGenerator for LaserConstraints {
    fn name(&self) -> &'static str {
        "lasers"
    }

    fn generate(&self, ctx: &EncodingContext<'_>) -> Vec<Clause> {
        let lasers = ctx.world.lasers();
        if lasers.is_empty() {
            return Vec::new();
        }

        let positions = ctx.world.positions();
        let directions = Self::directions_by_color(&lasers);
        let laser_colors: Vec<Color> = directions.keys().copied().collect();

        let mut clauses = Self::no_step_on_active_laser(ctx, &laser_colors, &positions);
        clauses.extend(Self::link_beam_and_laser(ctx, &directions, &positions));
        if ctx.beam_mode == BeamMode::Propagate {
            clauses.extend(Self::beam_propagation(ctx, &lasers, &positions));
        }
        clauses
    }
}
