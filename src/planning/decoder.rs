//! Turns satisfying models back into plans

use super::{Action, Plan, Trajectories};
use crate::error::{InvariantViolation, PlannerResult};
use crate::sat::{Model, Proposition, VariablePool};
use crate::world::{Color, Position};
use std::collections::BTreeMap;
use tracing::error;

/// Reads agent positions out of a model produced for one pool
pub struct PlanDecoder<'a> {
    pool: &'a VariablePool,
    agents: Vec<Color>,
}

impl<'a> PlanDecoder<'a> {
    /// `agents` are the colors the encoding placed on the grid
    pub fn new(pool: &'a VariablePool, agents: impl IntoIterator<Item = Color>) -> Self {
        let mut agents: Vec<Color> = agents.into_iter().collect();
        agents.sort_unstable();
        agents.dedup();
        Self { pool, agents }
    }

    /// Position of every agent at every step `0..=horizon`
    pub fn trajectories(&self, model: &Model, horizon: usize) -> PlannerResult<Trajectories> {
        let mut slots: BTreeMap<Color, Vec<Option<Position>>> = self
            .agents
            .iter()
            .map(|&color| (color, vec![None; horizon + 1]))
            .collect();

        for var in model.true_variables() {
            let Proposition::Agent { color, pos, t } = self.pool.proposition(var)? else {
                continue;
            };
            let Some(slot) = slots.get_mut(&color).and_then(|path| path.get_mut(t)) else {
                continue;
            };

            if let Some(first) = *slot {
                let violation = InvariantViolation::AmbiguousPosition {
                    color,
                    t,
                    first,
                    second: pos,
                };
                error!(%violation, "model places an agent twice");
                return Err(violation.into());
            }
            *slot = Some(pos);
        }

        slots
            .into_iter()
            .map(|(color, path)| -> PlannerResult<(Color, Vec<Position>)> {
                let positions = path
                    .into_iter()
                    .enumerate()
                    .map(|(t, pos)| pos.ok_or(InvariantViolation::MissingPosition { color, t }))
                    .collect::<Result<Vec<_>, _>>()
                    .inspect_err(|violation| error!(%violation, "model lost an agent"))?;
                Ok((color, positions))
            })
            .collect()
    }

    /// Decode the joint plan of `model` over `0..horizon`
    pub fn decode(&self, model: &Model, horizon: usize) -> PlannerResult<Plan> {
        let trajectories = self.trajectories(model, horizon)?;
        Self::plan_from_trajectories(&trajectories, horizon).map_err(Into::into)
    }

    /// Derive `horizon` steps of actions from consecutive positions. A step
    /// that is not a unit orthogonal move or a stay is an
    /// [`InvariantViolation::IllegalMove`]; a trajectory too short for the
    /// horizon is an [`InvariantViolation::MissingPosition`].
    pub fn plan_from_trajectories(trajectories: &Trajectories, horizon: usize) -> Result<Plan, InvariantViolation> {
        let agents: Vec<Color> = trajectories.keys().copied().collect();

        let mut steps = Vec::with_capacity(horizon);
        for t in 0..horizon {
            let mut step = Vec::with_capacity(agents.len());
            for (&color, path) in trajectories {
                let (from, to) = match (path.get(t), path.get(t + 1)) {
                    (Some(&from), Some(&to)) => (from, to),
                    (None, _) => return Err(InvariantViolation::MissingPosition { color, t }),
                    (_, None) => return Err(InvariantViolation::MissingPosition { color, t: t + 1 }),
                };
                let delta = (to.0 as isize - from.0 as isize, to.1 as isize - from.1 as isize);
                match Action::from_delta(delta) {
                    Some(action) => step.push(action),
                    None => {
                        let violation = InvariantViolation::IllegalMove { color, t, from, to };
                        error!(%violation, "decoded plan contains an illegal move");
                        return Err(violation);
                    }
                }
            }
            steps.push(step);
        }

        Ok(Plan::new(agents, steps))
    }
}
