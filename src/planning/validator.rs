//! Independent check of decoded plans against the world rules

use super::{Action, Trajectories};
use crate::config::BeamMode;
use crate::world::{Color, Position, WorldView};
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

/// Re-checks a plan by simulation, without looking at the encoding
pub struct PlanValidator {
    beam_mode: BeamMode,
}

/// Represents a rule violation found during validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    MissingAgent { color: Color },
    WrongLength { color: Color, expected: usize, actual: usize },
    WrongStart { color: Color, expected: Position, actual: Position },
    IllegalStep { color: Color, t: usize, from: Position, to: Position },
    OnWall { color: Color, t: usize, pos: Position },
    Collision { t: usize, pos: Position, first: Color, second: Color },
    LaserHit { color: Color, laser: Color, t: usize, pos: Position },
    ExitUncovered { pos: Position },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingAgent { color } => write!(f, "agent {} has no trajectory", color),
            Violation::WrongLength { color, expected, actual } => {
                write!(f, "agent {} has {} positions, expected {}", color, actual, expected)
            }
            Violation::WrongStart { color, expected, actual } => {
                write!(f, "agent {} starts at {:?} instead of {:?}", color, actual, expected)
            }
            Violation::IllegalStep { color, t, from, to } => {
                write!(f, "agent {} jumps from {:?} to {:?} at t={}", color, from, to, t)
            }
            Violation::OnWall { color, t, pos } => write!(f, "agent {} stands on wall {:?} at t={}", color, pos, t),
            Violation::Collision { t, pos, first, second } => {
                write!(f, "agents {} and {} share {:?} at t={}", first, second, pos, t)
            }
            Violation::LaserHit { color, laser, t, pos } => {
                write!(f, "agent {} is hit by laser {} at {:?} at t={}", color, laser, pos, t)
            }
            Violation::ExitUncovered { pos } => write!(f, "exit {:?} is empty at the final step", pos),
        }
    }
}

/// Result of plan validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return write!(f, "plan is valid");
        }

        write!(f, "{} violation(s): ", self.violations.len())?;
        for (i, violation) in self.violations.iter().take(3).enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", violation)?;
        }
        if self.violations.len() > 3 {
            write!(f, "; ... and {} more", self.violations.len() - 3)?;
        }
        Ok(())
    }
}

impl PlanValidator {
    pub fn new(beam_mode: BeamMode) -> Self {
        Self { beam_mode }
    }

    /// Validate `trajectories` over `0..=horizon` in `world`
    pub fn validate(&self, world: &dyn WorldView, trajectories: &Trajectories, horizon: usize) -> ValidationResult {
        let mut violations = Vec::new();

        let agents = world.agents();
        for agent in &agents {
            match trajectories.get(&agent.color) {
                None => violations.push(Violation::MissingAgent { color: agent.color }),
                Some(path) if path.len() != horizon + 1 => violations.push(Violation::WrongLength {
                    color: agent.color,
                    expected: horizon + 1,
                    actual: path.len(),
                }),
                Some(path) if path[0] != agent.position => violations.push(Violation::WrongStart {
                    color: agent.color,
                    expected: agent.position,
                    actual: path[0],
                }),
                Some(_) => {}
            }
        }
        // Later checks index every step, so stop on malformed input
        if !violations.is_empty() {
            return ValidationResult { violations };
        }

        for (&color, path) in trajectories {
            for (t, (&from, &to)) in path.iter().tuple_windows().enumerate() {
                let delta = (to.0 as isize - from.0 as isize, to.1 as isize - from.1 as isize);
                if Action::from_delta(delta).is_none() {
                    violations.push(Violation::IllegalStep { color, t, from, to });
                }
            }
            for (t, &pos) in path.iter().enumerate() {
                if world.is_wall(pos) {
                    violations.push(Violation::OnWall { color, t, pos });
                }
            }
        }

        for t in 0..=horizon {
            for ((&first, a), (&second, b)) in trajectories.iter().tuple_combinations() {
                if a[t] == b[t] {
                    violations.push(Violation::Collision {
                        t,
                        pos: a[t],
                        first,
                        second,
                    });
                }
            }

            let lit = self.lit_cells(world, trajectories, t);
            for (&color, path) in trajectories {
                let pos = path[t];
                for &laser in lit.get(&pos).into_iter().flatten() {
                    if laser != color {
                        violations.push(Violation::LaserHit { color, laser, t, pos });
                    }
                }
            }
        }

        for exit in world.exits() {
            if !trajectories.values().any(|path| path[horizon] == exit) {
                violations.push(Violation::ExitUncovered { pos: exit });
            }
        }

        ValidationResult { violations }
    }

    /// Colors of the lasers lighting each cell at time `t`
    pub fn lit_cells(
        &self,
        world: &dyn WorldView,
        trajectories: &Trajectories,
        t: usize,
    ) -> HashMap<Position, BTreeSet<Color>> {
        let occupants: BTreeMap<Position, Color> = trajectories
            .iter()
            .filter_map(|(&color, path)| path.get(t).map(|&pos| (pos, color)))
            .collect();

        let mut lit: HashMap<Position, BTreeSet<Color>> = HashMap::new();
        for laser in world.lasers() {
            lit.entry(laser.position).or_default().insert(laser.color);
            if self.beam_mode == BeamMode::SourceOnly {
                continue;
            }

            let mut current = laser.position;
            loop {
                // an agent of the laser's own color absorbs the beam
                if occupants.get(&current) == Some(&laser.color) {
                    break;
                }
                match world.offset(current, laser.direction) {
                    Some(next) if !world.is_wall(next) => {
                        lit.entry(next).or_default().insert(laser.color);
                        current = next;
                    }
                    _ => break,
                }
            }
        }
        lit
    }
}
