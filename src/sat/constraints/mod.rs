//! Constraint generators for the planning encoding
//!
//! Each generator covers one concern and turns a world, the shared variable
//! pool and the horizon into an ordered batch of clauses. Generators only read
//! the world; the pool is the one piece of shared, append-only state.

pub mod initialization;
pub mod lasers;
pub mod movement;

pub use initialization::InitializationConstraints;
pub use lasers::LaserConstraints;
pub use movement::MovementConstraints;

use super::{Clause, VariablePool};
use crate::config::BeamMode;
use crate::world::WorldView;

/// Everything a generator may look at while producing clauses
#[derive(Clone, Copy)]
pub struct EncodingContext<'a> {
    pub world: &'a dyn WorldView,
    pub pool: &'a VariablePool,
    /// Last time step; steps range over `0..=horizon`
    pub horizon: usize,
    pub beam_mode: BeamMode,
}

impl<'a> EncodingContext<'a> {
    pub fn new(world: &'a dyn WorldView, pool: &'a VariablePool, horizon: usize, beam_mode: BeamMode) -> Self {
        Self {
            world,
            pool,
            horizon,
            beam_mode,
        }
    }

    /// Every time step `0..=horizon`
    pub fn time_steps(&self) -> std::ops::RangeInclusive<usize> {
        0..=self.horizon
    }
}

/// A producer of clauses for one concern of the encoding.
///
/// The returned batch is finite and is consumed once by the encoder.
pub trait ConstraintGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    fn generate(&self, ctx: &EncodingContext<'_>) -> Vec<Clause>;
}

/// The full set of generators, in the order their clauses are accumulated
pub fn default_generators() -> Vec<Box<dyn ConstraintGenerator>> {
    vec![
        Box::new(InitializationConstraints),
        Box::new(MovementConstraints),
        Box::new(LaserConstraints),
    ]
}
