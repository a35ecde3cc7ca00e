//! Error taxonomy for the planning core

use crate::world::{Color, Position};
use thiserror::Error;

/// Errors raised while encoding, solving or decoding a planning problem.
///
/// Unsatisfiability is not an error: it is reported through
/// [`crate::planning::SolveOutcome::Unsatisfiable`].
#[derive(Debug, Error)]
pub enum PlannerError {
    /// Inverse lookup on an id that the variable pool never allocated
    #[error("literal {0} was never allocated by this variable pool")]
    UnknownLiteral(i32),

    /// The decoded model breaks a property the encoding should guarantee
    #[error("encoding invariant violated: {0}")]
    EncodingInvariantViolation(#[from] InvariantViolation),

    /// The SAT engine could not be created
    #[error("SAT engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The world handed to the planner is malformed
    #[error("invalid world: {0}")]
    InvalidWorld(String),
}

/// Specific ways a satisfying model can contradict the encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("agent {color} moved from {from:?} to {to:?} between t={t} and t={}", t + 1)]
    IllegalMove {
        color: Color,
        t: usize,
        from: Position,
        to: Position,
    },

    #[error("agent {color} has no position at t={t}")]
    MissingPosition { color: Color, t: usize },

    #[error("agent {color} occupies both {first:?} and {second:?} at t={t}")]
    AmbiguousPosition {
        color: Color,
        t: usize,
        first: Position,
        second: Position,
    },

    #[error("decoded plan failed validation: {0}")]
    ValidationFailed(String),
}

pub type PlannerResult<T> = std::result::Result<T, PlannerError>;
