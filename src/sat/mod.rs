//! SAT encoding of laser maze planning problems

pub mod constraints;
pub mod encoder;
pub mod formula;
pub mod solver;
pub mod variables;

pub use constraints::{ConstraintGenerator, EncodingContext};
pub use encoder::{EncodingStatistics, SatEncoder};
pub use formula::{Clause, Formula};
pub use solver::{EngineVerdict, Model, SatSolver};
pub use variables::{Proposition, VariablePool, VariableStatistics};
