//! Output helpers shared by the CLI

pub mod display;

pub use display::{ColorOutput, PlanFormatter};
