//! Configuration management for the laser maze planner

pub mod settings;

pub use settings::{
    BeamMode, CliOverrides, EncodingConfig, InputConfig, OutputConfig, OutputFormat, PlanningConfig, Settings,
    SolverConfig,
};
