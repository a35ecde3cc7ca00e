//! Configuration settings for the laser maze planner

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub planning: PlanningConfig,
    pub encoding: EncodingConfig,
    pub solver: SolverConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningConfig {
    /// Number of time steps in the plan (T_MAX)
    pub horizon: usize,
    /// When set, search horizons `0..=max_horizon` and keep the first solvable one
    #[serde(default)]
    pub max_horizon: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingConfig {
    pub beam_mode: BeamMode,
    /// Run the constraint generators on the rayon thread pool
    #[serde(default)]
    pub parallel: bool,
}

/// How far a laser lights the grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeamMode {
    /// Only the source cell is lit, for the whole horizon
    #[default]
    SourceOnly,
    /// The beam extends from the source until a wall, the grid edge, or an
    /// agent of the laser's own color
    Propagate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    pub validate_plans: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub level_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub output_directory: PathBuf,
    #[serde(default)]
    pub save_dimacs: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            planning: PlanningConfig {
                horizon: 10,
                max_horizon: None,
            },
            encoding: EncodingConfig {
                beam_mode: BeamMode::SourceOnly,
                parallel: false,
            },
            solver: SolverConfig {
                timeout_seconds: None,
                validate_plans: true,
            },
            input: InputConfig {
                level_file: PathBuf::from("levels/open_room.txt"),
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                output_directory: PathBuf::from("output/plans"),
                save_dimacs: false,
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content).with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.solver.timeout_seconds == Some(0) {
            anyhow::bail!("Solver timeout must be positive when set");
        }

        if !self.input.level_file.exists() {
            anyhow::bail!("Level file does not exist: {}", self.input.level_file.display());
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(horizon) = cli_overrides.horizon {
            self.planning.horizon = horizon;
        }
        if let Some(max_horizon) = cli_overrides.max_horizon {
            self.planning.max_horizon = Some(max_horizon);
        }
        if let Some(beam_mode) = cli_overrides.beam_mode {
            self.encoding.beam_mode = beam_mode;
        }
        if let Some(ref level_file) = cli_overrides.level_file {
            self.input.level_file = level_file.clone();
        }
        if let Some(ref output_dir) = cli_overrides.output_dir {
            self.output.output_directory = output_dir.clone();
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub horizon: Option<usize>,
    pub max_horizon: Option<usize>,
    pub beam_mode: Option<BeamMode>,
    pub level_file: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}
