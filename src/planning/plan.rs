//! Plans and solved-problem records

use super::Action;
use crate::sat::EncodingStatistics;
use crate::world::{Color, Position};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Position of every agent at every time step, keyed by color
pub type Trajectories = BTreeMap<Color, Vec<Position>>;

/// A joint action plan.
///
/// `steps[t][i]` is the action of `agents[i]` between `t` and `t + 1`;
/// agents are listed by ascending color.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub agents: Vec<Color>,
    pub steps: Vec<Vec<Action>>,
}

impl Plan {
    pub fn new(agents: Vec<Color>, steps: Vec<Vec<Action>>) -> Self {
        Self { agents, steps }
    }

    /// Number of steps, equal to the horizon it was decoded at
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The action sequence of one agent
    pub fn actions_of(&self, color: Color) -> Option<Vec<Action>> {
        let index = self.agents.iter().position(|&c| c == color)?;
        Some(self.steps.iter().map(|step| step[index]).collect())
    }

    /// Number of non-`Stay` actions over the whole plan
    pub fn move_count(&self) -> usize {
        self.steps
            .iter()
            .flatten()
            .filter(|&&action| action != Action::Stay)
            .count()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (t, step) in self.steps.iter().enumerate() {
            write!(f, "t={}:", t)?;
            for (color, action) in self.agents.iter().zip(step) {
                write!(f, " S{}={}", color, action)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Represents a solved planning problem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub horizon: usize,
    pub plan: Plan,
    pub trajectories: Trajectories,
    pub statistics: EncodingStatistics,
    /// Time spent inside the SAT engine
    #[serde(with = "duration_millis")]
    pub solve_time: Duration,
}

impl Solution {
    pub fn new(
        horizon: usize,
        plan: Plan,
        trajectories: Trajectories,
        statistics: EncodingStatistics,
        solve_time: Duration,
    ) -> Self {
        Self {
            horizon,
            plan,
            trajectories,
            statistics,
            solve_time,
        }
    }

    /// Positions of every agent at time `t`, by ascending color
    pub fn positions_at(&self, t: usize) -> Vec<(Color, Position)> {
        self.trajectories
            .iter()
            .filter_map(|(&color, path)| path.get(t).map(|&pos| (color, pos)))
            .collect()
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Create from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Save to file
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from file
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
