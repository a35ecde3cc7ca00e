//! Variable pool for the SAT encoding

use crate::error::{PlannerError, PlannerResult};
use crate::world::{Color, Direction, Position};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;

/// Propositions used in the encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Proposition {
    /// Agent `color` occupies `pos` at time `t`
    Agent { color: Color, pos: Position, t: usize },
    /// Some laser of `color` is active at `pos` at time `t`
    Laser { color: Color, pos: Position, t: usize },
    /// The `direction` beam of `color` is active at `pos` at time `t`
    Beam {
        color: Color,
        direction: Direction,
        pos: Position,
        t: usize,
    },
    /// Static wall fact
    Wall { pos: Position },
    /// Static exit fact
    Exit { pos: Position },
}

impl fmt::Display for Proposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Proposition::Agent { color, pos, t } => write!(f, "agent({}, ({}, {}), t={})", color, pos.0, pos.1, t),
            Proposition::Laser { color, pos, t } => write!(f, "laser({}, ({}, {}), t={})", color, pos.0, pos.1, t),
            Proposition::Beam { color, direction, pos, t } => {
                write!(f, "beam({}, {}, ({}, {}), t={})", color, direction, pos.0, pos.1, t)
            }
            Proposition::Wall { pos } => write!(f, "wall({}, {})", pos.0, pos.1),
            Proposition::Exit { pos } => write!(f, "exit({}, {})", pos.0, pos.1),
        }
    }
}

#[derive(Debug, Default)]
struct PoolState {
    ids: HashMap<Proposition, i32>,
    /// `propositions[id - 1]` is the proposition behind `id`
    propositions: Vec<Proposition>,
}

/// Bijection between propositions and SAT variable ids.
///
/// Ids start at 1 and are handed out in first-request order. The pool is
/// shared by every constraint generator of one solve; `id` takes `&self`
/// and serialises allocation behind a single lock.
#[derive(Debug, Default)]
pub struct VariablePool {
    state: Mutex<PoolState>,
}

impl VariablePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or allocate the id of `proposition`
    pub fn id(&self, proposition: Proposition) -> i32 {
        let mut state = self.state.lock();
        if let Some(&id) = state.ids.get(&proposition) {
            return id;
        }

        state.propositions.push(proposition);
        let id = state.propositions.len() as i32;
        state.ids.insert(proposition, id);
        id
    }

    /// Inverse lookup; the sign of `literal` is ignored
    pub fn proposition(&self, literal: i32) -> PlannerResult<Proposition> {
        let state = self.state.lock();
        let index = literal.unsigned_abs() as usize;
        if index == 0 {
            return Err(PlannerError::UnknownLiteral(literal));
        }
        state
            .propositions
            .get(index - 1)
            .copied()
            .ok_or(PlannerError::UnknownLiteral(literal))
    }

    pub fn agent(&self, color: Color, pos: Position, t: usize) -> i32 {
        self.id(Proposition::Agent { color, pos, t })
    }

    pub fn laser(&self, color: Color, pos: Position, t: usize) -> i32 {
        self.id(Proposition::Laser { color, pos, t })
    }

    pub fn beam(&self, color: Color, direction: Direction, pos: Position, t: usize) -> i32 {
        self.id(Proposition::Beam { color, direction, pos, t })
    }

    pub fn wall(&self, pos: Position) -> i32 {
        self.id(Proposition::Wall { pos })
    }

    pub fn exit(&self, pos: Position) -> i32 {
        self.id(Proposition::Exit { pos })
    }

    /// Number of variables allocated so far
    pub fn len(&self) -> usize {
        self.state.lock().propositions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get statistics about variable usage
    pub fn statistics(&self) -> VariableStatistics {
        let state = self.state.lock();
        let mut stats = VariableStatistics {
            total_variables: state.propositions.len(),
            ..Default::default()
        };

        for proposition in &state.propositions {
            match proposition {
                Proposition::Agent { .. } => stats.agent_variables += 1,
                Proposition::Laser { .. } => stats.laser_variables += 1,
                Proposition::Beam { .. } => stats.beam_variables += 1,
                Proposition::Wall { .. } | Proposition::Exit { .. } => stats.static_variables += 1,
            }
        }

        stats
    }
}

/// Statistics about variable usage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableStatistics {
    pub total_variables: usize,
    pub agent_variables: usize,
    pub laser_variables: usize,
    pub beam_variables: usize,
    pub static_variables: usize,
}

impl fmt::Display for VariableStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Variable Statistics:")?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  Agent variables: {}", self.agent_variables)?;
        writeln!(f, "  Laser variables: {}", self.laser_variables)?;
        writeln!(f, "  Beam variables: {}", self.beam_variables)?;
        writeln!(f, "  Static facts: {}", self.static_variables)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn test_variable_creation() {
        let pool = VariablePool::new();

        let var1 = pool.agent(0, (0, 0), 0);
        let var2 = pool.agent(0, (1, 1), 1);

        assert_eq!(var1, 1);
        assert_eq!(var2, 2);

        // Same proposition, same id
        assert_eq!(pool.agent(0, (0, 0), 0), var1);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_distinct_kinds_get_distinct_ids() {
        let pool = VariablePool::new();
        let ids = [
            pool.agent(1, (2, 3), 4),
            pool.laser(1, (2, 3), 4),
            pool.beam(1, Direction::East, (2, 3), 4),
            pool.beam(1, Direction::West, (2, 3), 4),
            pool.wall((2, 3)),
            pool.exit((2, 3)),
        ];

        let mut unique = ids.to_vec();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_inverse_lookup() {
        let pool = VariablePool::new();
        let id = pool.beam(2, Direction::North, (0, 1), 3);

        let expected = Proposition::Beam {
            color: 2,
            direction: Direction::North,
            pos: (0, 1),
            t: 3,
        };
        assert_eq!(pool.proposition(id).unwrap(), expected);
        assert_eq!(pool.proposition(-id).unwrap(), expected);
    }

    #[test]
    fn test_unknown_literal() {
        let pool = VariablePool::new();
        pool.wall((0, 0));

        assert!(matches!(pool.proposition(0), Err(PlannerError::UnknownLiteral(0))));
        assert!(matches!(pool.proposition(2), Err(PlannerError::UnknownLiteral(2))));
        assert!(matches!(pool.proposition(-7), Err(PlannerError::UnknownLiteral(-7))));
    }

    #[test]
    fn test_deterministic_allocation() {
        let allocate = || {
            let pool = VariablePool::new();
            (0..5)
                .flat_map(|t| (0..3).map(move |c| (c, t)))
                .map(|(c, t)| pool.agent(c, (c, t), t))
                .collect::<Vec<_>>()
        };
        assert_eq!(allocate(), allocate());
    }

    #[test]
    fn test_concurrent_requests_share_ids() {
        let pool = VariablePool::new();
        let ids: Vec<i32> = (0..64)
            .into_par_iter()
            .map(|i| pool.agent(0, (i % 4, 0), 0))
            .collect();

        assert_eq!(pool.len(), 4);
        for (i, id) in ids.iter().enumerate() {
            assert_eq!(*id, pool.agent(0, (i % 4, 0), 0));
        }
    }

    #[test]
    fn test_statistics() {
        let pool = VariablePool::new();
        pool.agent(0, (0, 0), 0);
        pool.agent(0, (0, 1), 0);
        pool.laser(1, (0, 0), 0);
        pool.exit((1, 1));

        let stats = pool.statistics();
        assert_eq!(stats.total_variables, 4);
        assert_eq!(stats.agent_variables, 2);
        assert_eq!(stats.laser_variables, 1);
        assert_eq!(stats.beam_variables, 0);
        assert_eq!(stats.static_variables, 1);
    }

    #[test]
    fn test_display() {
        let proposition = Proposition::Agent { color: 1, pos: (2, 3), t: 4 };
        assert_eq!(proposition.to_string(), "agent(1, (2, 3), t=4)");
    }
}
