//! Combat diagnostics.
//!
//! Nothing in the battle core is fatal. Resolvers that cannot act echo their
//! inputs back and attach one of these as a diagnostic; the turn orchestrator
//! collects them as warnings and keeps going.

use serde::{Deserialize, Serialize};

use super::id::CreatureId;

/// Why a creature, action, or lookup was skipped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum CombatError {
    /// Creature has no raw attributes to derive stats from.
    #[error("{creature} ({species}) has no base stats")]
    MissingStats { creature: CreatureId, species: String },

    /// Creature has never had its battle stats derived.
    #[error("{creature} ({species}) has no battle stats")]
    MissingBattleStats { creature: CreatureId, species: String },

    /// The effect catalog has nothing for this item.
    #[error("no catalog effect for {item}")]
    CatalogMiss { item: String },

    /// A creature's effect pass already ran for this turn.
    #[error("{creature} already processed on turn {turn}")]
    AlreadyProcessed { creature: CreatureId, turn: u32 },

    /// Difficulty name did not match any tier.
    #[error("unknown difficulty '{0}'")]
    UnknownDifficulty(String),

    /// Configuration could not be parsed.
    #[error("invalid battle config: {0}")]
    InvalidConfig(String),
}

impl CombatError {
    /// Creature the diagnostic refers to, if any.
    #[must_use]
    pub fn creature(&self) -> Option<CreatureId> {
        match self {
            CombatError::MissingStats { creature, .. }
            | CombatError::MissingBattleStats { creature, .. }
            | CombatError::AlreadyProcessed { creature, .. } => Some(*creature),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = CombatError::MissingStats {
            creature: CreatureId(4),
            species: "Emberfox".to_string(),
        };
        assert_eq!(err.to_string(), "Creature(4) (Emberfox) has no base stats");
        assert_eq!(err.creature(), Some(CreatureId(4)));

        let miss = CombatError::CatalogMiss { item: "Rusty Spoon".to_string() };
        assert_eq!(miss.to_string(), "no catalog effect for Rusty Spoon");
        assert_eq!(miss.creature(), None);
    }
}
