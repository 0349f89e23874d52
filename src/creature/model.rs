//! Creature: a mutable combat participant.
//!
//! A creature carries its raw attributes (`stats`), its derived battle stats
//! (`battle_stats`), and the ordered list of timed effects currently attached
//! to it. Effects are kept in application order, never priority-sorted.
//!
//! ## Health invariant
//!
//! `current_health` stays within `[0, max_health]` after every mutation made
//! through the helpers on this type. A creature at 0 health is dead and is
//! removed from its roster by the turn orchestrator's defeat sweep.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{CombatError, CreatureId};
use crate::effects::{Effect, EffectKind};

use super::stats::{Attribute, BaseStats, BattleStats, StatMods};

/// Creature rarity tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Multiplier on per-turn effect health deltas received by this creature.
    #[must_use]
    pub const fn effect_scale(self) -> f64 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Rare => 1.1,
            Rarity::Epic => 1.15,
            Rarity::Legendary => 1.2,
        }
    }

    /// Multiplier on this creature's energy-regen contribution.
    #[must_use]
    pub const fn energy_factor(self) -> f64 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Rare => 1.1,
            Rarity::Epic => 1.2,
            Rarity::Legendary => 1.3,
        }
    }

    /// Multiplier on derived stats and on defensive-stance strength.
    #[must_use]
    pub const fn stat_multiplier(self) -> f64 {
        match self {
            Rarity::Common => 1.0,
            Rarity::Rare => 1.03,
            Rarity::Epic => 1.06,
            Rarity::Legendary => 1.1,
        }
    }

    /// Ordinal value (1 for Common through 4 for Legendary).
    #[must_use]
    pub const fn value(self) -> i32 {
        match self {
            Rarity::Common => 1,
            Rarity::Rare => 2,
            Rarity::Epic => 3,
            Rarity::Legendary => 4,
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Rarity::Common => "Common",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        };
        f.write_str(name)
    }
}

/// Elemental affinity, used by combat math for effectiveness.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    #[default]
    Neutral,
    Fire,
    Water,
    Earth,
    Air,
    Light,
    Dark,
}

/// A combat participant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub id: CreatureId,
    pub species_name: String,
    pub rarity: Rarity,
    /// Evolution tier, 0 for the base form.
    pub form: u32,
    pub element: Element,
    /// Attributes this creature specializes in.
    pub specialties: SmallVec<[Attribute; 2]>,
    /// Raw attributes. `None` marks a malformed record.
    pub stats: Option<BaseStats>,
    /// Derived stats. `None` until first derived.
    pub battle_stats: Option<BattleStats>,
    pub current_health: i32,
    /// Active effects in application order.
    pub active_effects: Vec<Effect>,
    /// Flat bonuses from items and combinations, applied after effects.
    pub permanent_modifications: StatMods,
    pub combination_level: u32,
    pub is_defending: bool,
    /// One-shot attack bonus consumed by the next attack.
    pub next_attack_bonus: Option<i32>,
    /// Last turn index this creature was touched on, for effect start stamps.
    pub current_turn: u32,
    /// Turn index of the last effect pass, guards against double processing.
    pub last_effect_pass: Option<u32>,
}

impl Creature {
    /// Create a creature with raw attributes and no derived stats yet.
    pub fn new(
        id: CreatureId,
        species_name: impl Into<String>,
        rarity: Rarity,
        stats: BaseStats,
    ) -> Self {
        Self {
            id,
            species_name: species_name.into(),
            rarity,
            form: 0,
            element: Element::Neutral,
            specialties: SmallVec::new(),
            stats: Some(stats),
            battle_stats: None,
            current_health: 0,
            active_effects: Vec::new(),
            permanent_modifications: StatMods::new(),
            combination_level: 0,
            is_defending: false,
            next_attack_bonus: None,
            current_turn: 0,
            last_effect_pass: None,
        }
    }

    #[must_use]
    pub fn with_form(mut self, form: u32) -> Self {
        self.form = form;
        self
    }

    #[must_use]
    pub fn with_element(mut self, element: Element) -> Self {
        self.element = element;
        self
    }

    #[must_use]
    pub fn with_specialty(mut self, attribute: Attribute) -> Self {
        if !self.specialties.contains(&attribute) {
            self.specialties.push(attribute);
        }
        self
    }

    #[must_use]
    pub fn with_combination_level(mut self, level: u32) -> Self {
        self.combination_level = level;
        self
    }

    /// Set derived stats directly and fill health to the new maximum.
    #[must_use]
    pub fn with_battle_stats(mut self, battle_stats: BattleStats) -> Self {
        self.current_health = battle_stats.max_health;
        self.battle_stats = Some(battle_stats);
        self
    }

    #[must_use]
    pub fn with_health(mut self, health: i32) -> Self {
        self.current_health = health;
        self.clamp_health();
        self
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    #[must_use]
    pub fn is_specialist(&self, attribute: Attribute) -> bool {
        self.specialties.contains(&attribute)
    }

    /// Raw attributes, or a diagnostic for a malformed record.
    pub fn require_stats(&self) -> Result<&BaseStats, CombatError> {
        self.stats.as_ref().ok_or_else(|| CombatError::MissingStats {
            creature: self.id,
            species: self.species_name.clone(),
        })
    }

    /// Derived stats, or a diagnostic if they were never derived.
    pub fn require_battle_stats(&self) -> Result<&BattleStats, CombatError> {
        self.battle_stats
            .as_ref()
            .ok_or_else(|| CombatError::MissingBattleStats {
                creature: self.id,
                species: self.species_name.clone(),
            })
    }

    /// Current maximum health (0 without derived stats).
    #[must_use]
    pub fn max_health(&self) -> i32 {
        self.battle_stats.map(|s| s.max_health).unwrap_or(0)
    }

    /// Clamp health into `[0, max_health]`.
    pub fn clamp_health(&mut self) {
        let max = self.max_health().max(0);
        self.current_health = self.current_health.clamp(0, max);
    }

    /// Apply a signed health change with clamping. Returns the actual change.
    pub fn change_health(&mut self, delta: i32) -> i32 {
        let before = self.current_health;
        self.current_health = self.current_health.saturating_add(delta);
        self.clamp_health();
        self.current_health - before
    }

    /// Subtract damage (floor 0). Returns damage actually taken.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        -self.change_health(-amount.max(0))
    }

    /// Add healing (ceiling max health). Returns health actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        self.change_health(amount.max(0))
    }

    /// Damage-reduction fraction from an active defensive stance.
    #[must_use]
    pub fn stance_damage_reduction(&self) -> f64 {
        if !self.is_defending {
            return 0.0;
        }
        self.active_effects
            .iter()
            .filter_map(|e| match e.kind {
                EffectKind::Defense { damage_reduction } => Some(damage_reduction),
                _ => None,
            })
            .fold(0.0, f64::max)
    }

    /// True if any Defense effect is still attached.
    #[must_use]
    pub fn has_stance(&self) -> bool {
        self.active_effects.iter().any(Effect::is_defense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Creature {
        Creature::new(CreatureId(1), "Pebblet", Rarity::Common, BaseStats::new(5, 5, 5, 5, 5))
            .with_battle_stats(BattleStats {
                max_health: 40,
                ..BattleStats::default()
            })
    }

    #[test]
    fn test_health_clamping() {
        let mut c = sample();
        assert_eq!(c.current_health, 40);

        assert_eq!(c.take_damage(15), 15);
        assert_eq!(c.current_health, 25);

        assert_eq!(c.take_damage(100), 25);
        assert_eq!(c.current_health, 0);
        assert!(!c.is_alive());

        assert_eq!(c.heal(100), 40);
        assert_eq!(c.current_health, 40);
    }

    #[test]
    fn test_negative_amounts_are_ignored() {
        let mut c = sample().with_health(20);
        assert_eq!(c.take_damage(-5), 0);
        assert_eq!(c.heal(-5), 0);
        assert_eq!(c.current_health, 20);
    }

    #[test]
    fn test_missing_stats_diagnostics() {
        let mut c = sample();
        c.stats = None;
        c.battle_stats = None;

        assert!(matches!(c.require_stats(), Err(CombatError::MissingStats { .. })));
        assert!(matches!(
            c.require_battle_stats(),
            Err(CombatError::MissingBattleStats { .. })
        ));
        assert_eq!(c.max_health(), 0);
    }

    #[test]
    fn test_specialties() {
        let c = sample()
            .with_specialty(Attribute::Energy)
            .with_specialty(Attribute::Energy);
        assert!(c.is_specialist(Attribute::Energy));
        assert!(!c.is_specialist(Attribute::Magic));
        assert_eq!(c.specialties.len(), 1);
    }

    #[test]
    fn test_rarity_tables() {
        assert_eq!(Rarity::Legendary.effect_scale(), 1.2);
        assert_eq!(Rarity::Epic.energy_factor(), 1.2);
        assert_eq!(Rarity::Rare.value(), 2);
        assert!(Rarity::Legendary > Rarity::Epic);
    }
}
