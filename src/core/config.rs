//! Battle configuration types.
//!
//! Battles are configured at startup by providing:
//! - `Difficulty`: Selects the per-difficulty constant table
//! - `DifficultyProfile`: Energy, hand size, and scaling constants
//! - `BattleConfig`: RNG seed plus balance tunables
//!
//! Everything here is plain data with serde support, so a game can ship
//! its balance file as JSON and load it with [`BattleConfig::from_json`].

use serde::{Deserialize, Serialize};

use super::error::CombatError;

/// Battle difficulty tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    /// All tiers, easiest first.
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    /// Constant table for this tier.
    #[must_use]
    pub const fn profile(self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                max_energy_base: 10,
                regen_base: 2,
                max_hand_size: 5,
                effect_scale: 1.0,
                defend_damage_reduction: 0.2,
            },
            Difficulty::Medium => DifficultyProfile {
                max_energy_base: 12,
                regen_base: 3,
                max_hand_size: 4,
                effect_scale: 1.0,
                defend_damage_reduction: 0.2,
            },
            Difficulty::Hard => DifficultyProfile {
                max_energy_base: 15,
                regen_base: 4,
                max_hand_size: 3,
                effect_scale: 1.15,
                defend_damage_reduction: 0.4,
            },
            Difficulty::Expert => DifficultyProfile {
                max_energy_base: 18,
                regen_base: 5,
                max_hand_size: 3,
                effect_scale: 1.25,
                defend_damage_reduction: 0.4,
            },
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = CombatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "expert" => Ok(Difficulty::Expert),
            other => Err(CombatError::UnknownDifficulty(other.to_string())),
        }
    }
}

/// Per-difficulty constants.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Energy pool ceiling before the roster-size bonus.
    pub max_energy_base: i32,
    /// Flat energy regenerated each turn before creature contributions.
    pub regen_base: i32,
    /// Hand size at which the draw phase stops drawing.
    pub max_hand_size: usize,
    /// Multiplier on per-turn effect health deltas.
    pub effect_scale: f64,
    /// Damage-reduction fraction carried by a defensive stance.
    pub defend_damage_reduction: f64,
}

/// Balance tunables and seed for one battle.
///
/// Defaults reproduce the shipped balance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Seed for the battle's RNG.
    pub seed: u64,
    /// Per-level stat multiplier step for combined creatures.
    pub combination_step: f64,
    /// Cap on the magnitude of a single tool stat delta, before power scaling.
    pub tool_stat_cap: i32,
    /// Cap on the power multiplier applied to tool stat deltas.
    pub tool_power_cap: f64,
    /// Cap on instantaneous tool healing.
    pub tool_heal_cap: i32,
    /// Flat critical chance (percent) for instant spells.
    pub spell_crit_base: i32,
    /// Critical chance gained per point of caster magic.
    pub spell_crit_per_magic: f64,
    /// Ceiling on instant-spell critical chance (percent).
    pub spell_crit_cap: i32,
    /// Damage multiplier on a spell critical.
    pub spell_crit_multiplier: f64,
    /// Magical defense divisor for spell resistance.
    pub resistance_divisor: f64,
    /// Ceiling on spell resistance fraction.
    pub resistance_cap: f64,
    /// Chance that a critical attack leaves a trauma debuff.
    pub critical_debuff_chance: f64,
    /// Chance that a super-effective attack leaves a weakness debuff.
    pub effective_debuff_chance: f64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            combination_step: 0.08,
            tool_stat_cap: 10,
            tool_power_cap: 1.5,
            tool_heal_cap: 50,
            spell_crit_base: 5,
            spell_crit_per_magic: 0.3,
            spell_crit_cap: 20,
            spell_crit_multiplier: 1.5,
            resistance_divisor: 200.0,
            resistance_cap: 0.5,
            critical_debuff_chance: 0.2,
            effective_debuff_chance: 0.25,
        }
    }
}

impl BattleConfig {
    /// Default balance with the given seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Load from JSON. Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, CombatError> {
        serde_json::from_str(json).map_err(|e| CombatError::InvalidConfig(e.to_string()))
    }

    /// Critical chance (percent) of an instant spell cast with `magic`.
    #[must_use]
    pub fn spell_crit_chance(&self, magic: i32) -> i32 {
        let scaled = (f64::from(magic) * self.spell_crit_per_magic).floor() as i32;
        (self.spell_crit_base + scaled).min(self.spell_crit_cap)
    }

    /// Spell resistance fraction granted by `magical_defense`.
    #[must_use]
    pub fn spell_resistance(&self, magical_defense: i32) -> f64 {
        (f64::from(magical_defense) / self.resistance_divisor).clamp(0.0, self.resistance_cap)
    }
}
