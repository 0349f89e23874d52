//! Stat types: raw attributes, derived battle stats, and stat deltas.
//!
//! ## Stat families
//!
//! Derived stats fall into families that share a floor after effects:
//! - Attack/defense (`PhysicalAttack`, `MagicalAttack`, `PhysicalDefense`,
//!   `MagicalDefense`): never below 1
//! - `MaxHealth`: never below 10
//! - Initiative and chances (`Initiative`, `CriticalChance`, `DodgeChance`):
//!   never below 0
//! - `EnergyCost`: never below 0
//!
//! Chances are percentages and costs are resource amounts; neither is scaled
//! by combination bonuses.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A derived battle stat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stat {
    PhysicalAttack,
    MagicalAttack,
    PhysicalDefense,
    MagicalDefense,
    MaxHealth,
    Initiative,
    CriticalChance,
    DodgeChance,
    EnergyCost,
}

impl Stat {
    pub const ALL: [Stat; 9] = [
        Stat::PhysicalAttack,
        Stat::MagicalAttack,
        Stat::PhysicalDefense,
        Stat::MagicalDefense,
        Stat::MaxHealth,
        Stat::Initiative,
        Stat::CriticalChance,
        Stat::DodgeChance,
        Stat::EnergyCost,
    ];

    /// Lowest value this stat may take once effects are applied.
    #[must_use]
    pub const fn floor(self) -> i32 {
        match self {
            Stat::PhysicalAttack
            | Stat::MagicalAttack
            | Stat::PhysicalDefense
            | Stat::MagicalDefense => 1,
            Stat::MaxHealth => 10,
            Stat::Initiative | Stat::CriticalChance | Stat::DodgeChance | Stat::EnergyCost => 0,
        }
    }

    /// True for percentage stats (critical and dodge chance).
    #[must_use]
    pub const fn is_percentage(self) -> bool {
        matches!(self, Stat::CriticalChance | Stat::DodgeChance)
    }

    /// True for resource costs.
    #[must_use]
    pub const fn is_cost(self) -> bool {
        matches!(self, Stat::EnergyCost)
    }
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stat::PhysicalAttack => "physicalAttack",
            Stat::MagicalAttack => "magicalAttack",
            Stat::PhysicalDefense => "physicalDefense",
            Stat::MagicalDefense => "magicalDefense",
            Stat::MaxHealth => "maxHealth",
            Stat::Initiative => "initiative",
            Stat::CriticalChance => "criticalChance",
            Stat::DodgeChance => "dodgeChance",
            Stat::EnergyCost => "energyCost",
        };
        f.write_str(name)
    }
}

/// Signed per-stat deltas, in insertion order.
///
/// Most effects touch one to four stats, so entries live inline.
/// Adding to a stat that is already present accumulates into that entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatMods(SmallVec<[(Stat, i32); 4]>);

impl StatMods {
    /// Empty modification set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style add.
    #[must_use]
    pub fn with(mut self, stat: Stat, delta: i32) -> Self {
        self.add(stat, delta);
        self
    }

    /// Accumulate a delta.
    pub fn add(&mut self, stat: Stat, delta: i32) {
        if let Some(entry) = self.0.iter_mut().find(|(s, _)| *s == stat) {
            entry.1 += delta;
        } else {
            self.0.push((stat, delta));
        }
    }

    /// Accumulate every entry of another set.
    pub fn merge(&mut self, other: &StatMods) {
        for &(stat, delta) in other.iter() {
            self.add(stat, delta);
        }
    }

    /// Delta for a stat (0 when absent).
    #[must_use]
    pub fn get(&self, stat: Stat) -> i32 {
        self.0
            .iter()
            .find(|(s, _)| *s == stat)
            .map(|&(_, d)| d)
            .unwrap_or(0)
    }

    /// Iterate entries.
    pub fn iter(&self) -> impl Iterator<Item = &(Stat, i32)> {
        self.0.iter()
    }

    /// Transform every delta.
    #[must_use]
    pub fn map(&self, mut f: impl FnMut(Stat, i32) -> i32) -> StatMods {
        Self(self.0.iter().map(|&(s, d)| (s, f(s, d))).collect())
    }

    /// Multiply every delta, rounding to nearest.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> StatMods {
        self.map(|_, d| (f64::from(d) * factor).round() as i32)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<(Stat, i32)> for StatMods {
    fn from_iter<I: IntoIterator<Item = (Stat, i32)>>(iter: I) -> Self {
        let mut mods = StatMods::new();
        for (stat, delta) in iter {
            mods.add(stat, delta);
        }
        mods
    }
}

/// Raw creature attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Attribute {
    #[default]
    Strength,
    Magic,
    Speed,
    Stamina,
    Energy,
}

/// Raw attribute values, before any battle derivation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub strength: i32,
    pub magic: i32,
    pub speed: i32,
    pub stamina: i32,
    pub energy: i32,
}

impl BaseStats {
    #[must_use]
    pub const fn new(strength: i32, magic: i32, speed: i32, stamina: i32, energy: i32) -> Self {
        Self {
            strength,
            magic,
            speed,
            stamina,
            energy,
        }
    }

    #[must_use]
    pub const fn get(&self, attribute: Attribute) -> i32 {
        match attribute {
            Attribute::Strength => self.strength,
            Attribute::Magic => self.magic,
            Attribute::Speed => self.speed,
            Attribute::Stamina => self.stamina,
            Attribute::Energy => self.energy,
        }
    }
}

/// Derived battle stats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleStats {
    pub physical_attack: i32,
    pub magical_attack: i32,
    pub physical_defense: i32,
    pub magical_defense: i32,
    pub max_health: i32,
    pub initiative: i32,
    pub critical_chance: i32,
    pub dodge_chance: i32,
    pub energy_cost: i32,
}

impl BattleStats {
    #[must_use]
    pub const fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::PhysicalAttack => self.physical_attack,
            Stat::MagicalAttack => self.magical_attack,
            Stat::PhysicalDefense => self.physical_defense,
            Stat::MagicalDefense => self.magical_defense,
            Stat::MaxHealth => self.max_health,
            Stat::Initiative => self.initiative,
            Stat::CriticalChance => self.critical_chance,
            Stat::DodgeChance => self.dodge_chance,
            Stat::EnergyCost => self.energy_cost,
        }
    }

    pub fn set(&mut self, stat: Stat, value: i32) {
        let slot = match stat {
            Stat::PhysicalAttack => &mut self.physical_attack,
            Stat::MagicalAttack => &mut self.magical_attack,
            Stat::PhysicalDefense => &mut self.physical_defense,
            Stat::MagicalDefense => &mut self.magical_defense,
            Stat::MaxHealth => &mut self.max_health,
            Stat::Initiative => &mut self.initiative,
            Stat::CriticalChance => &mut self.critical_chance,
            Stat::DodgeChance => &mut self.dodge_chance,
            Stat::EnergyCost => &mut self.energy_cost,
        };
        *slot = value;
    }

    /// Add a delta and clamp to the stat's floor.
    pub fn add_clamped(&mut self, stat: Stat, delta: i32) {
        let value = (self.get(stat) + delta).max(stat.floor());
        self.set(stat, value);
    }

    /// Add a delta with no clamping.
    pub fn add_raw(&mut self, stat: Stat, delta: i32) {
        self.set(stat, self.get(stat) + delta);
    }

    /// The higher of the two attack stats.
    #[must_use]
    pub fn best_attack(&self) -> i32 {
        self.physical_attack.max(self.magical_attack)
    }

    /// The higher of the two defense stats.
    #[must_use]
    pub fn best_defense(&self) -> i32 {
        self.physical_defense.max(self.magical_defense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_floors() {
        assert_eq!(Stat::PhysicalAttack.floor(), 1);
        assert_eq!(Stat::MagicalDefense.floor(), 1);
        assert_eq!(Stat::MaxHealth.floor(), 10);
        assert_eq!(Stat::Initiative.floor(), 0);
        assert_eq!(Stat::DodgeChance.floor(), 0);
    }

    #[test]
    fn test_stat_mods_accumulate() {
        let mut mods = StatMods::new()
            .with(Stat::PhysicalAttack, 3)
            .with(Stat::MagicalAttack, 2);
        mods.add(Stat::PhysicalAttack, 4);

        assert_eq!(mods.len(), 2);
        assert_eq!(mods.get(Stat::PhysicalAttack), 7);
        assert_eq!(mods.get(Stat::MagicalAttack), 2);
        assert_eq!(mods.get(Stat::Initiative), 0);
    }

    #[test]
    fn test_stat_mods_scaled() {
        let mods = StatMods::new()
            .with(Stat::PhysicalDefense, 5)
            .with(Stat::Initiative, -3);
        let scaled = mods.scaled(1.5);
        assert_eq!(scaled.get(Stat::PhysicalDefense), 8);
        assert_eq!(scaled.get(Stat::Initiative), -5);
    }

    #[test]
    fn test_add_clamped() {
        let mut stats = BattleStats {
            physical_attack: 5,
            max_health: 30,
            initiative: 2,
            ..BattleStats::default()
        };
        stats.add_clamped(Stat::PhysicalAttack, -10);
        stats.add_clamped(Stat::MaxHealth, -50);
        stats.add_clamped(Stat::Initiative, -5);

        assert_eq!(stats.physical_attack, 1);
        assert_eq!(stats.max_health, 10);
        assert_eq!(stats.initiative, 0);
    }

    #[test]
    fn test_get_set_all() {
        let mut stats = BattleStats::default();
        for (i, stat) in Stat::ALL.iter().enumerate() {
            stats.set(*stat, i as i32 + 1);
        }
        for (i, stat) in Stat::ALL.iter().enumerate() {
            assert_eq!(stats.get(*stat), i as i32 + 1);
        }
    }

    #[test]
    fn test_stat_serialization_names() {
        let json = serde_json::to_string(&Stat::PhysicalAttack).unwrap();
        assert_eq!(json, "\"physicalAttack\"");
        assert_eq!(Stat::DodgeChance.to_string(), "dodgeChance");
    }
}
