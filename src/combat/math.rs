//! Combat math: damage, multipliers, and field synergies.
//!
//! [`CombatMath`] is the seam between the battle core and a game's balance
//! formulas. [`StandardCombatMath`] is the stock implementation.
//!
//! ## Damage pipeline (standard)
//!
//! 1. Dodge roll against the defender's `dodgeChance`. A dodge ends here.
//! 2. `attack × 100 / (100 + defense)` with the stats matching the attack kind
//! 3. × combo multiplier × elemental effectiveness
//! 4. Crushing (attack ≥ 2× defense, ×1.1) or glancing (defense ≥ 2× attack, ×0.8)
//! 5. Critical roll against the attacker's `criticalChance` (×1.5)
//! 6. × (1 − stance damage reduction), rounded, at least 1

use serde::{Deserialize, Serialize};

use crate::core::RandomSource;
use crate::creature::{
    form_multiplier, Attribute, BattleStats, Creature, Element, Rarity, Stat, StatMods,
};

/// Which attack/defense pair an attack uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackKind {
    #[default]
    Physical,
    Magical,
}

impl AttackKind {
    #[must_use]
    pub const fn attack_stat(self) -> Stat {
        match self {
            AttackKind::Physical => Stat::PhysicalAttack,
            AttackKind::Magical => Stat::MagicalAttack,
        }
    }

    #[must_use]
    pub const fn defense_stat(self) -> Stat {
        match self {
            AttackKind::Physical => Stat::PhysicalDefense,
            AttackKind::Magical => Stat::MagicalDefense,
        }
    }

    /// The kind backed by the higher attack stat, physical on ties.
    #[must_use]
    pub fn best_for(stats: &BattleStats) -> Self {
        if stats.physical_attack >= stats.magical_attack {
            AttackKind::Physical
        } else {
            AttackKind::Magical
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AttackKind::Physical => "physical",
            AttackKind::Magical => "magical",
        }
    }
}

impl std::fmt::Display for AttackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Elemental matchup outcome.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effectiveness {
    NotVeryEffective,
    #[default]
    Normal,
    Effective,
    VeryEffective,
}

impl Effectiveness {
    /// Matchup of an attacking element against a defending one.
    ///
    /// Water > Fire > Earth > Air > Water. Light and Dark are very effective
    /// against each other. Neutral is always normal.
    #[must_use]
    pub fn of(attacker: Element, defender: Element) -> Self {
        use Element::*;
        match (attacker, defender) {
            (Light, Dark) | (Dark, Light) => Effectiveness::VeryEffective,
            (Water, Fire) | (Fire, Earth) | (Earth, Air) | (Air, Water) => Effectiveness::Effective,
            (Fire, Water) | (Earth, Fire) | (Air, Earth) | (Water, Air) => {
                Effectiveness::NotVeryEffective
            }
            _ => Effectiveness::Normal,
        }
    }

    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Effectiveness::NotVeryEffective => 0.75,
            Effectiveness::Normal => 1.0,
            Effectiveness::Effective => 1.25,
            Effectiveness::VeryEffective => 1.5,
        }
    }

    #[must_use]
    pub const fn is_super_effective(self) -> bool {
        matches!(self, Effectiveness::Effective | Effectiveness::VeryEffective)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Effectiveness::NotVeryEffective => "not very effective",
            Effectiveness::Normal => "normal",
            Effectiveness::Effective => "effective",
            Effectiveness::VeryEffective => "very effective",
        }
    }
}

/// How an attack landed relative to the defense it hit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageType {
    #[default]
    Normal,
    Crushing,
    Glancing,
}

impl DamageType {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            DamageType::Normal => "normal",
            DamageType::Crushing => "crushing",
            DamageType::Glancing => "glancing",
        }
    }
}

/// Raw outcome of one damage computation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageResult {
    pub damage: i32,
    pub is_dodged: bool,
    pub is_critical: bool,
    pub effectiveness: Effectiveness,
    pub damage_type: DamageType,
}

impl DamageResult {
    #[must_use]
    pub fn dodged() -> Self {
        Self {
            is_dodged: true,
            ..Self::default()
        }
    }
}

/// A roster-wide composition bonus.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Synergy {
    /// Several creatures of one species.
    Species { species: String, count: usize, bonus: f64 },
    /// A Legendary inspires the rest of the roster.
    LegendaryPresence { bonus: f64 },
    /// Several creatures share a specialty.
    StatSynergy { attribute: Attribute, bonus: f64 },
    /// A highly evolved creature shields the roster.
    FormProtection { bonus: f64 },
    /// Physical and magical attackers together.
    BalancedTeam { bonus: f64 },
    /// The roster is at full strength.
    FullField { bonus: f64 },
}

impl Synergy {
    #[must_use]
    pub fn bonus(&self) -> f64 {
        match self {
            Synergy::Species { bonus, .. }
            | Synergy::LegendaryPresence { bonus }
            | Synergy::StatSynergy { bonus, .. }
            | Synergy::FormProtection { bonus }
            | Synergy::BalancedTeam { bonus }
            | Synergy::FullField { bonus } => *bonus,
        }
    }

    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Synergy::Species { species, count, .. } => format!("{species} Synergy x{count}"),
            Synergy::LegendaryPresence { .. } => "Legendary Presence".to_string(),
            Synergy::StatSynergy { attribute, .. } => format!("{attribute:?} Synergy"),
            Synergy::FormProtection { .. } => "Guardian Presence".to_string(),
            Synergy::BalancedTeam { .. } => "Balanced Formation".to_string(),
            Synergy::FullField { .. } => "Full Force".to_string(),
        }
    }

    /// Whether this synergy boosts the given creature.
    #[must_use]
    pub fn applies_to(&self, creature: &Creature) -> bool {
        match self {
            Synergy::Species { species, .. } => creature.species_name == *species,
            Synergy::LegendaryPresence { .. } => creature.rarity != Rarity::Legendary,
            Synergy::StatSynergy { attribute, .. } => creature.is_specialist(*attribute),
            Synergy::FormProtection { .. }
            | Synergy::BalancedTeam { .. }
            | Synergy::FullField { .. } => true,
        }
    }

    /// Stats this synergy scales.
    #[must_use]
    pub fn stats(&self) -> &'static [Stat] {
        const COMBAT: &[Stat] = &[
            Stat::PhysicalAttack,
            Stat::MagicalAttack,
            Stat::PhysicalDefense,
            Stat::MagicalDefense,
        ];
        const DEFENSE: &[Stat] = &[Stat::PhysicalDefense, Stat::MagicalDefense];
        match self {
            Synergy::FormProtection { .. } => DEFENSE,
            _ => COMBAT,
        }
    }
}

/// Damage and multiplier formulas.
pub trait CombatMath {
    /// Resolve one attack's raw damage. Consumes rolls from `rng`.
    fn resolve_damage(
        &self,
        attacker: &Creature,
        defender: &Creature,
        kind: AttackKind,
        combo_multiplier: f64,
        rng: &mut dyn RandomSource,
    ) -> DamageResult;

    fn combo_multiplier(&self, combo_level: u32) -> f64;

    fn rarity_multiplier(&self, rarity: Rarity) -> f64;

    fn form_multiplier(&self, form: u32) -> f64;

    /// Composition bonuses active for a roster.
    fn detect_synergies(&self, roster: &[Creature]) -> Vec<Synergy>;

    /// Stat deltas a creature receives from the given synergies.
    fn synergy_bonus(&self, creature: &Creature, synergies: &[Synergy]) -> StatMods;
}

/// Stock combat formulas.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardCombatMath;

impl StandardCombatMath {
    const CRITICAL_MULTIPLIER: f64 = 1.5;
    const MAX_COMBO: f64 = 1.5;
}

impl CombatMath for StandardCombatMath {
    fn resolve_damage(
        &self,
        attacker: &Creature,
        defender: &Creature,
        kind: AttackKind,
        combo_multiplier: f64,
        rng: &mut dyn RandomSource,
    ) -> DamageResult {
        let atk = attacker.battle_stats.unwrap_or_default();
        let def = defender.battle_stats.unwrap_or_default();

        if rng.roll_percent() < f64::from(def.dodge_chance) {
            return DamageResult::dodged();
        }

        let attack = f64::from(atk.get(kind.attack_stat()).max(1));
        let defense = f64::from(def.get(kind.defense_stat()).max(0));
        let effectiveness = Effectiveness::of(attacker.element, defender.element);

        let mut damage =
            attack * 100.0 / (100.0 + defense) * combo_multiplier * effectiveness.multiplier();

        let damage_type = if attack >= defense * 2.0 {
            damage *= 1.1;
            DamageType::Crushing
        } else if defense >= attack * 2.0 {
            damage *= 0.8;
            DamageType::Glancing
        } else {
            DamageType::Normal
        };

        let is_critical = rng.roll_percent() < f64::from(atk.critical_chance);
        if is_critical {
            damage *= Self::CRITICAL_MULTIPLIER;
        }

        damage *= 1.0 - defender.stance_damage_reduction();

        DamageResult {
            damage: (damage.round() as i32).max(1),
            is_dodged: false,
            is_critical,
            effectiveness,
            damage_type,
        }
    }

    fn combo_multiplier(&self, combo_level: u32) -> f64 {
        if combo_level <= 1 {
            return 1.0;
        }
        (1.0 + f64::from(combo_level - 1) * 0.1).min(Self::MAX_COMBO)
    }

    fn rarity_multiplier(&self, rarity: Rarity) -> f64 {
        rarity.stat_multiplier()
    }

    fn form_multiplier(&self, form: u32) -> f64 {
        form_multiplier(form)
    }

    fn detect_synergies(&self, roster: &[Creature]) -> Vec<Synergy> {
        let mut synergies = Vec::new();
        let alive: Vec<&Creature> = roster.iter().filter(|c| c.is_alive()).collect();
        if alive.len() < 2 {
            return synergies;
        }

        let mut species: Vec<(&str, usize)> = Vec::new();
        for c in &alive {
            match species.iter_mut().find(|(name, _)| *name == c.species_name) {
                Some(entry) => entry.1 += 1,
                None => species.push((c.species_name.as_str(), 1)),
            }
        }
        for (name, count) in species.into_iter().filter(|(_, n)| *n >= 2) {
            synergies.push(Synergy::Species {
                species: name.to_string(),
                count,
                bonus: (0.05 * (count - 1) as f64).min(0.15),
            });
        }

        if alive.iter().any(|c| c.rarity == Rarity::Legendary) {
            synergies.push(Synergy::LegendaryPresence { bonus: 0.1 });
        }

        for attribute in [
            Attribute::Strength,
            Attribute::Magic,
            Attribute::Speed,
            Attribute::Stamina,
            Attribute::Energy,
        ] {
            if alive.iter().filter(|c| c.is_specialist(attribute)).count() >= 2 {
                synergies.push(Synergy::StatSynergy { attribute, bonus: 0.05 });
            }
        }

        if alive.iter().any(|c| c.form >= 3) {
            synergies.push(Synergy::FormProtection { bonus: 0.1 });
        }

        let kinds = alive
            .iter()
            .filter_map(|c| c.battle_stats.as_ref().map(AttackKind::best_for));
        let (mut physical, mut magical) = (false, false);
        for kind in kinds {
            match kind {
                AttackKind::Physical => physical = true,
                AttackKind::Magical => magical = true,
            }
        }
        if alive.len() >= 3 && physical && magical {
            synergies.push(Synergy::BalancedTeam { bonus: 0.05 });
        }

        if alive.len() >= 5 {
            synergies.push(Synergy::FullField { bonus: 0.05 });
        }

        synergies
    }

    fn synergy_bonus(&self, creature: &Creature, synergies: &[Synergy]) -> StatMods {
        let mut mods = StatMods::new();
        let Some(stats) = creature.battle_stats else {
            return mods;
        };
        for synergy in synergies.iter().filter(|s| s.applies_to(creature)) {
            for &stat in synergy.stats() {
                let delta = (f64::from(stats.get(stat)) * synergy.bonus()).round() as i32;
                if delta != 0 {
                    mods.add(stat, delta);
                }
            }
        }
        mods
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CreatureId, FixedRolls};
    use crate::creature::BaseStats;

    fn fighter(id: u32, species: &str, stats: BattleStats) -> Creature {
        Creature::new(CreatureId(id), species, Rarity::Common, BaseStats::default())
            .with_battle_stats(stats)
    }

    fn stats(attack: i32, defense: i32) -> BattleStats {
        BattleStats {
            physical_attack: attack,
            magical_attack: attack / 2,
            physical_defense: defense,
            magical_defense: defense,
            max_health: 100,
            initiative: 10,
            critical_chance: 10,
            dodge_chance: 10,
            energy_cost: 3,
        }
    }

    #[test]
    fn test_effectiveness_wheel() {
        assert_eq!(Effectiveness::of(Element::Water, Element::Fire), Effectiveness::Effective);
        assert_eq!(
            Effectiveness::of(Element::Fire, Element::Water),
            Effectiveness::NotVeryEffective
        );
        assert_eq!(Effectiveness::of(Element::Dark, Element::Light), Effectiveness::VeryEffective);
        assert_eq!(Effectiveness::of(Element::Neutral, Element::Fire), Effectiveness::Normal);
        assert!(Effectiveness::VeryEffective.is_super_effective());
    }

    #[test]
    fn test_damage_formula() {
        let a = fighter(1, "A", stats(50, 50));
        let d = fighter(2, "B", stats(50, 50));
        // First roll: no dodge. Second roll: no crit.
        let mut rolls = FixedRolls::new([0.5, 0.5]);
        let result =
            StandardCombatMath.resolve_damage(&a, &d, AttackKind::Physical, 1.0, &mut rolls);
        assert!(!result.is_dodged);
        assert!(!result.is_critical);
        // 50 * 100 / 150
        assert_eq!(result.damage, 33);
        assert_eq!(result.damage_type, DamageType::Normal);
    }

    #[test]
    fn test_dodge_and_critical() {
        let a = fighter(1, "A", stats(50, 50));
        let d = fighter(2, "B", stats(50, 50));

        let mut rolls = FixedRolls::constant(0.01);
        let dodged =
            StandardCombatMath.resolve_damage(&a, &d, AttackKind::Physical, 1.0, &mut rolls);
        assert!(dodged.is_dodged);
        assert_eq!(dodged.damage, 0);

        let mut rolls = FixedRolls::new([0.5, 0.0]);
        let crit = StandardCombatMath.resolve_damage(&a, &d, AttackKind::Physical, 1.0, &mut rolls);
        assert!(crit.is_critical);
        assert_eq!(crit.damage, 50);
    }

    #[test]
    fn test_minimum_damage_and_glancing() {
        let a = fighter(1, "A", stats(1, 500));
        let d = fighter(2, "B", stats(1, 500));
        let mut rolls = FixedRolls::constant(0.99);
        let result =
            StandardCombatMath.resolve_damage(&a, &d, AttackKind::Physical, 1.0, &mut rolls);
        assert_eq!(result.damage, 1);
        assert_eq!(result.damage_type, DamageType::Glancing);
    }

    #[test]
    fn test_combo_multiplier() {
        assert_eq!(StandardCombatMath.combo_multiplier(0), 1.0);
        assert_eq!(StandardCombatMath.combo_multiplier(1), 1.0);
        assert!((StandardCombatMath.combo_multiplier(3) - 1.2).abs() < 1e-9);
        assert_eq!(StandardCombatMath.combo_multiplier(20), 1.5);
    }

    #[test]
    fn test_detect_synergies() {
        let mut roster = vec![
            fighter(1, "Emberfox", stats(40, 20)),
            fighter(2, "Emberfox", stats(40, 20)),
            fighter(3, "Tidecat", BattleStats { magical_attack: 60, ..stats(20, 20) }),
        ];
        roster[2].rarity = Rarity::Legendary;

        let synergies = StandardCombatMath.detect_synergies(&roster);
        assert!(synergies
            .iter()
            .any(|s| matches!(s, Synergy::Species { count: 2, .. })));
        assert!(synergies.contains(&Synergy::LegendaryPresence { bonus: 0.1 }));
        assert!(synergies.contains(&Synergy::BalancedTeam { bonus: 0.05 }));
        assert!(!synergies.iter().any(|s| matches!(s, Synergy::FullField { .. })));
    }

    #[test]
    fn test_synergy_bonus_targets() {
        let fox = fighter(1, "Emberfox", stats(40, 20));
        let synergies = vec![
            Synergy::Species {
                species: "Emberfox".to_string(),
                count: 2,
                bonus: 0.05,
            },
            Synergy::FormProtection { bonus: 0.1 },
        ];
        let mods = StandardCombatMath.synergy_bonus(&fox, &synergies);
        assert_eq!(mods.get(Stat::PhysicalAttack), 2);
        // 20 * 0.05 + 20 * 0.1
        assert_eq!(mods.get(Stat::PhysicalDefense), 3);

        let other = fighter(2, "Tidecat", stats(40, 20));
        let mods = StandardCombatMath.synergy_bonus(&other, &synergies);
        assert_eq!(mods.get(Stat::PhysicalAttack), 0);
        assert_eq!(mods.get(Stat::PhysicalDefense), 2);
    }
}
