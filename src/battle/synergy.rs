//! Field synergies as short-lived blessings.

use im::Vector;
use tracing::debug;

use crate::combat::{CombatMath, Synergy};
use crate::core::IdGenerator;
use crate::creature::{refresh_stats, Creature, StatDeriver};
use crate::effects::{Effect, EffectKind, EffectOrigin};

/// Name of the effect carrying a creature's synergy bonus.
pub const FIELD_SYNERGY: &str = "Field Synergy";

/// Recompute a roster's synergy bonuses.
///
/// Last turn's synergy effects are dropped and stats re-derived first, so
/// the new bonus is a fraction of the creature's own stats and never
/// compounds. Each creature that qualifies gets one "Field Synergy"
/// blessing lasting a single turn.
pub fn apply_field_synergies(
    roster: &Vector<Creature>,
    math: &dyn CombatMath,
    deriver: &dyn StatDeriver,
    ids: &mut IdGenerator,
    combination_step: f64,
    turn: u32,
) -> (Vector<Creature>, Vec<Synergy>) {
    let mut out = roster.clone();
    for creature in out.iter_mut() {
        let before = creature.active_effects.len();
        creature.active_effects.retain(|e| e.origin != EffectOrigin::Synergy);
        if creature.active_effects.len() != before {
            refresh_stats(creature, deriver, combination_step);
        }
    }

    let snapshot: Vec<Creature> = out.iter().cloned().collect();
    let synergies = math.detect_synergies(&snapshot);
    if synergies.is_empty() {
        return (out, synergies);
    }

    for creature in out.iter_mut() {
        let mods = math.synergy_bonus(creature, &synergies);
        if mods.is_empty() {
            continue;
        }
        debug!(creature = %creature.id, bonuses = mods.len(), "Field synergy");
        let blessing = Effect::new(
            ids.next_effect(),
            FIELD_SYNERGY,
            EffectKind::Blessing,
            EffectOrigin::Synergy,
            1,
            turn,
        )
        .with_stat_modifications(mods);
        creature.active_effects.push(blessing);
        refresh_stats(creature, deriver, combination_step);
    }
    (out, synergies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::StandardCombatMath;
    use crate::core::CreatureId;
    use crate::creature::{BaseStats, Rarity, StandardStatDeriver};

    fn creature(id: u32, species: &str, rarity: Rarity) -> Creature {
        let stats = BaseStats::new(10, 10, 10, 10, 10);
        let mut c = Creature::new(CreatureId(id), species, rarity, stats);
        refresh_stats(&mut c, &StandardStatDeriver, 0.08);
        c.current_health = c.max_health();
        c
    }

    fn apply(roster: &Vector<Creature>) -> (Vector<Creature>, Vec<Synergy>) {
        let mut ids = IdGenerator::new();
        apply_field_synergies(roster, &StandardCombatMath, &StandardStatDeriver, &mut ids, 0.08, 1)
    }

    #[test]
    fn test_species_synergy_blessing() {
        let roster = Vector::from(vec![
            creature(1, "Mossling", Rarity::Common),
            creature(2, "Mossling", Rarity::Common),
        ]);
        let (out, synergies) = apply(&roster);
        assert!(synergies.iter().any(|s| matches!(s, Synergy::Species { count: 2, .. })));
        for c in &out {
            let blessing = c.active_effects.iter().find(|e| e.name == FIELD_SYNERGY).unwrap();
            assert_eq!(blessing.duration, 1);
            assert_eq!(blessing.kind, EffectKind::Blessing);
            // 5% of 30
            assert_eq!(c.battle_stats.unwrap().physical_attack, 32);
        }
        assert!(roster[0].active_effects.is_empty());
    }

    #[test]
    fn test_reapplying_does_not_compound() {
        let roster = Vector::from(vec![
            creature(1, "Mossling", Rarity::Common),
            creature(2, "Mossling", Rarity::Common),
        ]);
        let (once, _) = apply(&roster);
        let (twice, _) = apply(&once);
        assert_eq!(twice[0].battle_stats, once[0].battle_stats);
        assert_eq!(twice[0].active_effects.len(), 1);
    }

    #[test]
    fn test_no_synergy() {
        let roster = Vector::from(vec![creature(1, "Mossling", Rarity::Common)]);
        let (out, synergies) = apply(&roster);
        assert!(synergies.is_empty());
        assert_eq!(out, roster);
    }
}
