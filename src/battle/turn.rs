//! Turn orchestration.
//!
//! `resolve_turn` is the only place the effect lifecycle runs. Within a turn
//! the order is fixed: energy regen, the effect pass over both fields, the
//! defeat sweep, then the draw phase.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{BattleConfig, CombatError, Difficulty, IdGenerator};
use crate::creature::{Attribute, Creature, StatDeriver};
use crate::effects::lifecycle::EffectPass;

use super::defeat::{sweep_defeated, Defeat};
use super::state::{BattleState, Side};

/// Energy cap for a side with `creature_count` creatures on the field.
#[must_use]
pub fn max_energy(creature_count: usize, difficulty: Difficulty) -> i32 {
    difficulty.profile().max_energy_base + (creature_count as f64 * 0.25).floor() as i32
}

/// Energy a roster regenerates at the start of a turn.
///
/// Each creature with attributes adds a tenth of its energy, scaled by
/// rarity and form. Energy specialists add half a point more, attributes
/// or not.
#[must_use]
pub fn energy_regen(roster: &Vector<Creature>, difficulty: Difficulty) -> i32 {
    let mut regen = f64::from(difficulty.profile().regen_base);
    for creature in roster {
        if creature.is_specialist(Attribute::Energy) {
            regen += 0.5;
        }
        let Some(stats) = creature.stats else {
            continue;
        };
        let form_factor = 1.0 + f64::from(creature.form) * 0.05;
        regen += f64::from(stats.energy) * 0.1 * creature.rarity.energy_factor() * form_factor;
    }
    regen.round() as i32
}

/// Hand size at which the draw phase stops drawing.
#[must_use]
pub fn max_hand_size(difficulty: Difficulty) -> usize {
    difficulty.profile().max_hand_size
}

/// What happened during one upkeep.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnReport {
    /// Turn index after the advance.
    pub turn: u32,
    pub player_regen: i32,
    pub enemy_regen: i32,
    pub defeated: Vec<Defeat>,
    /// Sides that drew a card.
    pub drawn: Vec<Side>,
    /// Effects removed by the lifecycle pass.
    pub expired: usize,
    /// Creatures the lifecycle pass skipped.
    pub warnings: Vec<CombatError>,
}

/// Advance `state` by one turn.
///
/// The input is left untouched; the new state shares structure with it.
pub fn resolve_turn(
    state: &BattleState,
    difficulty: Difficulty,
    deriver: &dyn StatDeriver,
    ids: &mut IdGenerator,
    config: &BattleConfig,
) -> (BattleState, TurnReport) {
    let mut next = state.clone();
    next.turn += 1;
    let turn = next.turn;
    let mut report = TurnReport {
        turn,
        ..TurnReport::default()
    };

    for side in Side::BOTH {
        let pool = next.side_mut(side);
        let regen = energy_regen(&pool.field, difficulty);
        let cap = max_energy(pool.field.len(), difficulty);
        pool.energy = (pool.energy + regen).min(cap);
        debug!(%side, regen, cap, energy = pool.energy, "Energy regenerated");
        match side {
            Side::Player => report.player_regen = regen,
            Side::Enemy => report.enemy_regen = regen,
        }
    }

    let pass = EffectPass {
        deriver,
        ids: &mut *ids,
        combination_step: config.combination_step,
        effect_scale: difficulty.profile().effect_scale,
    }
    .run(&mut [&mut next.player.field, &mut next.enemy.field], turn);
    report.expired = pass.expired;
    report.warnings = pass.warnings;

    report.defeated = sweep_defeated(&mut next, deriver, ids, config.combination_step);

    let hand_cap = max_hand_size(difficulty);
    for side in Side::BOTH {
        if next.side_mut(side).draw(hand_cap) {
            report.drawn.push(side);
        }
    }

    info!(
        turn,
        processed = pass.processed,
        expired = report.expired,
        defeated = report.defeated.len(),
        skipped = report.warnings.len(),
        "Turn resolved"
    );
    (next, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::state::{Card, SideState};
    use crate::core::{CreatureId, EffectId};
    use crate::creature::{refresh_stats, BaseStats, Rarity, StandardStatDeriver};
    use crate::effects::{Effect, EffectFamily, EffectKind, EffectOrigin, PerTurn, Tool, ToolType};

    fn creature(id: u32, energy: i32) -> Creature {
        let stats = BaseStats::new(10, 10, 10, 10, energy);
        let mut c = Creature::new(CreatureId(id), "Mossling", Rarity::Common, stats);
        refresh_stats(&mut c, &StandardStatDeriver, 0.08);
        c.current_health = c.max_health();
        c
    }

    fn card() -> Card {
        Card::Tool(Tool::new("Band", EffectFamily::Surge, ToolType::Physical, 2))
    }

    fn turn(state: &BattleState, difficulty: Difficulty) -> (BattleState, TurnReport) {
        let mut ids = IdGenerator::resume(100, 100);
        resolve_turn(state, difficulty, &StandardStatDeriver, &mut ids, &BattleConfig::default())
    }

    #[test]
    fn test_max_energy() {
        assert_eq!(max_energy(0, Difficulty::Easy), 10);
        assert_eq!(max_energy(3, Difficulty::Medium), 12);
        assert_eq!(max_energy(4, Difficulty::Hard), 16);
        assert_eq!(max_energy(9, Difficulty::Expert), 20);
    }

    #[test]
    fn test_energy_regen() {
        let roster = Vector::from(vec![creature(1, 10), creature(2, 20)]);
        // 3 + 1.0 + 2.0
        assert_eq!(energy_regen(&roster, Difficulty::Medium), 6);

        let mut legend = creature(3, 10).with_form(2).with_specialty(Attribute::Energy);
        legend.rarity = Rarity::Legendary;
        // 5 + 10 * 0.1 * 1.3 * 1.1 + 0.5 = 6.93
        assert_eq!(energy_regen(&Vector::from(vec![legend]), Difficulty::Expert), 7);

        let mut blank = creature(4, 50);
        blank.stats = None;
        assert_eq!(energy_regen(&Vector::from(vec![blank]), Difficulty::Easy), 2);
    }

    #[test]
    fn test_specialist_regen_without_attributes() {
        let blank_specialist = |id| {
            let mut c = creature(id, 50).with_specialty(Attribute::Energy);
            c.stats = None;
            c
        };
        let roster = Vector::from(vec![blank_specialist(1), blank_specialist(2)]);
        // 2 + 0.5 + 0.5
        assert_eq!(energy_regen(&roster, Difficulty::Easy), 3);
    }

    #[test]
    fn test_max_hand_size() {
        assert_eq!(max_hand_size(Difficulty::Easy), 5);
        assert_eq!(max_hand_size(Difficulty::Medium), 4);
        assert_eq!(max_hand_size(Difficulty::Expert), 3);
    }

    #[test]
    fn test_turn_advances_and_caps_energy() {
        let state = BattleState::new(
            SideState::new().with_field([creature(1, 10)]).with_energy(11),
            SideState::new().with_field([creature(2, 10)]).with_energy(0),
        );
        let (next, report) = turn(&state, Difficulty::Medium);
        assert_eq!(state.turn, 0);
        assert_eq!(next.turn, 1);
        assert_eq!(report.turn, 1);
        assert_eq!(report.player_regen, 4);
        assert_eq!(next.player.energy, 12);
        assert_eq!(next.enemy.energy, 4);
        assert_eq!(next.player.field[0].last_effect_pass, Some(1));
    }

    #[test]
    fn test_effect_kills_then_sweep_removes() {
        let mut doomed = creature(2, 10).with_health(5);
        doomed.active_effects.push(
            Effect::new(EffectId(1), "Burn", EffectKind::Standard, EffectOrigin::Spell, 3, 0)
                .with_per_turn(PerTurn::damage(10)),
        );
        let state = BattleState::new(
            SideState::new().with_field([creature(1, 10)]),
            SideState::new().with_field([doomed, creature(3, 10)]),
        );
        let (next, report) = turn(&state, Difficulty::Medium);
        assert_eq!(next.enemy.field.len(), 1);
        assert_eq!(next.enemy.field[0].id, CreatureId(3));
        assert_eq!(report.defeated.len(), 1);
        assert_eq!(report.defeated[0].creature, CreatureId(2));
        assert_eq!(report.defeated[0].side, Side::Enemy);
    }

    #[test]
    fn test_draw_phase() {
        let state = BattleState::new(
            SideState::new().with_hand([card(), card(), card()]).with_deck([card()]),
            SideState::new().with_hand([card(), card(), card()]).with_deck([card()]),
        );
        let (next, report) = turn(&state, Difficulty::Hard);
        assert!(report.drawn.is_empty());
        assert_eq!(next.player.deck.len(), 1);

        let (next, report) = turn(&state, Difficulty::Medium);
        assert_eq!(report.drawn, vec![Side::Player, Side::Enemy]);
        assert_eq!(next.player.hand.len(), 4);
        assert!(next.player.deck.is_empty());
    }

    #[test]
    fn test_malformed_creature_is_reported_and_kept() {
        let mut broken = creature(2, 10);
        broken.battle_stats = None;
        let state = BattleState::new(
            SideState::new().with_field([creature(1, 10), broken]),
            SideState::new(),
        );
        let (next, report) = turn(&state, Difficulty::Medium);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(next.player.field.len(), 2);
        assert!(report.defeated.is_empty());
    }
}
