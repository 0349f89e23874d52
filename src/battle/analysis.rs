//! Read-only battle heuristics for AI players and the UI.

use serde::{Deserialize, Serialize};

use crate::core::EffectId;
use crate::creature::Creature;
use crate::effects::EffectKind;

/// Bonus regen earned from accumulated energy momentum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyMomentum {
    pub momentum: u32,
    /// One extra energy per full 10 momentum.
    pub bonus_regen: u32,
    /// Momentum still needed for the next bonus point.
    pub next_threshold: u32,
}

impl EnergyMomentum {
    #[must_use]
    pub const fn from_momentum(momentum: u32) -> Self {
        Self {
            momentum,
            bonus_regen: momentum / 10,
            next_threshold: 10 - momentum % 10,
        }
    }
}

/// Action whose energy efficiency is being rated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Attack,
    Defend,
    Deploy,
    Other,
}

/// Overall strength score, 0 for a creature with no battle stats.
#[must_use]
pub fn creature_power(creature: &Creature) -> i32 {
    let Some(stats) = creature.battle_stats else {
        return 0;
    };
    let utility = stats.initiative + stats.critical_chance + stats.dodge_chance;
    let power = f64::from(stats.best_attack()) * 2.0
        + f64::from(stats.best_defense())
        + f64::from(stats.max_health) * 0.1
        + f64::from(utility) * 0.5
        + f64::from(creature.form) * 5.0
        + f64::from(creature.rarity.value()) * 10.0;
    power.round() as i32
}

/// Value gained per point of energy spent, to one decimal place.
#[must_use]
pub fn energy_efficiency(action: ActionKind, creature: &Creature, energy_cost: i32) -> f64 {
    if energy_cost <= 0 {
        return 0.0;
    }
    let stats = creature.battle_stats.unwrap_or_default();
    let value = match action {
        ActionKind::Attack => f64::from(stats.best_attack()),
        ActionKind::Defend => f64::from(stats.best_defense()) * 2.0,
        ActionKind::Deploy => f64::from(creature_power(creature)) / 10.0,
        ActionKind::Other => 10.0,
    };
    (value / f64::from(energy_cost) * 10.0).round() / 10.0
}

/// How far along one Charge effect is.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChargeProgress {
    pub effect: EffectId,
    /// 0 to 100.
    pub percent: f64,
    pub turns_remaining: u32,
    pub is_ready: bool,
}

/// Progress of every Charge effect on `creature` as of `current_turn`.
#[must_use]
pub fn charge_progress(creature: &Creature, current_turn: u32) -> Vec<ChargeProgress> {
    creature
        .active_effects
        .iter()
        .filter_map(|effect| {
            let EffectKind::Charge(params) = &effect.kind else {
                return None;
            };
            let elapsed = effect.turns_elapsed(current_turn);
            let max_turns = params.max_turns.max(1);
            let percent = (f64::from(elapsed) / f64::from(max_turns)).min(1.0) * 100.0;
            Some(ChargeProgress {
                effect: effect.id,
                percent,
                turns_remaining: max_turns.saturating_sub(elapsed),
                is_ready: percent >= 100.0,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CreatureId;
    use crate::creature::{refresh_stats, BaseStats, Rarity, StandardStatDeriver};
    use crate::effects::{ChargeChannel, ChargeParams, Effect, EffectOrigin};

    fn creature() -> Creature {
        let stats = BaseStats::new(10, 10, 10, 10, 10);
        let mut c = Creature::new(CreatureId(1), "Mossling", Rarity::Common, stats);
        refresh_stats(&mut c, &StandardStatDeriver, 0.08);
        c
    }

    #[test]
    fn test_energy_momentum() {
        let m = EnergyMomentum::from_momentum(23);
        assert_eq!(m.bonus_regen, 2);
        assert_eq!(m.next_threshold, 7);
        assert_eq!(EnergyMomentum::from_momentum(0).next_threshold, 10);
    }

    #[test]
    fn test_creature_power() {
        // 2 * 30 + 25 + 10 + 0.5 * (30 + 7 + 5) + 10 = 126
        assert_eq!(creature_power(&creature()), 126);
        let mut blank = creature();
        blank.battle_stats = None;
        assert_eq!(creature_power(&blank), 0);
    }

    #[test]
    fn test_energy_efficiency() {
        let c = creature();
        assert_eq!(energy_efficiency(ActionKind::Attack, &c, 4), 7.5);
        assert_eq!(energy_efficiency(ActionKind::Defend, &c, 3), 16.7);
        assert_eq!(energy_efficiency(ActionKind::Deploy, &c, 3), 4.2);
        assert_eq!(energy_efficiency(ActionKind::Other, &c, 4), 2.5);
        assert_eq!(energy_efficiency(ActionKind::Attack, &c, 0), 0.0);
    }

    #[test]
    fn test_charge_progress() {
        let mut c = creature();
        let params = ChargeParams {
            channel: ChargeChannel::Damage,
            base_value: 5,
            per_turn_increase: 5,
            final_burst: 20,
            max_turns: 2,
        };
        let storm = EffectKind::Charge(params);
        c.active_effects.push(Effect::new(EffectId(9), "Storm", storm, EffectOrigin::Spell, 2, 3));
        let plain = EffectKind::Standard;
        c.active_effects.push(Effect::new(EffectId(10), "Plain", plain, EffectOrigin::Tool, 2, 3));

        let progress = charge_progress(&c, 4);
        assert_eq!(progress.len(), 1);
        assert_eq!(progress[0].percent, 50.0);
        assert_eq!(progress[0].turns_remaining, 1);
        assert!(!progress[0].is_ready);

        assert!(charge_progress(&c, 5)[0].is_ready);
    }
}
