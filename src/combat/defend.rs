//! Defensive stance.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::CombatError;
use crate::creature::{Creature, Stat, StatMods};
use crate::effects::{Effect, EffectKind, EffectOrigin};

use super::context::ResolverContext;

/// Turns a stance lasts: the opponent's full turn plus the owner's next upkeep.
pub const STANCE_DURATION: u32 = 2;

/// Result of taking a defensive stance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DefendOutcome {
    pub creature: Creature,
    pub effect: Option<Effect>,
    pub diagnostic: Option<CombatError>,
}

/// Put `creature` into a defensive stance.
///
/// Each defense stat gains half its current value, plus that half again
/// times the rarity bonus. Stats are re-derived so the next attack already
/// sees the boost.
pub fn defend(creature: &Creature, ctx: &mut ResolverContext<'_>) -> DefendOutcome {
    let stats = match creature.require_battle_stats() {
        Ok(stats) => *stats,
        Err(err) => {
            return DefendOutcome {
                creature: creature.clone(),
                effect: None,
                diagnostic: Some(err),
            }
        }
    };

    let rarity_bonus = ctx.math.rarity_multiplier(creature.rarity) - 1.0;
    let boost = |value: i32| {
        let half = (f64::from(value) * 0.5).round();
        half as i32 + (half * rarity_bonus).round() as i32
    };
    let mods = StatMods::new()
        .with(Stat::PhysicalDefense, boost(stats.physical_defense))
        .with(Stat::MagicalDefense, boost(stats.magical_defense));

    let damage_reduction = ctx.difficulty.profile().defend_damage_reduction;
    let effect = Effect::new(
        ctx.ids.next_effect(),
        "Defensive Stance",
        EffectKind::Defense { damage_reduction },
        EffectOrigin::Stance,
        STANCE_DURATION,
        creature.current_turn,
    )
    .with_stat_modifications(mods.clone());

    let mut out = creature.clone();
    out.is_defending = true;
    out.active_effects.push(effect.clone());
    if !ctx.refresh(&mut out) {
        if let Some(s) = out.battle_stats.as_mut() {
            for &(stat, delta) in mods.iter() {
                s.add_clamped(stat, delta);
            }
        }
    }

    info!(
        creature = %creature.id,
        physical = mods.get(Stat::PhysicalDefense),
        magical = mods.get(Stat::MagicalDefense),
        damage_reduction,
        "Defensive stance"
    );

    DefendOutcome {
        creature: out,
        effect: Some(effect),
        diagnostic: None,
    }
}
