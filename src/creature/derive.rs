//! Stat derivation and aggregation.
//!
//! Two layers produce a creature's effective battle stats:
//!
//! - A [`StatDeriver`] turns raw attributes, form and rarity into base battle
//!   stats. Games may plug in their own formulas.
//! - [`derive_stats`] is the aggregator: it asks the deriver for base stats
//!   with active effects skipped, then folds in every active effect, the
//!   permanent modifications, and the combination bonus.
//!
//! The aggregator is the single source of truth for "current" stats and must
//! be re-run after any change to effects, base stats, or permanent
//! modifications. Given the same inputs it always returns the same stats.

use crate::effects::Effect;

use super::model::Creature;
use super::stats::{BattleStats, Stat};

/// Stat multiplier for an evolution tier.
#[must_use]
pub fn form_multiplier(form: u32) -> f64 {
    1.0 + f64::from(form) * 0.1
}

/// Computes base battle stats from raw attributes.
pub trait StatDeriver {
    /// Derive battle stats for a creature.
    ///
    /// - `effects_override`: extra effects folded in when `include_effects` is set
    /// - `skip_active_effects`: when true, the creature's own `active_effects`
    ///   contribute nothing
    ///
    /// Returns `None` when the creature has no raw attributes.
    fn derive_base_stats(
        &self,
        creature: &Creature,
        effects_override: &[Effect],
        include_effects: bool,
        skip_active_effects: bool,
    ) -> Option<BattleStats>;
}

/// Default attribute-to-stat formulas.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardStatDeriver;

impl StandardStatDeriver {
    fn base(creature: &Creature) -> Option<BattleStats> {
        let raw = creature.stats?;
        let mult = creature.rarity.stat_multiplier() * form_multiplier(creature.form);
        let scale = |v: f64| (v * mult).round() as i32;

        let strength = f64::from(raw.strength);
        let magic = f64::from(raw.magic);
        let stamina = f64::from(raw.stamina);
        let speed = f64::from(raw.speed);

        Some(BattleStats {
            physical_attack: scale(10.0 + strength * 2.0),
            magical_attack: scale(10.0 + magic * 2.0),
            physical_defense: scale(5.0 + stamina * 1.5 + strength * 0.5),
            magical_defense: scale(5.0 + magic + stamina * 0.5),
            max_health: scale(50.0 + stamina * 5.0),
            initiative: scale(10.0 + speed * 2.0),
            critical_chance: 5 + raw.speed / 4,
            dodge_chance: 3 + raw.speed / 5,
            energy_cost: 3 + creature.form as i32,
        })
    }
}

impl StatDeriver for StandardStatDeriver {
    fn derive_base_stats(
        &self,
        creature: &Creature,
        effects_override: &[Effect],
        include_effects: bool,
        skip_active_effects: bool,
    ) -> Option<BattleStats> {
        let mut stats = Self::base(creature)?;

        let active: &[Effect] = if skip_active_effects { &[] } else { &creature.active_effects };
        let extra: &[Effect] = if include_effects { effects_override } else { &[] };

        for effect in active.iter().chain(extra) {
            for &(stat, delta) in effect.stat_modifications.iter() {
                stats.add_clamped(stat, delta);
            }
        }
        Some(stats)
    }
}

/// Aggregate a creature's effective battle stats.
///
/// Order: deriver base (effects skipped), then each active effect's
/// modifications with per-stat floors, then permanent modifications,
/// then the combination multiplier on every non-percentage, non-cost stat.
///
/// Returns `None` if the deriver cannot produce base stats.
#[must_use]
pub fn derive_stats(
    creature: &Creature,
    deriver: &dyn StatDeriver,
    combination_step: f64,
) -> Option<BattleStats> {
    let mut stats = deriver.derive_base_stats(creature, &[], false, true)?;

    for effect in &creature.active_effects {
        for &(stat, delta) in effect.stat_modifications.iter() {
            stats.add_clamped(stat, delta);
        }
    }

    for &(stat, delta) in creature.permanent_modifications.iter() {
        stats.add_raw(stat, delta);
    }

    if creature.combination_level > 0 {
        let multiplier = 1.0 + f64::from(creature.combination_level) * combination_step;
        for stat in Stat::ALL {
            if stat.is_percentage() || stat.is_cost() {
                continue;
            }
            let boosted = (f64::from(stats.get(stat)) * multiplier).round() as i32;
            stats.set(stat, boosted);
        }
    }

    Some(stats)
}

/// Re-run the aggregator and store the result, clamping health to the new maximum.
///
/// Leaves the creature untouched and returns false if stats cannot be derived.
pub fn refresh_stats(
    creature: &mut Creature,
    deriver: &dyn StatDeriver,
    combination_step: f64,
) -> bool {
    match derive_stats(creature, deriver, combination_step) {
        Some(stats) => {
            creature.battle_stats = Some(stats);
            creature.clamp_health();
            true
        }
        None => false,
    }
}
