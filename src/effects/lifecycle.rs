//! Effect lifecycle: advancing timed effects by one turn.
//!
//! Only the turn orchestrator runs the pass. Action resolvers use
//! [`contribution`] to compute an effect's first tick but never advance or
//! expire anything themselves.
//!
//! ## One pass
//!
//! For every living creature in the batch, in roster order (fallen ones are
//! left untouched for the defeat sweep):
//! 1. Each non-Defense effect computes this turn's contribution. Charge and
//!    Echo effects write their recomputed stat deltas back onto the effect.
//! 2. Damage and healing are summed across effects; self-heal is credited
//!    to the caster in a ledger keyed by `caster_id`.
//! 3. Every effect's duration drops by one. Effects at 0, and Charge effects
//!    that fired their final burst, are removed.
//! 4. Stats are re-derived, then the net health delta is scaled and applied.
//!
//! After every creature is done, the ledger is paid out to casters found in
//! any roster of the batch, scaled at the receiving creature.

use im::Vector;
use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use crate::core::{CombatError, CreatureId, IdGenerator};
use crate::creature::{refresh_stats, Creature, StatDeriver, StatMods};

use super::effect::{ChargeChannel, EchoParams, Effect, EffectKind};

/// What one effect contributes on one turn.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct EffectTick {
    pub stat_mods: StatMods,
    pub damage: i32,
    pub healing: i32,
    pub self_heal: i32,
    pub is_final_burst: bool,
}

/// Contribution of `effect` as of `current_turn`.
pub(crate) fn contribution(effect: &Effect, current_turn: u32) -> EffectTick {
    let elapsed = effect.turns_elapsed(current_turn);

    match &effect.kind {
        EffectKind::Charge(params) => {
            let (value, is_final_burst) = params.value_at(elapsed);
            let mut tick = EffectTick {
                is_final_burst,
                ..EffectTick::default()
            };
            match &params.channel {
                ChargeChannel::Stats(stats) => {
                    tick.stat_mods = stats.iter().map(|&s| (s, value)).collect();
                }
                ChargeChannel::Damage => tick.damage = value,
                ChargeChannel::Healing => tick.healing = value,
            }
            tick
        }
        EffectKind::Echo(params) => EffectTick {
            stat_mods: params
                .stat_base
                .map(|_, base| EchoParams::decay(base, params.stat_decay, elapsed)),
            damage: EchoParams::decay(params.damage_base, params.damage_decay, elapsed),
            healing: EchoParams::decay(params.healing_base, params.healing_decay, elapsed),
            self_heal: EchoParams::decay(params.self_heal_base, params.self_heal_decay, elapsed),
            is_final_burst: false,
        },
        EffectKind::Defense { .. } => EffectTick {
            stat_mods: effect.stat_modifications.clone(),
            ..EffectTick::default()
        },
        EffectKind::Standard
        | EffectKind::Drain
        | EffectKind::EnergyBurst
        | EffectKind::Blessing
        | EffectKind::Debuff => EffectTick {
            stat_mods: effect.stat_modifications.clone(),
            damage: effect.per_turn.damage,
            healing: effect.per_turn.healing,
            self_heal: effect.per_turn.self_heal,
            is_final_burst: false,
        },
    }
}

/// Scale a health delta by difficulty, then by the receiver's rarity.
pub(crate) fn scale_health_delta(delta: i32, effect_scale: f64, receiver: &Creature) -> i32 {
    let by_difficulty = (f64::from(delta) * effect_scale).round();
    (by_difficulty * receiver.rarity.effect_scale()).round() as i32
}

/// Outcome of one effect pass.
#[derive(Clone, Debug, Default)]
pub(crate) struct PassReport {
    /// Creatures whose effects were advanced.
    pub processed: usize,
    /// Effects removed this pass.
    pub expired: usize,
    /// Creatures skipped, and why.
    pub warnings: Vec<CombatError>,
}

/// Runs the once-per-turn effect pass over a batch of rosters.
pub(crate) struct EffectPass<'a> {
    pub deriver: &'a dyn StatDeriver,
    pub ids: &'a mut IdGenerator,
    pub combination_step: f64,
    /// Difficulty multiplier on health deltas.
    pub effect_scale: f64,
}

impl EffectPass<'_> {
    /// Advance every creature's effects in `rosters` for `turn`.
    pub fn run(&mut self, rosters: &mut [&mut Vector<Creature>], turn: u32) -> PassReport {
        let mut report = PassReport::default();
        let mut ledger: FxHashMap<CreatureId, i32> = FxHashMap::default();

        for roster in rosters.iter_mut() {
            for creature in roster.iter_mut() {
                if let Err(err) = creature.require_stats().and(creature.require_battle_stats()) {
                    warn!(creature = %creature.id, error = %err, "Skipping malformed creature");
                    report.warnings.push(err);
                    continue;
                }
                // Fallen creatures wait for the defeat sweep untouched.
                if !creature.is_alive() {
                    debug!(creature = %creature.id, "Skipping fallen creature");
                    continue;
                }
                if creature.last_effect_pass == Some(turn) {
                    let err = CombatError::AlreadyProcessed {
                        creature: creature.id,
                        turn,
                    };
                    warn!(creature = %creature.id, turn, "Effect pass already ran this turn");
                    report.warnings.push(err);
                    continue;
                }
                report.expired += self.advance_creature(creature, turn, &mut ledger);
                report.processed += 1;
            }
        }

        if !ledger.is_empty() {
            self.pay_ledger(rosters, ledger);
        }
        report
    }

    /// Advance one creature's effects. Returns how many expired.
    fn advance_creature(
        &mut self,
        creature: &mut Creature,
        turn: u32,
        ledger: &mut FxHashMap<CreatureId, i32>,
    ) -> usize {
        let mut total_damage = 0;
        let mut total_healing = 0;
        let mut expired = 0;
        let mut kept = Vec::with_capacity(creature.active_effects.len());
        let mut bursts = Vec::new();

        for mut effect in creature.active_effects.drain(..) {
            let tick = contribution(&effect, turn);

            if !effect.is_defense() {
                effect.stat_modifications = tick.stat_mods.clone();
                total_damage += tick.damage;
                total_healing += tick.healing;
                if tick.self_heal != 0 {
                    match effect.caster_id {
                        Some(caster) => *ledger.entry(caster).or_insert(0) += tick.self_heal,
                        None => debug!(effect = %effect.id, "Self-heal with no caster dropped"),
                    }
                }
            }

            effect.duration = effect.duration.saturating_sub(1);

            if tick.is_final_burst && !tick.stat_mods.is_empty() {
                bursts.push((effect.name.clone(), effect.origin, tick.stat_mods));
            }
            if effect.duration == 0 || tick.is_final_burst {
                debug!(
                    creature = %creature.id,
                    effect = %effect.name,
                    kind = effect.kind.label(),
                    final_burst = tick.is_final_burst,
                    "Effect expired"
                );
                expired += 1;
            } else {
                kept.push(effect);
            }
        }

        // A stat burst outlives its charge by one turn so it is actually felt.
        for (name, origin, mods) in bursts {
            let burst = Effect::new(
                self.ids.next_effect(),
                format!("{name} (Released)"),
                EffectKind::Blessing,
                origin,
                1,
                turn,
            )
            .with_stat_modifications(mods);
            kept.push(burst);
        }

        creature.active_effects = kept;
        if creature.is_defending && !creature.has_stance() {
            creature.is_defending = false;
            debug!(creature = %creature.id, "Defensive stance ended");
        }
        creature.current_turn = turn;
        creature.last_effect_pass = Some(turn);
        refresh_stats(creature, self.deriver, self.combination_step);

        let net = total_healing - total_damage;
        if net != 0 {
            let scaled = scale_health_delta(net, self.effect_scale, creature);
            let applied = creature.change_health(scaled);
            debug!(
                creature = %creature.id,
                damage = total_damage,
                healing = total_healing,
                applied,
                health = creature.current_health,
                "Applied effect health delta"
            );
        }
        expired
    }

    fn pay_ledger(
        &self,
        rosters: &mut [&mut Vector<Creature>],
        mut ledger: FxHashMap<CreatureId, i32>,
    ) {
        for roster in rosters.iter_mut() {
            for creature in roster.iter_mut() {
                let Some(amount) = ledger.remove(&creature.id) else {
                    continue;
                };
                if !creature.is_alive() || creature.battle_stats.is_none() {
                    debug!(
                        creature = %creature.id,
                        amount,
                        "Drain credit to fallen caster dropped"
                    );
                    continue;
                }
                let scaled = scale_health_delta(amount, self.effect_scale, creature);
                let applied = creature.change_health(scaled);
                debug!(creature = %creature.id, amount, applied, "Drain credit paid");
            }
        }
        for (caster, amount) in ledger {
            trace!(creature = %caster, amount, "Drain caster not on the field");
        }
    }
}
