//! Spell application.
//!
//! Spells branch on the catalog descriptor's duration:
//!
//! - **Instant** (duration 0): scaled damage with a critical roll and
//!   magical-defense resistance, or scaled healing.
//! - **Over time**: the first tick lands immediately, then an effect that
//!   tracks the full duration is attached to the target. Self stat changes
//!   are mirrored onto the caster as a separate effect. Drain self-heal
//!   reaches the caster only through the first tick and the lifecycle
//!   ledger, never through the mirrored effect.
//!
//! A creature casting on itself is handled as one creature returned in both
//! slots of the outcome.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::CombatError;
use crate::creature::Creature;
use crate::effects::lifecycle::contribution;
use crate::effects::{
    CatalogItem, EffectDescriptor, EffectFamily, Effect, EffectKind, EffectOrigin, PerTurn, Spell,
};

use super::context::ResolverContext;

/// Result of casting a spell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpellOutcome {
    pub caster: Creature,
    pub target: Creature,
    pub spell_name: String,
    pub family: Option<EffectFamily>,
    /// Health removed from the target.
    pub damage: i32,
    /// Health restored to the target.
    pub healing: i32,
    /// Health restored to the caster by the first drain tick.
    pub self_healing: i32,
    pub was_critical: bool,
    pub duration: u32,
    pub power: f64,
    /// Effect attached to the target, for over-time spells.
    pub effect: Option<Effect>,
    /// Effect mirrored onto the caster.
    pub caster_effect: Option<Effect>,
}

/// Cast `spell` from `caster` on `target` during `current_turn`.
///
/// Fails when the caster has no raw attributes, the target has no derived
/// stats, or the catalog has nothing for the spell.
pub fn apply_spell(
    caster: &Creature,
    target: &Creature,
    spell: &Spell,
    current_turn: u32,
    ctx: &mut ResolverContext<'_>,
) -> Result<SpellOutcome, CombatError> {
    let caster_stats = *caster.require_stats()?;
    target.require_battle_stats()?;

    let descriptor = ctx
        .catalog
        .spell_effect(spell, caster_stats.magic)
        .ok_or_else(|| CombatError::CatalogMiss {
            item: spell.name.clone(),
        })?;
    let power = ctx
        .catalog
        .effect_power(CatalogItem::Spell(spell), &caster_stats, ctx.difficulty)
        .max(0.0);

    let self_cast = caster.id == target.id;
    let mut target_out = target.clone();
    target_out.current_turn = current_turn;
    let mut caster_out = (!self_cast).then(|| {
        let mut c = caster.clone();
        c.current_turn = current_turn;
        c
    });

    let mut outcome = SpellOutcome {
        caster: caster.clone(),
        target: target.clone(),
        spell_name: spell.name.clone(),
        family: descriptor.family,
        damage: 0,
        healing: 0,
        self_healing: 0,
        was_critical: false,
        duration: descriptor.duration,
        power,
        effect: None,
        caster_effect: None,
    };

    if descriptor.is_instant() {
        resolve_instant(&descriptor, power, caster_stats.magic, &mut target_out, &mut outcome, ctx);
        ctx.refresh(&mut target_out);
        if let Some(c) = caster_out.as_mut() {
            ctx.refresh(c);
        }
    } else {
        let effect = build_effect(&descriptor, power, spell, caster.id, current_turn, ctx);
        let mut attached = effect.clone();
        let tick = contribution(&effect, current_turn);
        attached.stat_modifications = tick.stat_mods.clone();

        target_out.active_effects.push(attached.clone());
        ctx.refresh(&mut target_out);
        outcome.damage = target_out.take_damage(tick.damage);
        outcome.healing = target_out.heal(tick.healing);
        outcome.effect = Some(attached);

        let caster_slot = match caster_out.as_mut() {
            Some(c) => c,
            None => &mut target_out,
        };
        if tick.self_heal > 0 && caster_slot.battle_stats.is_some() {
            outcome.self_healing = caster_slot.heal(tick.self_heal);
        }
        let self_mods = descriptor.self_stat_changes.scaled(power);
        if !self_mods.is_empty() {
            let mirrored = Effect::new(
                ctx.ids.next_effect(),
                format!("{} (Self)", spell.name),
                EffectKind::Standard,
                EffectOrigin::SpellSelf,
                descriptor.duration,
                current_turn,
            )
            .with_stat_modifications(self_mods)
            .with_caster(caster.id);
            caster_slot.active_effects.push(mirrored.clone());
            outcome.caster_effect = Some(mirrored);
        }
        ctx.refresh(caster_slot);

        debug!(
            spell = %spell.name,
            target = %target.id,
            damage = outcome.damage,
            healing = outcome.healing,
            self_healing = outcome.self_healing,
            duration = descriptor.duration,
            "Spell first tick"
        );
    }

    info!(
        spell = %spell.name,
        caster = %caster.id,
        target = %target.id,
        damage = outcome.damage,
        healing = outcome.healing,
        critical = outcome.was_critical,
        "Spell applied"
    );

    outcome.caster = caster_out.unwrap_or_else(|| target_out.clone());
    outcome.target = target_out;
    Ok(outcome)
}

fn resolve_instant(
    descriptor: &EffectDescriptor,
    power: f64,
    magic: i32,
    target: &mut Creature,
    outcome: &mut SpellOutcome,
    ctx: &mut ResolverContext<'_>,
) {
    let round = |v: f64| v.round() as i32;

    if descriptor.damage > 0 {
        let mut scaled = round(f64::from(descriptor.damage) * power);
        let crit_chance = ctx.config.spell_crit_chance(magic);
        if ctx.rng.roll_percent() <= f64::from(crit_chance) {
            scaled = round(f64::from(scaled) * ctx.config.spell_crit_multiplier);
            outcome.was_critical = true;
        }
        let magical_defense = target.battle_stats.map(|s| s.magical_defense).unwrap_or(0);
        let resistance = ctx.config.spell_resistance(magical_defense);
        let final_damage = round(f64::from(scaled) * (1.0 - resistance)).max(1);
        outcome.damage = target.take_damage(final_damage);
        debug!(
            scaled,
            crit_chance,
            resistance,
            final_damage,
            dealt = outcome.damage,
            "Instant spell damage"
        );
    } else if descriptor.healing > 0 {
        let scaled = round(f64::from(descriptor.healing) * power);
        outcome.healing = target.heal(scaled);
    }
}

fn build_effect(
    descriptor: &EffectDescriptor,
    power: f64,
    spell: &Spell,
    caster: crate::core::CreatureId,
    current_turn: u32,
    ctx: &mut ResolverContext<'_>,
) -> Effect {
    let round = |v: i32| (f64::from(v) * power).round() as i32;
    let per_turn = PerTurn {
        damage: round(descriptor.damage_over_time),
        healing: round(descriptor.healing_over_time),
        self_heal: round(descriptor.self_heal_over_time),
    };

    let kind = if let Some(charge) = &descriptor.charge {
        EffectKind::Charge(charge.scaled(power))
    } else if let Some(echo) = &descriptor.echo {
        EffectKind::Echo(echo.scaled(power))
    } else if per_turn.self_heal > 0 {
        EffectKind::Drain
    } else {
        EffectKind::Standard
    };

    Effect::new(
        ctx.ids.next_effect(),
        format!("{} Effect", spell.name),
        kind,
        EffectOrigin::Spell,
        descriptor.duration,
        current_turn,
    )
    .with_stat_modifications(descriptor.stat_changes.scaled(power))
    .with_per_turn(per_turn)
    .with_caster(caster)
}
