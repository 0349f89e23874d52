//! Tool application.
//!
//! A tool is used on one of the player's own creatures. Its catalog
//! descriptor is scaled by the caster's power multiplier with two caps:
//! stat deltas are clamped to ±`tool_stat_cap` before scaling and the
//! multiplier applied to them is clamped to `tool_power_cap`; instant
//! healing is clamped to `tool_heal_cap` after scaling.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::CombatError;
use crate::creature::{Creature, StatMods};
use crate::effects::lifecycle::contribution;
use crate::effects::{
    CatalogItem, EffectDescriptor, Effect, EffectKind, EffectOrigin, PerTurn, PowerLevel, Tool,
};

use super::context::ResolverContext;

/// Result of using a tool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolOutcome {
    pub creature: Creature,
    /// Descriptor after power scaling and caps. `None` on a no-op.
    pub descriptor: Option<EffectDescriptor>,
    /// Effect attached to the creature.
    pub effect: Option<Effect>,
    pub power: f64,
    /// Health restored by the instant heal and first tick together.
    pub health_change: i32,
    pub diagnostic: Option<CombatError>,
}

impl ToolOutcome {
    fn noop(creature: &Creature, err: CombatError) -> Self {
        Self {
            creature: creature.clone(),
            descriptor: None,
            effect: None,
            power: 0.0,
            health_change: 0,
            diagnostic: Some(err),
        }
    }
}

/// Use `tool` on `creature` during `current_turn`.
pub fn apply_tool(
    creature: &Creature,
    tool: &Tool,
    current_turn: u32,
    ctx: &mut ResolverContext<'_>,
) -> ToolOutcome {
    if let Err(err) = creature.require_battle_stats() {
        return ToolOutcome::noop(creature, err);
    }
    let Some(base) = ctx.catalog.tool_effect(tool) else {
        debug!(tool = %tool.name, "Tool has no catalog effect");
        return ToolOutcome::noop(
            creature,
            CombatError::CatalogMiss {
                item: tool.name.clone(),
            },
        );
    };

    let attributes = creature.stats.unwrap_or_default();
    let power = ctx
        .catalog
        .effect_power(CatalogItem::Tool(tool), &attributes, ctx.difficulty)
        .max(0.0);
    let scaled = scale_descriptor(&base, power, ctx);

    let mut out = creature.clone();
    out.current_turn = current_turn;

    let kind = if let Some(charge) = &scaled.charge {
        EffectKind::Charge(charge.clone())
    } else if let Some(echo) = &scaled.echo {
        EffectKind::Echo(echo.clone())
    } else {
        EffectKind::Standard
    };

    let mut effect = Effect::new(
        ctx.ids.next_effect(),
        format!("{} Effect", tool.name),
        kind,
        EffectOrigin::Tool,
        scaled.duration.max(1),
        current_turn,
    )
    .with_stat_modifications(scaled.stat_changes.clone())
    .with_per_turn(PerTurn::healing(scaled.healing_over_time))
    .with_power_level(PowerLevel::from_multiplier(power));

    let first_tick = contribution(&effect, current_turn);
    effect.stat_modifications = first_tick.stat_mods;

    out.active_effects.push(effect.clone());
    ctx.refresh(&mut out);

    let before = out.current_health;
    if scaled.health_change > 0 {
        out.heal(scaled.health_change);
    }
    out.change_health(first_tick.healing - first_tick.damage);
    let health_change = out.current_health - before;

    info!(
        creature = %out.id,
        tool = %tool.name,
        power,
        health_change,
        duration = effect.duration,
        "Tool applied"
    );

    ToolOutcome {
        creature: out,
        descriptor: Some(scaled),
        effect: Some(effect),
        power,
        health_change,
        diagnostic: None,
    }
}

fn scale_descriptor(
    base: &EffectDescriptor,
    power: f64,
    ctx: &ResolverContext<'_>,
) -> EffectDescriptor {
    let cap = ctx.config.tool_stat_cap;
    let stat_power = power.min(ctx.config.tool_power_cap);
    let round = |v: f64| v.round() as i32;

    let stat_changes: StatMods = base
        .stat_changes
        .map(|_, d| round(f64::from(d.clamp(-cap, cap)) * stat_power));

    let health_change = if base.health_change > 0 {
        round((f64::from(base.health_change) * power).min(f64::from(ctx.config.tool_heal_cap)))
    } else {
        0
    };

    let echo = base.echo.as_ref().map(|echo| {
        let mut scaled = echo.scaled(power);
        scaled.stat_base = stat_changes.clone();
        scaled
    });

    EffectDescriptor {
        stat_changes,
        health_change,
        healing_over_time: round(f64::from(base.healing_over_time) * power),
        charge: base.charge.as_ref().map(|c| c.scaled(power)),
        echo,
        ..base.clone()
    }
}
