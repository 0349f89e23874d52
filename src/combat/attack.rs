//! Attack resolution.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::CombatError;
use crate::creature::{Creature, Rarity, Stat, StatMods};
use crate::effects::{Effect, EffectKind, EffectOrigin};

use super::context::ResolverContext;
use super::math::{AttackKind, DamageResult, DamageType, Effectiveness};

/// Result of one attack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub attacker: Creature,
    pub defender: Creature,
    pub kind: AttackKind,
    /// Raw result, with `damage` replaced by the health actually removed.
    pub result: DamageResult,
    pub combo_multiplier: f64,
    /// Debuffs left on the defender by this hit.
    pub debuffs: Vec<Effect>,
    pub battle_log: String,
    pub diagnostic: Option<CombatError>,
}

impl AttackOutcome {
    /// Health removed from the defender.
    #[must_use]
    pub fn damage(&self) -> i32 {
        self.result.damage
    }

    fn invalid(attacker: &Creature, defender: &Creature, err: CombatError) -> Self {
        Self {
            attacker: attacker.clone(),
            defender: defender.clone(),
            kind: AttackKind::Physical,
            result: DamageResult::default(),
            combo_multiplier: 1.0,
            debuffs: Vec::new(),
            battle_log: "Invalid attack - missing stats".to_string(),
            diagnostic: Some(err),
        }
    }
}

/// Resolve an attack. `kind == None` picks the attacker's stronger attack.
///
/// A pending `next_attack_bonus` is added to the chosen attack stat for this
/// attack only and is cleared on the returned attacker.
pub fn resolve_attack(
    attacker: &Creature,
    defender: &Creature,
    kind: Option<AttackKind>,
    combo_level: u32,
    ctx: &mut ResolverContext<'_>,
) -> AttackOutcome {
    let atk_stats = match attacker
        .require_battle_stats()
        .and_then(|s| defender.require_battle_stats().map(|_| *s))
    {
        Ok(stats) => stats,
        Err(err) => return AttackOutcome::invalid(attacker, defender, err),
    };

    let mut attacker_out = attacker.clone();
    let mut defender_out = defender.clone();
    let kind = kind.unwrap_or_else(|| AttackKind::best_for(&atk_stats));

    let mut striker = attacker.clone();
    striker.next_attack_bonus = None;
    if let Some(bonus) = attacker_out.next_attack_bonus.take() {
        if let Some(stats) = striker.battle_stats.as_mut() {
            stats.add_raw(kind.attack_stat(), bonus);
        }
        info!(creature = %attacker.id, bonus, "Charged attack unleashed");
    }

    let combo_multiplier = ctx.math.combo_multiplier(combo_level);
    let mut result = ctx
        .math
        .resolve_damage(&striker, &defender_out, kind, combo_multiplier, &mut *ctx.rng);

    let mut debuffs = Vec::new();
    if !result.is_dodged {
        let before = defender_out.current_health;
        result.damage = defender_out.take_damage(result.damage);
        debug!(
            attacker = %attacker.id,
            defender = %defender.id,
            damage = result.damage,
            before,
            after = defender_out.current_health,
            "Attack landed"
        );

        if result.is_critical && ctx.rng.chance(ctx.config.critical_debuff_chance) {
            debuffs.push(on_hit_debuff(ctx, &defender_out, "Critical Strike Trauma", 1, -2));
        }
        if result.effectiveness.is_super_effective()
            && ctx.rng.chance(ctx.config.effective_debuff_chance)
        {
            debuffs.push(on_hit_debuff(ctx, &defender_out, "Elemental Weakness", 2, -1));
        }
        if !debuffs.is_empty() {
            defender_out.active_effects.extend(debuffs.iter().cloned());
            ctx.refresh(&mut defender_out);
        }
    }

    let battle_log = battle_log(&attacker_out, &defender_out, kind, combo_level, &result);

    AttackOutcome {
        attacker: attacker_out,
        defender: defender_out,
        kind,
        result,
        combo_multiplier,
        debuffs,
        battle_log,
        diagnostic: None,
    }
}

fn on_hit_debuff(
    ctx: &mut ResolverContext<'_>,
    defender: &Creature,
    name: &str,
    duration: u32,
    delta: i32,
) -> Effect {
    Effect::new(
        ctx.ids.next_effect(),
        name,
        EffectKind::Debuff,
        EffectOrigin::OnHit,
        duration,
        defender.current_turn,
    )
    .with_stat_modifications(
        StatMods::new()
            .with(Stat::PhysicalDefense, delta)
            .with(Stat::MagicalDefense, delta),
    )
}

fn battle_log(
    attacker: &Creature,
    defender: &Creature,
    kind: AttackKind,
    combo_level: u32,
    result: &DamageResult,
) -> String {
    let (a, d) = (&attacker.species_name, &defender.species_name);
    if result.is_dodged {
        return format!("{a}'s {kind} attack was dodged by {d}!");
    }

    let mut log = format!("{a} used {kind} attack on {d}");
    if result.is_critical {
        log.push_str(" (Critical Hit!)");
    }
    if combo_level > 1 {
        log.push_str(&format!(" [Combo x{combo_level}!]"));
    }
    if result.effectiveness != Effectiveness::Normal {
        log.push_str(&format!(" - {}!", result.effectiveness.label()));
    }
    if result.damage_type != DamageType::Normal {
        log.push_str(&format!(" [{}]", result.damage_type.label()));
    }
    log.push_str(&format!(" dealing {} damage.", result.damage));

    let max = f64::from(defender.max_health());
    let health = f64::from(defender.current_health);
    if defender.current_health <= 0 {
        match defender.rarity {
            Rarity::Legendary => log.push_str(&format!(" {d} falls in battle!")),
            Rarity::Epic => log.push_str(&format!(" {d} has been defeated!")),
            _ => log.push_str(&format!(" {d} was defeated!")),
        }
    } else if health < max * 0.2 {
        log.push_str(&format!(" {d} is critically wounded!"));
    } else if health < max * 0.5 {
        log.push_str(&format!(" {d} is wounded!"));
    }
    log
}
