//! Action resolver integration tests.
//!
//! Each test goes through `CombatEngine` with stubbed collaborators so the
//! numbers are fixed by the test rather than by the stock balance tables.

use std::cell::RefCell;
use std::rc::Rc;

use creature_clash::battle::CombatEngine;
use creature_clash::combat::{AttackKind, CombatMath, DamageResult, StandardCombatMath, Synergy};
use creature_clash::core::{CombatError, CreatureId, Difficulty, FixedRolls, RandomSource};
use creature_clash::creature::{
    refresh_stats, BaseStats, BattleStats, Creature, Rarity, StandardStatDeriver, Stat, StatMods,
};
use creature_clash::effects::{
    CatalogItem, EffectCatalog, EffectDescriptor, EffectFamily, EffectKind, EffectOrigin, Spell,
    SpellType, StandardCatalog, Tool, ToolType,
};

// =============================================================================
// Helpers
// =============================================================================

struct FixedCatalog(Option<EffectDescriptor>);

impl EffectCatalog for FixedCatalog {
    fn tool_effect(&self, _: &Tool) -> Option<EffectDescriptor> {
        self.0.clone()
    }

    fn spell_effect(&self, _: &Spell, _: i32) -> Option<EffectDescriptor> {
        self.0.clone()
    }

    fn effect_power(&self, _: CatalogItem<'_>, _: &BaseStats, _: Difficulty) -> f64 {
        1.0
    }
}

/// Stock math that remembers the defense each attack was computed against.
struct RecordingMath(Rc<RefCell<Vec<i32>>>);

impl CombatMath for RecordingMath {
    fn resolve_damage(
        &self,
        attacker: &Creature,
        defender: &Creature,
        kind: AttackKind,
        combo_multiplier: f64,
        rng: &mut dyn RandomSource,
    ) -> DamageResult {
        let defense = defender.battle_stats.map(|s| s.get(kind.defense_stat())).unwrap_or(0);
        self.0.borrow_mut().push(defense);
        StandardCombatMath.resolve_damage(attacker, defender, kind, combo_multiplier, rng)
    }

    fn combo_multiplier(&self, combo_level: u32) -> f64 {
        StandardCombatMath.combo_multiplier(combo_level)
    }

    fn rarity_multiplier(&self, rarity: Rarity) -> f64 {
        StandardCombatMath.rarity_multiplier(rarity)
    }

    fn form_multiplier(&self, form: u32) -> f64 {
        StandardCombatMath.form_multiplier(form)
    }

    fn detect_synergies(&self, roster: &[Creature]) -> Vec<Synergy> {
        StandardCombatMath.detect_synergies(roster)
    }

    fn synergy_bonus(&self, creature: &Creature, synergies: &[Synergy]) -> StatMods {
        StandardCombatMath.synergy_bonus(creature, synergies)
    }
}

fn creature(id: u32, stats: BaseStats) -> Creature {
    let mut c = Creature::new(CreatureId(id), "Mossling", Rarity::Common, stats);
    refresh_stats(&mut c, &StandardStatDeriver, 0.08);
    c.current_health = c.max_health();
    c
}

fn even(id: u32) -> Creature {
    creature(id, BaseStats::new(10, 10, 10, 10, 10))
}

fn bolt() -> Spell {
    Spell::new("Bolt", EffectFamily::Surge, SpellType::Offensive, 5)
}

fn instant_damage(amount: i32) -> EffectDescriptor {
    EffectDescriptor {
        family: Some(EffectFamily::Surge),
        damage: amount,
        duration: 0,
        ..EffectDescriptor::default()
    }
}

/// Target whose magical defense has been stripped to 0.
fn exposed(id: u32, health: i32) -> Creature {
    let mut c = even(id).with_health(health);
    let stats = BattleStats {
        magical_defense: 0,
        ..c.battle_stats.unwrap()
    };
    c.battle_stats = Some(stats);
    c
}

// =============================================================================
// Spells
// =============================================================================

/// Magic 10 gives an 8% crit chance; a roll of 50 misses it and the full
/// 20 damage lands against zero resistance.
#[test]
fn test_instant_spell_exact_damage() {
    let mut engine = CombatEngine::builder()
        .catalog(FixedCatalog(Some(instant_damage(20))))
        .rng(FixedRolls::constant(0.5))
        .build();
    assert_eq!(engine.config().spell_crit_chance(10), 8);

    let out = engine
        .apply_spell(&even(1), &exposed(2, 100), &bolt(), 0, Difficulty::Medium)
        .unwrap();
    assert!(!out.was_critical);
    assert_eq!(out.damage, 20);
    assert_eq!(out.target.current_health, 80);
    assert!(out.effect.is_none());
}

/// Lethal damage stops at 0 health.
#[test]
fn test_instant_spell_lethal() {
    let mut engine = CombatEngine::builder()
        .catalog(FixedCatalog(Some(instant_damage(20))))
        .rng(FixedRolls::constant(0.5))
        .build();
    let out = engine
        .apply_spell(&even(1), &exposed(2, 15), &bolt(), 0, Difficulty::Medium)
        .unwrap();
    assert_eq!(out.damage, 15);
    assert_eq!(out.target.current_health, 0);
    assert!(!out.target.is_alive());
}

/// A roll inside the crit window multiplies by 1.5.
#[test]
fn test_instant_spell_critical() {
    let mut engine = CombatEngine::builder()
        .catalog(FixedCatalog(Some(instant_damage(20))))
        .rng(FixedRolls::constant(0.05))
        .build();
    let out = engine
        .apply_spell(&even(1), &exposed(2, 100), &bolt(), 0, Difficulty::Medium)
        .unwrap();
    assert!(out.was_critical);
    assert_eq!(out.damage, 30);
}

/// Spells fail cleanly on bad input instead of panicking.
#[test]
fn test_spell_failures() {
    let mut engine = CombatEngine::builder().catalog(FixedCatalog(None)).build();
    let err = engine
        .apply_spell(&even(1), &even(2), &bolt(), 0, Difficulty::Medium)
        .unwrap_err();
    assert!(matches!(err, CombatError::CatalogMiss { .. }));

    let mut blank = even(2);
    blank.battle_stats = None;
    let err = engine
        .apply_spell(&even(1), &blank, &bolt(), 0, Difficulty::Medium)
        .unwrap_err();
    assert!(matches!(err, CombatError::MissingBattleStats { .. }));
}

// =============================================================================
// Defend
// =============================================================================

/// Physical defense 50 gains 25 and the very next attack sees 75.
#[test]
fn test_defend_boosts_next_attack_defense() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut engine = CombatEngine::builder()
        .math(RecordingMath(Rc::clone(&seen)))
        .rng(FixedRolls::constant(0.99))
        .build();

    let guard = creature(1, BaseStats::new(0, 0, 0, 30, 0));
    assert_eq!(guard.battle_stats.unwrap().physical_defense, 50);
    let attacker = even(2);

    let stance = engine.defend(&guard, Difficulty::Medium);
    let effect = stance.effect.unwrap();
    assert_eq!(effect.kind, EffectKind::Defense { damage_reduction: 0.2 });
    assert_eq!(effect.origin, EffectOrigin::Stance);
    assert_eq!(effect.duration, 2);
    assert_eq!(effect.stat_modifications.get(Stat::PhysicalDefense), 25);

    let physical = Some(AttackKind::Physical);
    let hit = engine.resolve_attack(&attacker, &stance.creature, physical, 1, Difficulty::Medium);
    assert_eq!(*seen.borrow(), vec![75]);
    // 30 * 100 / 175 = 17.14, glancing x0.8, stance x0.8 = 10.97
    assert_eq!(hit.damage(), 11);

    let unguarded = engine.resolve_attack(&attacker, &guard, physical, 1, Difficulty::Medium);
    assert_eq!(unguarded.damage(), 20);
}

// =============================================================================
// Attacks and tools
// =============================================================================

/// A pending charge bonus is spent on the attack and cleared afterwards.
#[test]
fn test_attack_consumes_charge_bonus() {
    let mut engine = CombatEngine::builder().rng(FixedRolls::constant(0.99)).build();
    let mut attacker = even(1);
    attacker.next_attack_bonus = Some(20);
    let defender = even(2);

    let physical = Some(AttackKind::Physical);
    let out = engine.resolve_attack(&attacker, &defender, physical, 1, Difficulty::Medium);
    // (30 + 20) * 100 / 125 = 40, crushing x1.1 since 50 >= 2 * 25
    assert_eq!(out.damage(), 44);
    assert_eq!(out.attacker.next_attack_bonus, None);
    assert_eq!(out.attacker.battle_stats, attacker.battle_stats);
    assert_eq!(attacker.next_attack_bonus, Some(20));
}

/// Combo level raises damage by 10% a step.
#[test]
fn test_combo_damage() {
    let mut engine = CombatEngine::builder().rng(FixedRolls::constant(0.99)).build();
    let physical = Some(AttackKind::Physical);
    let out = engine.resolve_attack(&even(1), &even(2), physical, 3, Difficulty::Medium);
    assert!((out.combo_multiplier - 1.2).abs() < 1e-9);
    // 30 * 100 / 125 * 1.2 = 28.8
    assert_eq!(out.damage(), 29);
}

/// Attacks with a malformed participant change nothing.
#[test]
fn test_attack_invalid_input() {
    let mut engine = CombatEngine::builder().build();
    let mut blank = even(2);
    blank.battle_stats = None;
    let attacker = even(1);
    let out = engine.resolve_attack(&attacker, &blank, None, 1, Difficulty::Medium);
    assert_eq!(out.damage(), 0);
    assert_eq!(out.defender, blank);
    assert_eq!(out.attacker, attacker);
    assert!(out.diagnostic.is_some());
}

/// The stock catalog drives a real tool end to end.
#[test]
fn test_stock_tool() {
    let mut engine = CombatEngine::builder().catalog(StandardCatalog).build();
    let tool = Tool::new("Aegis", EffectFamily::Shield, ToolType::Defensive, 4);
    let patient = even(1).with_health(50);

    let out = engine.apply_tool(&patient, &tool, 0, Difficulty::Medium);
    let effect = out.effect.unwrap();
    assert_eq!(effect.origin, EffectOrigin::Tool);
    assert!(effect.stat_modifications.get(Stat::PhysicalDefense) > 0);
    assert!(out.health_change > 0);
    let before = patient.battle_stats.unwrap().physical_defense;
    assert!(out.creature.battle_stats.unwrap().physical_defense > before);
    assert_eq!(patient.current_health, 50);
}
