//! # creature-clash
//!
//! Turn resolution and effect lifecycle for a creature card-battle game.
//!
//! ## Design Principles
//!
//! 1. **Values in, values out**: resolvers take creatures by reference and
//!    return new ones, so the previous snapshot is always available.
//!
//! 2. **One advance per turn**: timed effects tick only inside
//!    `resolve_turn`. Action resolvers compute an effect's first tick but
//!    never advance it.
//!
//! 3. **Stats are derived, never patched**: after any change to a
//!    creature's effects, its battle stats are recomputed from scratch.
//!
//! 4. **Nothing is fatal**: bad input produces a no-op result with a
//!    `CombatError` diagnostic.
//!
//! ## Modules
//!
//! - `core`: ids, RNG, difficulty and balance configuration, errors
//! - `creature`: creatures, stats, and the stat aggregator
//! - `effects`: timed effects, the effect catalog, and the lifecycle pass
//! - `combat`: combat math and the attack/tool/spell/defend resolvers
//! - `battle`: battle state, turn upkeep, defeats, and `CombatEngine`

pub mod core;
pub mod creature;
pub mod effects;
pub mod combat;
pub mod battle;

// Re-export commonly used types
pub use crate::core::{
    BattleConfig, CombatError, CreatureId, Difficulty, DifficultyProfile, EffectId, FixedRolls,
    GameRng, GameRngState, IdGenerator, RandomSource,
};

pub use crate::creature::{
    derive_stats, Attribute, BaseStats, BattleStats, Creature, Element, Rarity, StandardStatDeriver,
    Stat, StatDeriver, StatMods,
};

pub use crate::effects::{
    ChargeChannel, ChargeParams, EchoParams, Effect, EffectCatalog, EffectDescriptor, EffectFamily,
    EffectKind, EffectOrigin, PerTurn, Spell, StandardCatalog, Tool,
};

pub use crate::combat::{
    AttackKind, AttackOutcome, CombatMath, DamageResult, DefendOutcome, SpellOutcome,
    StandardCombatMath, Synergy, ToolOutcome,
};

pub use crate::battle::{
    BattleState, Card, CombatEngine, CombatEngineBuilder, Side, SideState, TurnReport,
};
