//! Combat math and action resolvers.
//!
//! - `CombatMath`: damage, combo, rarity/form multipliers, synergies
//! - `resolve_attack`, `apply_tool`, `apply_spell`, `defend`: the action
//!   resolvers
//!
//! Resolvers take their inputs by reference and return new creatures in an
//! outcome value. Nothing they are given is mutated, so callers can keep the
//! previous snapshot for logging or animation.

mod attack;
mod context;
mod defend;
mod math;
mod spell;
mod tool;

pub use attack::{resolve_attack, AttackOutcome};
pub use context::ResolverContext;
pub use defend::{defend, DefendOutcome, STANCE_DURATION};
pub use math::{
    AttackKind, CombatMath, DamageResult, DamageType, Effectiveness, StandardCombatMath, Synergy,
};
pub use spell::{apply_spell, SpellOutcome};
pub use tool::{apply_tool, ToolOutcome};
