//! Timed effects.
//!
//! - `Effect`: a timed modifier attached to one creature
//! - `EffectKind`: closed set of kinds, each carrying only its own parameters
//! - `EffectCatalog`: maps tools and spells to effect descriptors
//! - `lifecycle`: the once-per-turn advance, reachable only from the turn
//!   orchestrator
//!
//! Effects are created by action resolvers and the defeat handler, advanced
//! and expired by the lifecycle pass, and folded into stats by the aggregator.

mod catalog;
mod effect;
pub(crate) mod lifecycle;

pub use catalog::{
    CatalogItem, EffectCatalog, EffectDescriptor, EffectFamily, Spell, SpellType, StandardCatalog,
    Tool, ToolType,
};
pub use effect::{
    ChargeChannel, ChargeParams, EchoParams, Effect, EffectKind, EffectOrigin, PerTurn, PowerLevel,
};
