//! Creatures and their stats.
//!
//! - `Creature`: a combat participant with raw attributes, derived stats,
//!   health, and attached effects
//! - `StatDeriver`: pluggable base-stat formulas
//! - `derive_stats`: the aggregator that folds effects onto base stats

mod model;
mod stats;
mod derive;

pub use model::{Creature, Element, Rarity};
pub use stats::{Attribute, BaseStats, BattleStats, Stat, StatMods};
pub use derive::{derive_stats, form_multiplier, refresh_stats, StandardStatDeriver, StatDeriver};
