//! Core engine types: identifiers, RNG, configuration, diagnostics.
//!
//! This module contains the building blocks shared by every other module.
//! Nothing here knows about creatures or effects.

pub mod id;
pub mod rng;
pub mod config;
pub mod error;

pub use id::{CreatureId, EffectId, IdGenerator};
pub use rng::{FixedRolls, GameRng, GameRngState, RandomSource};
pub use config::{BattleConfig, Difficulty, DifficultyProfile};
pub use error::CombatError;
