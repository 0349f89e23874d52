//! Battle flow: state, turn upkeep, defeats, and the engine facade.
//!
//! - `BattleState`: both sides' fields, energy, hands and decks
//! - `resolve_turn`: regen, effect pass, defeat sweep, draw
//! - `CombatEngine`: owns the collaborators and exposes every operation
//!
//! The effect lifecycle is only reachable through `resolve_turn`, so each
//! creature's effects advance exactly once per turn.

mod analysis;
mod defeat;
mod engine;
mod state;
mod synergy;
mod turn;

pub use analysis::{
    charge_progress, creature_power, energy_efficiency, ActionKind, ChargeProgress, EnergyMomentum,
};
pub use defeat::{revenge_effect, triggers_revenge, DeathRattle, Defeat};
pub use engine::{CombatEngine, CombatEngineBuilder};
pub use state::{BattleState, Card, Side, SideState};
pub use synergy::{apply_field_synergies, FIELD_SYNERGY};
pub use turn::{energy_regen, max_energy, max_hand_size, resolve_turn, TurnReport};
