//! Defeat handling: removing dead creatures and their parting effects.
//!
//! ## Death rattles
//!
//! A dead creature grants at most one rattle to its surviving allies, picked
//! in priority order:
//!
//! | Condition           | Effect                                   | Turns |
//! |---------------------|------------------------------------------|-------|
//! | Legendary           | "{species}'s Final Gift", +2 PA / +2 MA  | 5     |
//! | Energy specialist   | "Energy Release", energy cost −1         | 2     |
//! | Epic                | "Epic Essence", +1 PA / +1 MA            | 3     |
//!
//! Separately, a Legendary or Epic death leaves the opposing survivors with
//! "Guilty Conscience" (initiative −2, dodge −1) for 2 turns.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::{CreatureId, IdGenerator};
use crate::creature::{refresh_stats, Attribute, Creature, Rarity, Stat, StatDeriver, StatMods};
use crate::effects::{Effect, EffectKind, EffectOrigin};

use super::state::{BattleState, Side};

/// Parting gift a dead creature leaves its allies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathRattle {
    FinalGift,
    EnergyRelease,
    EpicEssence,
}

impl DeathRattle {
    /// Rattle triggered by this creature's death, if any.
    #[must_use]
    pub fn for_creature(creature: &Creature) -> Option<Self> {
        if creature.rarity == Rarity::Legendary {
            Some(DeathRattle::FinalGift)
        } else if creature.is_specialist(Attribute::Energy) {
            Some(DeathRattle::EnergyRelease)
        } else if creature.rarity == Rarity::Epic {
            Some(DeathRattle::EpicEssence)
        } else {
            None
        }
    }

    /// The effect one surviving ally receives.
    #[must_use]
    pub fn effect(self, fallen: &Creature, ids: &mut IdGenerator, turn: u32) -> Effect {
        let (name, kind, mods, duration) = match self {
            DeathRattle::FinalGift => (
                format!("{}'s Final Gift", fallen.species_name),
                EffectKind::Blessing,
                StatMods::new()
                    .with(Stat::PhysicalAttack, 2)
                    .with(Stat::MagicalAttack, 2),
                5,
            ),
            DeathRattle::EnergyRelease => (
                "Energy Release".to_string(),
                EffectKind::EnergyBurst,
                StatMods::new().with(Stat::EnergyCost, -1),
                2,
            ),
            DeathRattle::EpicEssence => (
                "Epic Essence".to_string(),
                EffectKind::Blessing,
                StatMods::new()
                    .with(Stat::PhysicalAttack, 1)
                    .with(Stat::MagicalAttack, 1),
                3,
            ),
        };
        Effect::new(ids.next_effect(), name, kind, EffectOrigin::DeathRattle, duration, turn)
            .with_stat_modifications(mods)
            .with_caster(fallen.id)
    }
}

/// Whether a fallen creature curses the opposing side.
#[must_use]
pub fn triggers_revenge(creature: &Creature) -> bool {
    matches!(creature.rarity, Rarity::Legendary | Rarity::Epic)
}

/// Debuff the opposing survivors receive.
#[must_use]
pub fn revenge_effect(fallen: &Creature, ids: &mut IdGenerator, turn: u32) -> Effect {
    Effect::new(
        ids.next_effect(),
        "Guilty Conscience",
        EffectKind::Debuff,
        EffectOrigin::Revenge,
        2,
        turn,
    )
    .with_stat_modifications(
        StatMods::new()
            .with(Stat::Initiative, -2)
            .with(Stat::DodgeChance, -1),
    )
    .with_caster(fallen.id)
}

/// One creature removed by the sweep.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Defeat {
    pub side: Side,
    pub creature: CreatureId,
    pub species: String,
    pub rarity: Rarity,
    pub rattle: Option<DeathRattle>,
    pub revenge: bool,
}

fn is_dead(creature: &Creature) -> bool {
    creature.battle_stats.is_some() && creature.current_health <= 0
}

/// Remove dead creatures from both fields and hand out their effects.
///
/// Both fields are partitioned before anything is granted, so every
/// survivor receives every broadcast regardless of roster order.
pub(crate) fn sweep_defeated(
    state: &mut BattleState,
    deriver: &dyn StatDeriver,
    ids: &mut IdGenerator,
    combination_step: f64,
) -> Vec<Defeat> {
    let mut fallen: Vec<(Side, Creature)> = Vec::new();
    for side in Side::BOTH {
        let field = &mut state.side_mut(side).field;
        let (dead, alive): (Vec<_>, Vec<_>) = field.iter().cloned().partition(is_dead);
        if !dead.is_empty() {
            *field = alive.into_iter().collect();
            fallen.extend(dead.into_iter().map(|c| (side, c)));
        }
    }

    let turn = state.turn;
    let mut defeats = Vec::with_capacity(fallen.len());
    for (side, creature) in &fallen {
        let rattle = DeathRattle::for_creature(creature);
        let revenge = triggers_revenge(creature);

        if let Some(rattle) = rattle {
            for ally in state.side_mut(*side).field.iter_mut() {
                ally.active_effects.push(rattle.effect(creature, ids, turn));
            }
        }
        if revenge {
            for foe in state.side_mut(side.opponent()).field.iter_mut() {
                foe.active_effects.push(revenge_effect(creature, ids, turn));
            }
        }

        info!(
            creature = %creature.id,
            species = %creature.species_name,
            rarity = %creature.rarity,
            side = %side,
            rattle = ?rattle,
            revenge,
            "Creature defeated"
        );
        defeats.push(Defeat {
            side: *side,
            creature: creature.id,
            species: creature.species_name.clone(),
            rarity: creature.rarity,
            rattle,
            revenge,
        });
    }

    if !defeats.is_empty() {
        for side in Side::BOTH {
            for survivor in state.side_mut(side).field.iter_mut() {
                refresh_stats(survivor, deriver, combination_step);
            }
        }
    }
    defeats
}
