//! Effect definitions.
//!
//! An effect is a timed modifier attached to exactly one creature. Each turn
//! it is active it contributes stat deltas and/or health deltas; when its
//! duration runs out it is removed.
//!
//! ## Kinds
//!
//! `EffectKind` is a closed set. Each variant carries only the parameters it
//! needs:
//! - `Standard`, `Blessing`, `Debuff`, `EnergyBurst`: static stat deltas and
//!   static per-turn health amounts
//! - `Drain`: static amounts, with `self_heal` credited to the caster
//! - `Defense`: static stance bonus plus a damage-reduction fraction
//! - `Charge`: a value that ramps each turn and ends in a one-time burst
//! - `Echo`: values that decay geometrically each turn

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{CreatureId, EffectId};
use crate::creature::{Stat, StatMods};

/// Per-turn health amounts for effects with static magnitudes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerTurn {
    /// Damage dealt to the owning creature.
    pub damage: i32,
    /// Healing restored to the owning creature.
    pub healing: i32,
    /// Healing credited to the caster.
    pub self_heal: i32,
}

impl PerTurn {
    #[must_use]
    pub const fn damage(amount: i32) -> Self {
        Self {
            damage: amount,
            healing: 0,
            self_heal: 0,
        }
    }

    #[must_use]
    pub const fn healing(amount: i32) -> Self {
        Self {
            damage: 0,
            healing: amount,
            self_heal: 0,
        }
    }

    #[must_use]
    pub const fn drain(damage: i32, self_heal: i32) -> Self {
        Self {
            damage,
            healing: 0,
            self_heal,
        }
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.damage == 0 && self.healing == 0 && self.self_heal == 0
    }
}

/// What a Charge effect ramps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargeChannel {
    /// Each listed stat receives the charge value.
    Stats(SmallVec<[Stat; 2]>),
    /// The charge value is dealt as damage to the owner.
    Damage,
    /// The charge value heals the owner.
    Healing,
}

/// Ramp parameters for a Charge effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeParams {
    pub channel: ChargeChannel,
    pub base_value: i32,
    pub per_turn_increase: i32,
    /// Value on the terminal turn; replaces the ramp value.
    pub final_burst: i32,
    pub max_turns: u32,
}

impl ChargeParams {
    /// Value on a given elapsed turn, and whether it is the final burst.
    #[must_use]
    pub fn value_at(&self, turns_elapsed: u32) -> (i32, bool) {
        if turns_elapsed >= self.max_turns {
            (self.final_burst, true)
        } else {
            let ramp = self.base_value + self.per_turn_increase * turns_elapsed as i32;
            (ramp, false)
        }
    }

    /// Multiply every magnitude, rounding to nearest.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        let s = |v: i32| (f64::from(v) * factor).round() as i32;
        Self {
            channel: self.channel.clone(),
            base_value: s(self.base_value),
            per_turn_increase: s(self.per_turn_increase),
            final_burst: s(self.final_burst),
            max_turns: self.max_turns,
        }
    }
}

/// Decay parameters for an Echo effect. Each channel decays at its own rate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EchoParams {
    pub stat_base: StatMods,
    pub stat_decay: f64,
    pub damage_base: i32,
    pub damage_decay: f64,
    pub healing_base: i32,
    pub healing_decay: f64,
    pub self_heal_base: i32,
    pub self_heal_decay: f64,
}

impl Default for EchoParams {
    fn default() -> Self {
        Self {
            stat_base: StatMods::new(),
            stat_decay: Self::DEFAULT_DECAY,
            damage_base: 0,
            damage_decay: Self::DEFAULT_DECAY,
            healing_base: 0,
            healing_decay: Self::DEFAULT_DECAY,
            self_heal_base: 0,
            self_heal_decay: Self::DEFAULT_DECAY,
        }
    }
}

impl EchoParams {
    pub const DEFAULT_DECAY: f64 = 0.7;

    /// `base × rate^elapsed`, truncated toward zero.
    #[must_use]
    pub fn decay(base: i32, rate: f64, turns_elapsed: u32) -> i32 {
        let exponent = i32::try_from(turns_elapsed).unwrap_or(i32::MAX);
        (f64::from(base) * rate.powi(exponent)).trunc() as i32
    }

    /// Multiply every base magnitude, rounding to nearest. Rates are kept.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        let s = |v: i32| (f64::from(v) * factor).round() as i32;
        Self {
            stat_base: self.stat_base.scaled(factor),
            damage_base: s(self.damage_base),
            healing_base: s(self.healing_base),
            self_heal_base: s(self.self_heal_base),
            ..self.clone()
        }
    }
}

/// Closed set of effect kinds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EffectKind {
    Standard,
    Defense { damage_reduction: f64 },
    Charge(ChargeParams),
    Echo(EchoParams),
    Drain,
    EnergyBurst,
    Blessing,
    Debuff,
}

impl EffectKind {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            EffectKind::Standard => "standard",
            EffectKind::Defense { .. } => "defense",
            EffectKind::Charge(_) => "charge",
            EffectKind::Echo(_) => "echo",
            EffectKind::Drain => "drain",
            EffectKind::EnergyBurst => "energy_burst",
            EffectKind::Blessing => "blessing",
            EffectKind::Debuff => "debuff",
        }
    }
}

/// Why an effect was attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectOrigin {
    Tool,
    Spell,
    /// Mirrored onto the caster of a spell.
    SpellSelf,
    /// Defensive stance.
    Stance,
    /// Debuff left by an attack.
    OnHit,
    DeathRattle,
    Revenge,
    Synergy,
}

/// Coarse strength bucket of a tool effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerLevel {
    Weak,
    Normal,
    Strong,
}

impl PowerLevel {
    /// Bucket a power multiplier (≥1.3 strong, ≥1.1 normal).
    #[must_use]
    pub fn from_multiplier(multiplier: f64) -> Self {
        if multiplier >= 1.3 {
            PowerLevel::Strong
        } else if multiplier >= 1.1 {
            PowerLevel::Normal
        } else {
            PowerLevel::Weak
        }
    }
}

/// A timed modifier attached to one creature.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub id: EffectId,
    pub name: String,
    pub kind: EffectKind,
    pub origin: EffectOrigin,
    /// This turn's stat deltas. Recomputed each turn for Charge and Echo.
    pub stat_modifications: StatMods,
    /// Static per-turn health amounts. Unused by Charge and Echo.
    pub per_turn: PerTurn,
    /// Turns remaining.
    pub duration: u32,
    pub start_turn: u32,
    /// Creature that cast this effect (lookup only).
    pub caster_id: Option<CreatureId>,
    pub power_level: Option<PowerLevel>,
}

impl Effect {
    /// Create an effect with no modifications.
    pub fn new(
        id: EffectId,
        name: impl Into<String>,
        kind: EffectKind,
        origin: EffectOrigin,
        duration: u32,
        start_turn: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            origin,
            stat_modifications: StatMods::new(),
            per_turn: PerTurn::default(),
            duration,
            start_turn,
            caster_id: None,
            power_level: None,
        }
    }

    #[must_use]
    pub fn with_stat_modifications(mut self, mods: StatMods) -> Self {
        self.stat_modifications = mods;
        self
    }

    #[must_use]
    pub fn with_per_turn(mut self, per_turn: PerTurn) -> Self {
        self.per_turn = per_turn;
        self
    }

    #[must_use]
    pub fn with_caster(mut self, caster: CreatureId) -> Self {
        self.caster_id = Some(caster);
        self
    }

    #[must_use]
    pub fn with_power_level(mut self, level: PowerLevel) -> Self {
        self.power_level = Some(level);
        self
    }

    #[must_use]
    pub fn is_defense(&self) -> bool {
        matches!(self.kind, EffectKind::Defense { .. })
    }

    /// Turns elapsed since the effect started, as of `current_turn`.
    #[must_use]
    pub fn turns_elapsed(&self, current_turn: u32) -> u32 {
        current_turn.saturating_sub(self.start_turn)
    }
}
