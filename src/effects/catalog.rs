//! Effect catalog: what tools and spells do.
//!
//! The battle core never hardcodes item behavior. It asks an
//! [`EffectCatalog`] for a structured [`EffectDescriptor`] and a power
//! multiplier, then applies them. Games ship their own catalog or use
//! [`StandardCatalog`], which derives descriptors from an item's effect
//! family, type, and potency.
//!
//! ## Catalog misses
//!
//! An unrecognized family tag parses to [`EffectFamily::Neutral`], which maps
//! to a neutral descriptor (no deltas, no health change). A catalog that has
//! nothing at all for an item returns `None`, and resolvers treat that as a
//! no-op.

use serde::{Deserialize, Serialize};
use smallvec::smallvec;

use crate::core::Difficulty;
use crate::creature::{BaseStats, Stat, StatMods};

use super::effect::{ChargeChannel, ChargeParams, EchoParams};

/// Behavior family shared by tools and spells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectFamily {
    Surge,
    Shield,
    Echo,
    Drain,
    Charge,
    /// Fallback for unrecognized tags.
    Neutral,
}

impl EffectFamily {
    /// Parse a family tag. Unknown tags fall back to `Neutral`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "surge" => EffectFamily::Surge,
            "shield" => EffectFamily::Shield,
            "echo" => EffectFamily::Echo,
            "drain" => EffectFamily::Drain,
            "charge" => EffectFamily::Charge,
            _ => EffectFamily::Neutral,
        }
    }
}

/// Which stats a tool leans on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolType {
    #[default]
    Physical,
    Magical,
    Defensive,
    Utility,
}

impl ToolType {
    fn stats(self) -> &'static [Stat] {
        match self {
            ToolType::Physical => &[Stat::PhysicalAttack],
            ToolType::Magical => &[Stat::MagicalAttack],
            ToolType::Defensive => &[Stat::PhysicalDefense, Stat::MagicalDefense],
            ToolType::Utility => &[Stat::Initiative, Stat::DodgeChance],
        }
    }
}

/// What a spell is for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpellType {
    #[default]
    Offensive,
    Restorative,
    Support,
}

/// A tool card, used on one's own creature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    pub family: EffectFamily,
    pub tool_type: ToolType,
    pub potency: i32,
}

impl Tool {
    pub fn new(
        name: impl Into<String>,
        family: EffectFamily,
        tool_type: ToolType,
        potency: i32,
    ) -> Self {
        Self {
            name: name.into(),
            family,
            tool_type,
            potency,
        }
    }
}

/// A spell card, cast by one creature on a target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    pub name: String,
    pub family: EffectFamily,
    pub spell_type: SpellType,
    pub potency: i32,
}

impl Spell {
    pub fn new(
        name: impl Into<String>,
        family: EffectFamily,
        spell_type: SpellType,
        potency: i32,
    ) -> Self {
        Self {
            name: name.into(),
            family,
            spell_type,
            potency,
        }
    }
}

/// An item whose power is being computed.
#[derive(Clone, Copy, Debug)]
pub enum CatalogItem<'a> {
    Tool(&'a Tool),
    Spell(&'a Spell),
}

/// Structured description of what an item does.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectDescriptor {
    pub family: Option<EffectFamily>,
    /// Stat deltas on the target, every turn the effect is active.
    pub stat_changes: StatMods,
    /// Stat deltas mirrored onto the caster.
    pub self_stat_changes: StatMods,
    /// Instant healing applied by a tool.
    pub health_change: i32,
    /// Instant damage (duration-0 spells).
    pub damage: i32,
    /// Instant healing (duration-0 spells).
    pub healing: i32,
    pub damage_over_time: i32,
    pub healing_over_time: i32,
    pub self_heal_over_time: i32,
    /// Turns the effect lasts. 0 means instant.
    pub duration: u32,
    pub charge: Option<ChargeParams>,
    pub echo: Option<EchoParams>,
}

impl EffectDescriptor {
    /// No deltas, no health change, lasting one turn.
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            family: Some(EffectFamily::Neutral),
            duration: 1,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_instant(&self) -> bool {
        self.duration == 0
    }
}

/// Source of tool/spell effects and their power scaling.
pub trait EffectCatalog {
    /// Descriptor for a tool, or `None` if the catalog has nothing for it.
    fn tool_effect(&self, tool: &Tool) -> Option<EffectDescriptor>;

    /// Descriptor for a spell cast with the given caster magic.
    fn spell_effect(&self, spell: &Spell, caster_magic: i32) -> Option<EffectDescriptor>;

    /// Power multiplier (≥ 0) for an item used by a caster with these stats.
    fn effect_power(
        &self,
        item: CatalogItem<'_>,
        caster: &BaseStats,
        difficulty: Difficulty,
    ) -> f64;
}

/// Catalog that derives descriptors from family, type and potency.
///
/// Items with potency ≤ 0 are inert and produce no descriptor.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardCatalog;

impl StandardCatalog {
    fn stat_spread(stats: &[Stat], amount: i32) -> StatMods {
        stats.iter().map(|&s| (s, amount)).collect()
    }

    fn difficulty_factor(difficulty: Difficulty) -> f64 {
        match difficulty {
            Difficulty::Easy => 1.1,
            Difficulty::Medium => 1.0,
            Difficulty::Hard => 0.95,
            Difficulty::Expert => 0.9,
        }
    }
}

impl EffectCatalog for StandardCatalog {
    fn tool_effect(&self, tool: &Tool) -> Option<EffectDescriptor> {
        if tool.potency <= 0 {
            return None;
        }
        let p = tool.potency;
        let spread = Self::stat_spread(tool.tool_type.stats(), p);

        let descriptor = match tool.family {
            EffectFamily::Surge => EffectDescriptor {
                family: Some(EffectFamily::Surge),
                stat_changes: spread,
                duration: 2,
                ..EffectDescriptor::default()
            },
            EffectFamily::Shield => EffectDescriptor {
                family: Some(EffectFamily::Shield),
                stat_changes: Self::stat_spread(&[Stat::PhysicalDefense, Stat::MagicalDefense], p),
                health_change: p,
                duration: 3,
                ..EffectDescriptor::default()
            },
            EffectFamily::Echo => EffectDescriptor {
                family: Some(EffectFamily::Echo),
                stat_changes: spread,
                echo: Some(EchoParams {
                    healing_base: 5,
                    ..EchoParams::default()
                }),
                duration: 3,
                ..EffectDescriptor::default()
            },
            EffectFamily::Drain => EffectDescriptor {
                family: Some(EffectFamily::Drain),
                stat_changes: StatMods::new().with(Stat::MagicalAttack, (p / 2).max(1)),
                healing_over_time: (p / 2).max(1),
                duration: 3,
                ..EffectDescriptor::default()
            },
            EffectFamily::Charge => {
                let targets = match tool.tool_type {
                    ToolType::Physical => smallvec![Stat::PhysicalAttack],
                    ToolType::Magical => smallvec![Stat::MagicalAttack],
                    _ => smallvec![Stat::PhysicalDefense],
                };
                EffectDescriptor {
                    family: Some(EffectFamily::Charge),
                    charge: Some(ChargeParams {
                        channel: ChargeChannel::Stats(targets),
                        base_value: 5,
                        per_turn_increase: 5,
                        final_burst: 20,
                        max_turns: 2,
                    }),
                    duration: 2,
                    ..EffectDescriptor::default()
                }
            }
            EffectFamily::Neutral => EffectDescriptor::neutral(),
        };
        Some(descriptor)
    }

    fn spell_effect(&self, spell: &Spell, caster_magic: i32) -> Option<EffectDescriptor> {
        if spell.potency <= 0 {
            return None;
        }
        let p = spell.potency;
        let m = caster_magic.max(0);

        let descriptor = match (spell.family, spell.spell_type) {
            (EffectFamily::Surge, SpellType::Offensive) => EffectDescriptor {
                family: Some(EffectFamily::Surge),
                damage: p + m / 2,
                duration: 0,
                ..EffectDescriptor::default()
            },
            (EffectFamily::Surge, SpellType::Restorative) => EffectDescriptor {
                family: Some(EffectFamily::Surge),
                healing: p + m / 2,
                duration: 0,
                ..EffectDescriptor::default()
            },
            (EffectFamily::Surge, SpellType::Support) => EffectDescriptor {
                family: Some(EffectFamily::Surge),
                stat_changes: Self::stat_spread(
                    &[Stat::PhysicalAttack, Stat::MagicalAttack],
                    (p / 2).max(1),
                ),
                duration: 2,
                ..EffectDescriptor::default()
            },
            (EffectFamily::Shield, spell_type) => EffectDescriptor {
                family: Some(EffectFamily::Shield),
                stat_changes: Self::stat_spread(
                    &[Stat::PhysicalDefense, Stat::MagicalDefense],
                    (p / 2).max(1),
                ),
                healing_over_time: if spell_type == SpellType::Restorative {
                    (p / 3).max(1)
                } else {
                    0
                },
                duration: 3,
                ..EffectDescriptor::default()
            },
            (EffectFamily::Echo, spell_type) => {
                let echo = match spell_type {
                    SpellType::Offensive => EchoParams {
                        damage_base: p,
                        ..EchoParams::default()
                    },
                    SpellType::Restorative => EchoParams {
                        healing_base: p,
                        ..EchoParams::default()
                    },
                    SpellType::Support => EchoParams {
                        stat_base: Self::stat_spread(
                            &[Stat::PhysicalAttack, Stat::MagicalAttack],
                            (p / 2).max(1),
                        ),
                        ..EchoParams::default()
                    },
                };
                EffectDescriptor {
                    family: Some(EffectFamily::Echo),
                    echo: Some(echo),
                    duration: 3,
                    ..EffectDescriptor::default()
                }
            }
            (EffectFamily::Drain, _) => {
                let drain = (p / 2 + m / 5).max(1);
                EffectDescriptor {
                    family: Some(EffectFamily::Drain),
                    stat_changes: StatMods::new().with(Stat::MagicalDefense, -2),
                    self_stat_changes: StatMods::new().with(Stat::MagicalAttack, 2),
                    damage_over_time: drain,
                    self_heal_over_time: (drain / 2).max(1),
                    duration: 3,
                    ..EffectDescriptor::default()
                }
            }
            (EffectFamily::Charge, spell_type) => {
                let charge = match spell_type {
                    SpellType::Offensive => ChargeParams {
                        channel: ChargeChannel::Damage,
                        base_value: 10,
                        per_turn_increase: 10,
                        final_burst: 35,
                        max_turns: 2,
                    },
                    SpellType::Restorative => ChargeParams {
                        channel: ChargeChannel::Healing,
                        base_value: 5,
                        per_turn_increase: 5,
                        final_burst: 20,
                        max_turns: 2,
                    },
                    SpellType::Support => ChargeParams {
                        channel: ChargeChannel::Stats(smallvec![
                            Stat::PhysicalAttack,
                            Stat::MagicalAttack
                        ]),
                        base_value: 3,
                        per_turn_increase: 3,
                        final_burst: 12,
                        max_turns: 2,
                    },
                };
                EffectDescriptor {
                    family: Some(EffectFamily::Charge),
                    charge: Some(charge),
                    duration: 2,
                    ..EffectDescriptor::default()
                }
            }
            (EffectFamily::Neutral, _) => EffectDescriptor {
                duration: 0,
                ..EffectDescriptor::neutral()
            },
        };
        Some(descriptor)
    }

    fn effect_power(
        &self,
        item: CatalogItem<'_>,
        caster: &BaseStats,
        difficulty: Difficulty,
    ) -> f64 {
        let base = match item {
            CatalogItem::Tool(_) => 1.0 + f64::from(caster.energy.max(0)) * 0.01,
            CatalogItem::Spell(_) => 1.0 + f64::from(caster.magic.max(0)) * 0.02,
        };
        (base.min(2.0) * Self::difficulty_factor(difficulty)).max(0.0)
    }
}
