//! Identifier system for battle participants and effects.
//!
//! Every creature on the field has a stable `CreatureId`, and every timed
//! effect attached to a creature has a unique `EffectId`.
//!
//! ## Allocation
//!
//! IDs come from an explicit [`IdGenerator`] owned by the battle, never from
//! wall-clock time. Effects created within the same instant (a death rattle
//! broadcast to a full roster, for example) still get distinct IDs, and a
//! battle replayed from the same starting counter produces the same IDs.
//!
//! ```
//! use creature_clash::core::IdGenerator;
//!
//! let mut ids = IdGenerator::new();
//! let a = ids.next_effect();
//! let b = ids.next_effect();
//! assert_ne!(a, b);
//! assert!(b.raw() > a.raw());
//! ```

use serde::{Deserialize, Serialize};

/// Stable identifier for a creature.
///
/// Used for caster back-references on effects and for routing
/// drain credits to the right creature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreatureId(pub u32);

impl CreatureId {
    /// Create a creature ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for CreatureId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CreatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Creature({})", self.0)
    }
}

/// Unique identifier for a timed effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EffectId(pub u64);

impl EffectId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EffectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Effect({})", self.0)
    }
}

/// Monotonic per-battle ID allocator.
///
/// Creature and effect counters are independent so that spawning a
/// creature never shifts the effect ID sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdGenerator {
    next_creature: u32,
    next_effect: u64,
}

impl IdGenerator {
    /// Create a generator starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator that resumes from saved counters.
    #[must_use]
    pub fn resume(next_creature: u32, next_effect: u64) -> Self {
        Self {
            next_creature,
            next_effect,
        }
    }

    /// Allocate the next creature ID.
    pub fn next_creature(&mut self) -> CreatureId {
        let id = CreatureId(self.next_creature);
        self.next_creature += 1;
        id
    }

    /// Allocate the next effect ID.
    pub fn next_effect(&mut self) -> EffectId {
        let id = EffectId(self.next_effect);
        self.next_effect += 1;
        id
    }

    /// Number of effect IDs handed out so far.
    #[must_use]
    pub fn effects_allocated(&self) -> u64 {
        self.next_effect
    }
}
