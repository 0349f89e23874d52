//! Collaborators handed to action resolvers.

use crate::core::{BattleConfig, Difficulty, IdGenerator, RandomSource};
use crate::creature::{refresh_stats, Creature, StatDeriver};
use crate::effects::EffectCatalog;

use super::math::CombatMath;

/// Everything an action resolver may consult or consume.
///
/// Resolvers never hold on to the context; the engine builds one per call.
pub struct ResolverContext<'a> {
    pub catalog: &'a dyn EffectCatalog,
    pub deriver: &'a dyn StatDeriver,
    pub math: &'a dyn CombatMath,
    pub rng: &'a mut dyn RandomSource,
    pub ids: &'a mut IdGenerator,
    pub config: &'a BattleConfig,
    pub difficulty: Difficulty,
}

impl ResolverContext<'_> {
    /// Re-run the stat aggregator on a creature.
    pub fn refresh(&self, creature: &mut Creature) -> bool {
        refresh_stats(creature, self.deriver, self.config.combination_step)
    }
}
