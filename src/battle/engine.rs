//! `CombatEngine`: one battle's collaborators behind a single facade.
//!
//! The engine owns the catalog, stat deriver, combat math, RNG and id
//! generator, and lends them to the resolvers one call at a time. State is
//! never stored here: every method takes the current creatures or battle
//! state and returns new values.
//!
//! ```ignore
//! let mut engine = CombatEngine::builder().seed(7).build();
//! let (state, report) = engine.resolve_turn(&state, Difficulty::Hard);
//! ```

use im::Vector;

use crate::combat::{
    self, AttackKind, AttackOutcome, CombatMath, DefendOutcome, ResolverContext, SpellOutcome,
    StandardCombatMath, Synergy, ToolOutcome,
};
use crate::core::{BattleConfig, CombatError, Difficulty, GameRng, IdGenerator, RandomSource};
use crate::creature::{self as creatures, BattleStats, Creature, StandardStatDeriver, StatDeriver};
use crate::effects::{EffectCatalog, Spell, StandardCatalog, Tool};

use super::state::BattleState;
use super::synergy;
use super::turn::{self, TurnReport};

/// Facade over the battle core for one battle.
pub struct CombatEngine {
    catalog: Box<dyn EffectCatalog>,
    deriver: Box<dyn StatDeriver>,
    math: Box<dyn CombatMath>,
    rng: Box<dyn RandomSource>,
    ids: IdGenerator,
    config: BattleConfig,
}

impl CombatEngine {
    #[must_use]
    pub fn builder() -> CombatEngineBuilder {
        CombatEngineBuilder::new()
    }

    #[must_use]
    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Id generator, for minting creatures that join mid-battle.
    pub fn ids_mut(&mut self) -> &mut IdGenerator {
        &mut self.ids
    }

    fn context(&mut self, difficulty: Difficulty) -> ResolverContext<'_> {
        ResolverContext {
            catalog: self.catalog.as_ref(),
            deriver: self.deriver.as_ref(),
            math: self.math.as_ref(),
            rng: self.rng.as_mut(),
            ids: &mut self.ids,
            config: &self.config,
            difficulty,
        }
    }

    /// Run upkeep for the next turn.
    pub fn resolve_turn(
        &mut self,
        state: &BattleState,
        difficulty: Difficulty,
    ) -> (BattleState, TurnReport) {
        turn::resolve_turn(state, difficulty, self.deriver.as_ref(), &mut self.ids, &self.config)
    }

    /// `kind: None` picks whichever attack stat is higher.
    pub fn resolve_attack(
        &mut self,
        attacker: &Creature,
        defender: &Creature,
        kind: Option<AttackKind>,
        combo_level: u32,
        difficulty: Difficulty,
    ) -> AttackOutcome {
        let mut ctx = self.context(difficulty);
        combat::resolve_attack(attacker, defender, kind, combo_level, &mut ctx)
    }

    pub fn apply_tool(
        &mut self,
        creature: &Creature,
        tool: &Tool,
        current_turn: u32,
        difficulty: Difficulty,
    ) -> ToolOutcome {
        let mut ctx = self.context(difficulty);
        combat::apply_tool(creature, tool, current_turn, &mut ctx)
    }

    pub fn apply_spell(
        &mut self,
        caster: &Creature,
        target: &Creature,
        spell: &Spell,
        current_turn: u32,
        difficulty: Difficulty,
    ) -> Result<SpellOutcome, CombatError> {
        let mut ctx = self.context(difficulty);
        combat::apply_spell(caster, target, spell, current_turn, &mut ctx)
    }

    pub fn defend(&mut self, creature: &Creature, difficulty: Difficulty) -> DefendOutcome {
        let mut ctx = self.context(difficulty);
        combat::defend(creature, &mut ctx)
    }

    /// Current stats of `creature` from its attributes and active effects.
    #[must_use]
    pub fn derive_stats(&self, creature: &Creature) -> Option<BattleStats> {
        creatures::derive_stats(creature, self.deriver.as_ref(), self.config.combination_step)
    }

    /// Replace a roster's synergy blessings for `turn`.
    pub fn apply_field_synergies(
        &mut self,
        roster: &Vector<Creature>,
        turn: u32,
    ) -> (Vector<Creature>, Vec<Synergy>) {
        synergy::apply_field_synergies(
            roster,
            self.math.as_ref(),
            self.deriver.as_ref(),
            &mut self.ids,
            self.config.combination_step,
            turn,
        )
    }
}

/// Builder for [`CombatEngine`]. Unset collaborators use the stock ones.
#[derive(Default)]
pub struct CombatEngineBuilder {
    catalog: Option<Box<dyn EffectCatalog>>,
    deriver: Option<Box<dyn StatDeriver>>,
    math: Option<Box<dyn CombatMath>>,
    rng: Option<Box<dyn RandomSource>>,
    ids: Option<IdGenerator>,
    config: BattleConfig,
}

impl CombatEngineBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn catalog(mut self, catalog: impl EffectCatalog + 'static) -> Self {
        self.catalog = Some(Box::new(catalog));
        self
    }

    #[must_use]
    pub fn deriver(mut self, deriver: impl StatDeriver + 'static) -> Self {
        self.deriver = Some(Box::new(deriver));
        self
    }

    #[must_use]
    pub fn math(mut self, math: impl CombatMath + 'static) -> Self {
        self.math = Some(Box::new(math));
        self
    }

    /// Random source; defaults to a `GameRng` seeded from the config.
    #[must_use]
    pub fn rng(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    #[must_use]
    pub fn ids(mut self, ids: IdGenerator) -> Self {
        self.ids = Some(ids);
        self
    }

    #[must_use]
    pub fn config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    #[must_use]
    pub fn build(self) -> CombatEngine {
        let seed = self.config.seed;
        CombatEngine {
            catalog: self.catalog.unwrap_or_else(|| Box::new(StandardCatalog)),
            deriver: self.deriver.unwrap_or_else(|| Box::new(StandardStatDeriver)),
            math: self.math.unwrap_or_else(|| Box::new(StandardCombatMath)),
            rng: self.rng.unwrap_or_else(|| Box::new(GameRng::new(seed))),
            ids: self.ids.unwrap_or_default(),
            config: self.config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::state::SideState;
    use crate::core::{CreatureId, FixedRolls};
    use crate::creature::{refresh_stats, BaseStats, Rarity};

    fn creature(id: u32) -> Creature {
        let stats = BaseStats::new(10, 10, 10, 10, 10);
        let mut c = Creature::new(CreatureId(id), "Mossling", Rarity::Common, stats);
        refresh_stats(&mut c, &StandardStatDeriver, 0.08);
        c.current_health = c.max_health();
        c
    }

    #[test]
    fn test_builder_defaults() {
        let engine = CombatEngine::builder().seed(99).build();
        assert_eq!(engine.config().seed, 99);
        let stats = engine.derive_stats(&creature(1)).unwrap();
        assert_eq!(stats.physical_attack, 30);
    }

    #[test]
    fn test_engine_turn_and_actions() {
        let mut engine = CombatEngine::builder().rng(FixedRolls::constant(0.99)).build();
        let state = BattleState::new(
            SideState::new().with_field([creature(1)]),
            SideState::new().with_field([creature(2)]),
        );
        let (state, report) = engine.resolve_turn(&state, Difficulty::Medium);
        assert_eq!(report.turn, 1);

        let (ours, theirs) = (&state.player.field[0], &state.enemy.field[0]);
        let attack = engine.resolve_attack(ours, theirs, None, 1, Difficulty::Medium);
        assert!(attack.damage() > 0);
        assert!(attack.defender.current_health < 100);

        let stance = engine.defend(&state.player.field[0], Difficulty::Hard);
        assert!(stance.creature.is_defending);
    }
}
