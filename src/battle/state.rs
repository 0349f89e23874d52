//! Battle state: both rosters, energy pools, hands and decks.
//!
//! Rosters, hands and decks are `im::Vector`s, so cloning a `BattleState`
//! to keep a "before" snapshot is O(1) and the two copies share structure
//! until one of them changes.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::CreatureId;
use crate::creature::Creature;
use crate::effects::{Spell, Tool};

/// One of the two sides of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Player, Side::Enemy];

    #[must_use]
    pub const fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Player => f.write_str("player"),
            Side::Enemy => f.write_str("enemy"),
        }
    }
}

/// A card in a hand or deck.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Card {
    Creature(Box<Creature>),
    Tool(Tool),
    Spell(Spell),
}

/// Everything one side owns.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SideState {
    /// Creatures on the field, in deployment order.
    pub field: Vector<Creature>,
    pub energy: i32,
    pub hand: Vector<Card>,
    /// Draw pile; the front is the top.
    pub deck: Vector<Card>,
}

impl SideState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_field(mut self, field: impl IntoIterator<Item = Creature>) -> Self {
        self.field = field.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_energy(mut self, energy: i32) -> Self {
        self.energy = energy;
        self
    }

    #[must_use]
    pub fn with_hand(mut self, hand: impl IntoIterator<Item = Card>) -> Self {
        self.hand = hand.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_deck(mut self, deck: impl IntoIterator<Item = Card>) -> Self {
        self.deck = deck.into_iter().collect();
        self
    }

    /// Creature on the field with this id.
    #[must_use]
    pub fn creature(&self, id: CreatureId) -> Option<&Creature> {
        self.field.iter().find(|c| c.id == id)
    }

    /// Write a resolver's output back into the field.
    ///
    /// Returns false if no creature with that id is on the field.
    pub fn replace(&mut self, creature: Creature) -> bool {
        match self.field.iter().position(|c| c.id == creature.id) {
            Some(index) => {
                self.field.set(index, creature);
                true
            }
            None => false,
        }
    }

    /// Move the top deck card into the hand if the hand has room.
    pub(crate) fn draw(&mut self, max_hand_size: usize) -> bool {
        if self.hand.len() >= max_hand_size {
            return false;
        }
        match self.deck.pop_front() {
            Some(card) => {
                self.hand.push_back(card);
                true
            }
            None => false,
        }
    }
}

/// Full state of one battle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BattleState {
    pub player: SideState,
    pub enemy: SideState,
    /// Index of the last resolved turn, 0 before the first.
    pub turn: u32,
}

impl BattleState {
    #[must_use]
    pub fn new(player: SideState, enemy: SideState) -> Self {
        Self { player, enemy, turn: 0 }
    }

    #[must_use]
    pub fn side(&self, side: Side) -> &SideState {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut SideState {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    /// Find a creature on either side.
    #[must_use]
    pub fn find(&self, id: CreatureId) -> Option<(Side, &Creature)> {
        Side::BOTH
            .into_iter()
            .find_map(|side| self.side(side).creature(id).map(|c| (side, c)))
    }

    /// Winner once one roster is empty.
    #[must_use]
    pub fn winner(&self) -> Option<Side> {
        match (self.player.field.is_empty(), self.enemy.field.is_empty()) {
            (false, true) => Some(Side::Player),
            (true, false) => Some(Side::Enemy),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::{BaseStats, Rarity};
    use crate::effects::{EffectFamily, ToolType};

    fn creature(id: u32) -> Creature {
        Creature::new(CreatureId(id), "Mossling", Rarity::Common, BaseStats::default())
    }

    fn tool(name: &str) -> Card {
        Card::Tool(Tool::new(name, EffectFamily::Surge, ToolType::Physical, 3))
    }

    #[test]
    fn test_draw_respects_hand_size_and_order() {
        let mut side = SideState::new()
            .with_hand([tool("a")])
            .with_deck([tool("b"), tool("c")]);

        assert!(side.draw(3));
        assert_eq!(side.hand.len(), 2);
        assert_eq!(side.hand[1], tool("b"));
        assert_eq!(side.deck.len(), 1);
        assert_eq!(side.deck[0], tool("c"));

        assert!(!side.draw(2));
        assert_eq!(side.deck.len(), 1);
    }

    #[test]
    fn test_draw_empty_deck() {
        let mut side = SideState::new();
        assert!(!side.draw(5));
        assert!(side.hand.is_empty());
    }

    #[test]
    fn test_replace_and_find() {
        let mut state = BattleState::new(
            SideState::new().with_field([creature(1), creature(2)]),
            SideState::new().with_field([creature(3)]),
        );
        let mut updated = creature(2);
        updated.current_health = 7;
        assert!(state.side_mut(Side::Player).replace(updated));
        assert_eq!(state.player.field[1].current_health, 7);
        assert!(!state.player.replace(creature(9)));

        assert_eq!(state.find(CreatureId(3)).map(|(s, _)| s), Some(Side::Enemy));
        assert!(state.find(CreatureId(9)).is_none());
    }

    #[test]
    fn test_winner() {
        let mut state = BattleState::new(
            SideState::new().with_field([creature(1)]),
            SideState::new().with_field([creature(2)]),
        );
        assert_eq!(state.winner(), None);
        state.enemy.field.clear();
        assert_eq!(state.winner(), Some(Side::Player));
        assert_eq!(Side::Player.opponent(), Side::Enemy);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let state = BattleState::new(SideState::new().with_field([creature(1)]), SideState::new());
        let mut next = state.clone();
        next.player.field[0].current_health = 99;
        assert_eq!(state.player.field[0].current_health, 0);
    }
}
