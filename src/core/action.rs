//! Player actions and the battle's action history.
//!
//! A player does one of two things on their turn: use an equipped card
//! (named by its slot) or end the turn. Every accepted action is recorded
//! with the side, turn number and a per-battle sequence number.

use serde::{Deserialize, Serialize};

use super::side::Side;
use crate::cards::{CardId, CardType};

/// A player action.
///
/// ## Example
///
/// ```
/// use essence_duel::core::Action;
/// use essence_duel::cards::CardType;
///
/// let action = Action::use_card(CardType::SkillE);
/// assert_eq!(action.slot(), Some(CardType::SkillE));
/// assert_eq!(Action::EndTurn.slot(), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Use the card equipped in `slot`.
    UseCard { slot: CardType },
    /// Hand the turn to the opponent.
    EndTurn,
}

impl Action {
    #[must_use]
    pub const fn use_card(slot: CardType) -> Self {
        Action::UseCard { slot }
    }

    /// The slot an action targets, if any.
    #[must_use]
    pub const fn slot(&self) -> Option<CardType> {
        match self {
            Action::UseCard { slot } => Some(*slot),
            Action::EndTurn => None,
        }
    }
}

/// What an accepted action did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// Card used, `None` for `EndTurn`.
    pub card: Option<CardId>,
    /// An effect function ran. False when the card's effect key is unbound.
    pub resolved: bool,
    /// The action set the turn's action lock.
    pub locked: bool,
}

/// A recorded action with metadata for history tracking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The side that acted.
    pub side: Side,

    /// The action taken.
    pub action: Action,

    /// Turn number when the action was taken.
    pub turn: u32,

    /// Position in the battle's action history.
    pub sequence: u32,

    pub outcome: ActionOutcome,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(side: Side, action: Action, turn: u32, sequence: u32, outcome: ActionOutcome) -> Self {
        Self {
            side,
            action,
            turn,
            sequence,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_slot() {
        assert_eq!(Action::use_card(CardType::Potion).slot(), Some(CardType::Potion));
        assert_eq!(Action::EndTurn.slot(), None);
    }

    #[test]
    fn test_action_record_serialization() {
        let outcome = ActionOutcome {
            card: Some(CardId::new(4)),
            resolved: true,
            locked: true,
        };
        let record = ActionRecord::new(
            Side::Defender,
            Action::use_card(CardType::SkillW),
            3,
            7,
            outcome,
        );

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: ActionRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, deserialized);
    }
}
