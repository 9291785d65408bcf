//! Card instances - runtime card state.
//!
//! `Card` is an equipped card during a battle: a shared reference to its
//! static definition plus the state that changes turn to turn.

use std::sync::Arc;

use super::definition::{CardDefinition, CardId, CardType};
use crate::effects::AbilityPhase;

/// An equipped card.
///
/// The definition is shared (`Arc`) so the dispatcher can hold it while
/// mutating the rest of the battle.
#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    definition: Arc<CardDefinition>,

    /// Remaining frozen turns. Zero means usable.
    pub frozen_turns: u32,

    /// Multi-step ability state.
    pub phase: AbilityPhase,
}

impl Card {
    /// Create a fresh, unfrozen, idle card.
    #[must_use]
    pub fn new(definition: impl Into<Arc<CardDefinition>>) -> Self {
        Self {
            definition: definition.into(),
            frozen_turns: 0,
            phase: AbilityPhase::Idle,
        }
    }

    /// The static definition.
    #[must_use]
    pub fn definition(&self) -> &Arc<CardDefinition> {
        &self.definition
    }

    #[must_use]
    pub fn id(&self) -> CardId {
        self.definition.id
    }

    #[must_use]
    pub fn card_type(&self) -> CardType {
        self.definition.card_type
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen_turns > 0
    }

    /// Set the frozen counter. Character cards cannot be frozen; returns
    /// false and leaves them untouched.
    pub fn freeze(&mut self, turns: u32) -> bool {
        if !self.card_type().is_freezable() {
            return false;
        }
        self.frozen_turns = turns;
        true
    }

    pub fn unfreeze(&mut self) {
        self.frozen_turns = 0;
    }
}
