//! Equipment: the cards a character has equipped, one per slot type.
//!
//! A card's type is the slot it occupies. Iteration is in slot order
//! (`Character` first, charms last), which is also the order passives fire.

use std::collections::BTreeMap;

use super::definition::{CardId, CardType};
use super::instance::Card;
use crate::error::IllegalAction;

/// Slot type → equipped card.
///
/// ## Example
///
/// ```
/// use essence_duel::cards::{Card, CardDefinition, CardId, CardType, Equipment};
///
/// let mut equipment = Equipment::new();
/// let potion = Card::new(CardDefinition::new(CardId::new(3), "Tonic", CardType::Potion));
///
/// assert!(equipment.equip(CardType::Potion, potion).unwrap().is_none());
/// assert_eq!(equipment.get(CardType::Potion).unwrap().id(), CardId::new(3));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Equipment {
    slots: BTreeMap<CardType, Card>,
}

impl Equipment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a card in a slot, returning the card it replaced.
    ///
    /// The card's type must match the slot.
    pub fn equip(&mut self, slot: CardType, card: Card) -> Result<Option<Card>, IllegalAction> {
        if card.card_type() != slot {
            return Err(IllegalAction::WrongSlot {
                card: card.id(),
                card_type: card.card_type(),
                slot,
            });
        }
        Ok(self.slots.insert(slot, card))
    }

    /// Remove and return the card in a slot.
    pub fn unequip(&mut self, slot: CardType) -> Option<Card> {
        self.slots.remove(&slot)
    }

    #[must_use]
    pub fn get(&self, slot: CardType) -> Option<&Card> {
        self.slots.get(&slot)
    }

    pub fn get_mut(&mut self, slot: CardType) -> Option<&mut Card> {
        self.slots.get_mut(&slot)
    }

    /// Find an equipped card by definition id.
    #[must_use]
    pub fn find(&self, id: CardId) -> Option<&Card> {
        self.slots.values().find(|card| card.id() == id)
    }

    /// Find an equipped card mutably by definition id.
    pub fn find_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.slots.values_mut().find(|card| card.id() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate over equipped cards in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.slots.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Card> {
        self.slots.values_mut()
    }

    /// True if any equipped card is currently frozen.
    #[must_use]
    pub fn has_frozen_cards(&self) -> bool {
        self.slots.values().any(Card::is_frozen)
    }

    /// Advance every card's ability phase by one owner turn.
    pub fn advance_phases(&mut self) {
        for card in self.slots.values_mut() {
            card.phase.advance();
        }
    }
}
