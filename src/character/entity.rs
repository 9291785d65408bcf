//! Characters: the runtime combatants and the content data they are built from.
//!
//! A `CharacterDefinition` is immutable content (usually deserialized from
//! JSON). `Character::from_definition` builds the mutable battle copy: full
//! pools, resolved element bonuses and equipped card instances.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::stats::{
    Crit, DamageBonus, Defense, Element, ElementBonuses, Pool, PoolMaximums, Pools, WeaponType,
};
use crate::cards::{Card, CardDefinition, CardId, CardType, Equipment};
use crate::error::ConfigError;

/// Charm set bonus: when every piece is equipped, the element's damage bonus
/// gains `percent`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SetBonus {
    pub name: String,
    pub pieces: Vec<CardId>,
    pub element: Element,
    pub percent: f64,
}

fn default_star_rank() -> u8 {
    1
}

fn default_essence() -> Element {
    Element::Normal
}

/// Immutable character content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharacterDefinition {
    pub name: String,

    #[serde(default = "default_star_rank")]
    pub star_rank: u8,

    #[serde(default = "default_essence")]
    pub essence: Element,

    #[serde(default)]
    pub weapon: WeaponType,

    pub pools: PoolMaximums,

    #[serde(default)]
    pub defense: Defense,

    #[serde(default)]
    pub crit: Crit,

    #[serde(default)]
    pub element_bonuses: BTreeMap<Element, DamageBonus>,

    /// Equipped cards in content order. Each must use a distinct slot type.
    #[serde(default)]
    pub cards: Vec<CardDefinition>,

    #[serde(default)]
    pub charms: Vec<CardDefinition>,

    #[serde(default)]
    pub set_bonus: Option<SetBonus>,
}

impl CharacterDefinition {
    /// A definition with default stats and nothing equipped.
    #[must_use]
    pub fn new(name: impl Into<String>, pools: PoolMaximums) -> Self {
        Self {
            name: name.into(),
            star_rank: default_star_rank(),
            essence: default_essence(),
            weapon: WeaponType::default(),
            pools,
            defense: Defense::default(),
            crit: Crit::default(),
            element_bonuses: BTreeMap::new(),
            cards: Vec::new(),
            charms: Vec::new(),
            set_bonus: None,
        }
    }

    #[must_use]
    pub fn with_essence(mut self, essence: Element) -> Self {
        self.essence = essence;
        self
    }

    #[must_use]
    pub fn with_defense(mut self, def: f64, essence_def: f64) -> Self {
        self.defense = Defense { def, essence_def };
        self
    }

    #[must_use]
    pub fn with_crit(mut self, rate: f64, damage: f64) -> Self {
        self.crit = Crit { rate, damage };
        self
    }

    #[must_use]
    pub fn with_bonus(mut self, element: Element, bonus: DamageBonus) -> Self {
        self.element_bonuses.insert(element, bonus);
        self
    }

    /// Add a card. Charm cards go to the charm list.
    #[must_use]
    pub fn with_card(mut self, card: CardDefinition) -> Self {
        if card.card_type.is_charm() {
            self.charms.push(card);
        } else {
            self.cards.push(card);
        }
        self
    }

    #[must_use]
    pub fn with_set_bonus(mut self, set_bonus: SetBonus) -> Self {
        self.set_bonus = Some(set_bonus);
        self
    }
}

/// A character during a battle.
#[derive(Clone, Debug, PartialEq)]
pub struct Character {
    pub name: String,
    pub star_rank: u8,
    pub essence: Element,
    pub weapon: WeaponType,
    pub pools: Pools,
    pub defense: Defense,
    pub crit: Crit,
    pub bonuses: ElementBonuses,
    pub equipment: Equipment,
}

impl Character {
    /// Build the battle copy of a character.
    ///
    /// Fails if two cards share a slot type.
    pub fn from_definition(def: &CharacterDefinition) -> Result<Self, ConfigError> {
        let mut equipment = Equipment::new();
        for card_def in def.cards.iter().chain(&def.charms) {
            let slot = card_def.card_type;
            let replaced = equipment
                .equip(slot, Card::new(card_def.clone()))
                .map_err(|source| ConfigError::Equip {
                    character: def.name.clone(),
                    source,
                })?;
            if replaced.is_some() {
                return Err(ConfigError::DuplicateSlot {
                    character: def.name.clone(),
                    slot,
                });
            }
        }

        let mut bonuses = ElementBonuses::from(&def.element_bonuses);
        if let Some(set) = &def.set_bonus {
            let complete = !set.pieces.is_empty()
                && set.pieces.iter().all(|id| equipment.find(*id).is_some());
            if complete {
                debug!(character = %def.name, set = %set.name, "set bonus active");
                bonuses.get_mut(set.element).percent += set.percent;
            }
        }

        Ok(Self {
            name: def.name.clone(),
            star_rank: def.star_rank,
            essence: def.essence,
            weapon: def.weapon,
            pools: Pools::from_maximums(&def.pools),
            defense: def.defense,
            crit: def.crit,
            bonuses,
            equipment,
        })
    }

    /// Current life points.
    #[must_use]
    pub fn lp(&self) -> i64 {
        self.pools.current(Pool::Lp)
    }

    /// LP at zero. The battle never declares an outcome itself.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.pools.lp.is_empty()
    }

    #[must_use]
    pub fn card(&self, slot: CardType) -> Option<&Card> {
        self.equipment.get(slot)
    }

    pub fn card_mut(&mut self, slot: CardType) -> Option<&mut Card> {
        self.equipment.get_mut(slot)
    }

    #[must_use]
    pub fn has_frozen_cards(&self) -> bool {
        self.equipment.has_frozen_cards()
    }
}
