//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card: its slot type,
//! costs, flags, and the registry keys binding it to behavior. The behavior
//! itself lives in the effect registries; definitions only carry keys.
//!
//! Instance-specific data (frozen counter, ability phase) is stored
//! separately in `Card`.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::attributes::{AttributeKey, AttributeValue, Attributes};
use crate::character::{Element, ResourceCosts};
use crate::error::ConfigError;

/// Unique identifier for a card definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
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

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Charm sub-slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CharmKind {
    Offense,
    Defense,
    Utility,
}

/// Closed set of card types. A card's type is also the equipment slot it
/// occupies: one card per type per character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CardType {
    Character,
    BaseWeapon,
    SecondWeapon,
    SkillE,
    SkillW,
    SkillQ,
    Potion,
    Ultimate,
    Charm(CharmKind),
}

impl CardType {
    /// Character cards define the character's identity and cannot be frozen.
    #[must_use]
    pub const fn is_freezable(self) -> bool {
        !matches!(self, CardType::Character)
    }

    /// True for any charm sub-slot.
    #[must_use]
    pub const fn is_charm(self) -> bool {
        matches!(self, CardType::Charm(_))
    }

    /// Content-data name of this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CardType::Character => "character",
            CardType::BaseWeapon => "base_weapon",
            CardType::SecondWeapon => "second_weapon",
            CardType::SkillE => "skill_e",
            CardType::SkillW => "skill_w",
            CardType::SkillQ => "skill_q",
            CardType::Potion => "potion",
            CardType::Ultimate => "ultimate",
            CardType::Charm(CharmKind::Offense) => "charm_offense",
            CardType::Charm(CharmKind::Defense) => "charm_defense",
            CardType::Charm(CharmKind::Utility) => "charm_utility",
        }
    }
}

impl std::fmt::Display for CardType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let card_type = match s.to_ascii_lowercase().as_str() {
            "character" => CardType::Character,
            "base_weapon" => CardType::BaseWeapon,
            "second_weapon" => CardType::SecondWeapon,
            "skill_e" => CardType::SkillE,
            "skill_w" => CardType::SkillW,
            "skill_q" => CardType::SkillQ,
            "potion" => CardType::Potion,
            "ultimate" => CardType::Ultimate,
            "charm_offense" => CardType::Charm(CharmKind::Offense),
            "charm_defense" => CardType::Charm(CharmKind::Defense),
            "charm_utility" => CardType::Charm(CharmKind::Utility),
            _ => return Err(ConfigError::UnknownCardType(s.to_string())),
        };
        Ok(card_type)
    }
}

impl TryFrom<String> for CardType {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CardType> for String {
    fn from(card_type: CardType) -> Self {
        card_type.as_str().to_string()
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use essence_duel::cards::{CardDefinition, CardId, CardType};
/// use essence_duel::character::{Pool, ResourceCosts};
///
/// let bolt = CardDefinition::new(CardId::new(1), "Bolt", CardType::SkillE)
///     .with_costs(ResourceCosts::new().with(Pool::Mp, 20))
///     .with_effect("elemental_strike")
///     .with_attr("power", 45i64)
///     .with_attr("element", "electricity");
///
/// assert_eq!(bolt.get_int("power", 0), 45);
/// assert!(bolt.is_usable);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Unique identifier for this card definition.
    pub id: CardId,

    /// Display name.
    pub name: String,

    /// Slot type.
    #[serde(rename = "type")]
    pub card_type: CardType,

    /// Flavor text.
    #[serde(default)]
    pub description: String,

    /// Resources required to use the card's main branch.
    #[serde(default)]
    pub costs: ResourceCosts,

    /// Does not consume the turn's action lock.
    #[serde(default)]
    pub is_swift: bool,

    /// Has an active effect.
    #[serde(default)]
    pub is_usable: bool,

    /// Has a passive effect.
    #[serde(default)]
    pub has_passive: bool,

    /// Key into the effect registry.
    #[serde(default)]
    pub effect_key: Option<String>,

    /// Key into the passive registry.
    #[serde(default)]
    pub passive_key: Option<String>,

    /// Effect parameters (power, duration, element, ...).
    #[serde(default)]
    pub attributes: Attributes,
}

impl CardDefinition {
    /// Create a new card definition with no costs and no bindings.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, card_type: CardType) -> Self {
        Self {
            id,
            name: name.into(),
            card_type,
            description: String::new(),
            costs: ResourceCosts::new(),
            is_swift: false,
            is_usable: false,
            has_passive: false,
            effect_key: None,
            passive_key: None,
            attributes: Attributes::default(),
        }
    }

    /// Set the cost map (builder pattern).
    #[must_use]
    pub fn with_costs(mut self, costs: ResourceCosts) -> Self {
        self.costs = costs;
        self
    }

    /// Bind an active effect and mark the card usable (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, key: impl Into<String>) -> Self {
        self.effect_key = Some(key.into());
        self.is_usable = true;
        self
    }

    /// Bind a passive effect (builder pattern).
    #[must_use]
    pub fn with_passive(mut self, key: impl Into<String>) -> Self {
        self.passive_key = Some(key.into());
        self.has_passive = true;
        self
    }

    /// Mark the card swift (builder pattern).
    #[must_use]
    pub fn swift(mut self) -> Self {
        self.is_swift = true;
        self
    }

    /// Add an attribute (builder pattern).
    #[must_use]
    pub fn with_attr(
        mut self,
        key: impl Into<AttributeKey>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Get an attribute value.
    #[must_use]
    pub fn get_attr(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(&AttributeKey::new(key))
    }

    /// Get an integer attribute with a default value.
    #[must_use]
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get_attr(key)
            .and_then(|v| v.as_int())
            .unwrap_or(default)
    }

    /// Get a numeric attribute as `f64`, accepting integer or float values.
    #[must_use]
    pub fn get_float(&self, key: &str, default: f64) -> f64 {
        self.get_attr(key)
            .and_then(|v| v.as_float())
            .unwrap_or(default)
    }

    /// Get a text attribute.
    #[must_use]
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get_attr(key).and_then(|v| v.as_text())
    }

    /// Get an element attribute, falling back to `default` when absent or
    /// not a known element name.
    #[must_use]
    pub fn get_element(&self, key: &str, default: Element) -> Element {
        self.get_text(key)
            .and_then(|s| s.parse().ok())
            .unwrap_or(default)
    }

    /// Get a card-type attribute naming a slot.
    #[must_use]
    pub fn get_slot(&self, key: &str) -> Option<CardType> {
        self.get_text(key).and_then(|s| s.parse().ok())
    }
}
