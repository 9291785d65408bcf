//! Factor kinds and their stacking policy.
//!
//! A factor is a timed status on one side of the battle. Its kind is a closed
//! set; magnitudes travel inside the kind. `FactorTag` is the payload-free
//! discriminant used for queries and removal.

use serde::{Deserialize, Serialize};

use crate::cards::CardType;
use crate::character::{Element, Pool, StatusFlags};

/// Stat raised by a `StatBoost`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BoostStat {
    /// Outgoing damage, multiplicative percent.
    Damage,
    /// DEF, multiplicative percent.
    Defense,
    /// EssenceDEF, multiplicative percent.
    EssenceDefense,
    /// Crit rate, in percentage points.
    CritRate,
}

/// Which hits a shield absorbs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShieldFilter {
    Any,
    Normal,
    /// Every element except `Normal`.
    Essence,
    Element(Element),
}

impl ShieldFilter {
    /// Does this shield absorb a hit of `element`?
    #[must_use]
    pub fn matches(self, element: Element) -> bool {
        match self {
            ShieldFilter::Any => true,
            ShieldFilter::Normal => element == Element::Normal,
            ShieldFilter::Essence => element.is_essence(),
            ShieldFilter::Element(e) => e == element,
        }
    }
}

/// How a new factor interacts with existing ones of the same kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stacking {
    /// Instances accumulate.
    Stack,
    /// Every prior instance on the target is removed first.
    Refresh,
    /// Prior instances on the same card slot are removed first.
    RefreshPerSlot,
}

/// Factor kind with its magnitude.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, strum::EnumDiscriminants)]
#[strum_discriminants(name(FactorTag), derive(Hash, PartialOrd, Ord, strum::EnumIter))]
pub enum FactorKind {
    /// Damage each tick.
    Burning { damage: f64, element: Element },
    /// Pool gain each tick, including the last one.
    Regeneration { pool: Pool, amount: i64 },
    /// Percentage stat boost.
    StatBoost { stat: BoostStat, percent: f64 },
    /// Absorbs matching damage point for point.
    Shield { capacity: f64, filter: ShieldFilter },
    /// Freezes the card in `slot`.
    Freeze { slot: CardType },
    /// No incoming damage, no harmful factors.
    Immunity,
    /// Raises Burning applied by the holder.
    BurningDamageBoost { percent: f64 },
    /// The holder's next damaging hit freezes the victim's card in `slot`.
    FrostTouch { slot: CardType, turns: u32 },
}

impl FactorKind {
    #[must_use]
    pub fn tag(&self) -> FactorTag {
        FactorTag::from(self)
    }
}

impl FactorTag {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FactorTag::Burning => "burning",
            FactorTag::Regeneration => "regeneration",
            FactorTag::StatBoost => "stat_boost",
            FactorTag::Shield => "shield",
            FactorTag::Freeze => "freeze",
            FactorTag::Immunity => "immunity",
            FactorTag::BurningDamageBoost => "burning_damage_boost",
            FactorTag::FrostTouch => "frost_touch",
        }
    }

    /// Status bit for this kind.
    #[must_use]
    pub const fn flag(self) -> StatusFlags {
        match self {
            FactorTag::Burning => StatusFlags::BURNING,
            FactorTag::Regeneration => StatusFlags::REGENERATING,
            FactorTag::StatBoost => StatusFlags::BOOSTED,
            FactorTag::Shield => StatusFlags::SHIELDED,
            FactorTag::Freeze => StatusFlags::FREEZE,
            FactorTag::Immunity => StatusFlags::IMMUNE,
            FactorTag::BurningDamageBoost => StatusFlags::BURNING_DAMAGE_BOOST,
            FactorTag::FrostTouch => StatusFlags::FROST_TOUCH,
        }
    }

    /// Harmful kinds are refused on an immune target.
    #[must_use]
    pub const fn is_harmful(self) -> bool {
        matches!(self, FactorTag::Burning | FactorTag::Freeze)
    }

    #[must_use]
    pub const fn stacking(self) -> Stacking {
        match self {
            FactorTag::BurningDamageBoost | FactorTag::Immunity | FactorTag::FrostTouch => {
                Stacking::Refresh
            }
            FactorTag::Freeze => Stacking::RefreshPerSlot,
            _ => Stacking::Stack,
        }
    }
}

impl std::fmt::Display for FactorTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An active factor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub kind: FactorKind,
    /// Turns left. Always positive while the factor is stored.
    pub remaining: u32,
}

impl Factor {
    #[must_use]
    pub fn new(kind: FactorKind, remaining: u32) -> Self {
        Self { kind, remaining }
    }

    #[must_use]
    pub fn tag(&self) -> FactorTag {
        self.kind.tag()
    }

    /// The frozen slot, for Freeze factors.
    #[must_use]
    pub fn frozen_slot(&self) -> Option<CardType> {
        match self.kind {
            FactorKind::Freeze { slot } => Some(slot),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_tag_from_kind() {
        let kind = FactorKind::Burning { damage: 10.0, element: Element::Fire };
        assert_eq!(kind.tag(), FactorTag::Burning);
        assert_eq!(FactorKind::Immunity.tag(), FactorTag::Immunity);
        assert_eq!(FactorTag::BurningDamageBoost.to_string(), "burning_damage_boost");
    }

    #[test]
    fn test_every_tag_has_its_own_flag() {
        let mut seen = StatusFlags::empty();
        for tag in FactorTag::iter() {
            assert!(!seen.contains(tag.flag()));
            seen |= tag.flag();
        }
        assert_eq!(seen, StatusFlags::all());
    }

    #[test]
    fn test_stacking_policy() {
        assert_eq!(FactorTag::BurningDamageBoost.stacking(), Stacking::Refresh);
        assert_eq!(FactorTag::Immunity.stacking(), Stacking::Refresh);
        assert_eq!(FactorTag::FrostTouch.stacking(), Stacking::Refresh);
        assert_eq!(FactorTag::Freeze.stacking(), Stacking::RefreshPerSlot);
        assert_eq!(FactorTag::Burning.stacking(), Stacking::Stack);
        assert_eq!(FactorTag::Shield.stacking(), Stacking::Stack);
    }

    #[test]
    fn test_boost_stat_from_str() {
        assert_eq!("essence_defense".parse::<BoostStat>().unwrap(), BoostStat::EssenceDefense);
        assert_eq!("CRIT_RATE".parse::<BoostStat>().unwrap(), BoostStat::CritRate);
        assert!("speed".parse::<BoostStat>().is_err());
    }

    #[test]
    fn test_harmful_kinds() {
        assert!(FactorTag::Burning.is_harmful());
        assert!(FactorTag::Freeze.is_harmful());
        assert!(!FactorTag::Shield.is_harmful());
        assert!(!FactorTag::FrostTouch.is_harmful());
    }

    #[test]
    fn test_shield_filter() {
        assert!(ShieldFilter::Any.matches(Element::Darkness));
        assert!(ShieldFilter::Normal.matches(Element::Normal));
        assert!(!ShieldFilter::Normal.matches(Element::Fire));
        assert!(ShieldFilter::Essence.matches(Element::Fire));
        assert!(!ShieldFilter::Essence.matches(Element::Normal));
        assert!(ShieldFilter::Element(Element::Ice).matches(Element::Ice));
        assert!(!ShieldFilter::Element(Element::Ice).matches(Element::Water));
    }
}
