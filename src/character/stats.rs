//! Character stats: elements, pools, defense, crit and damage bonuses.
//!
//! Pools are the spendable resources (LP, EP, MP, UP). Everything else here
//! is a stat read by the damage pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::ConfigError;

/// Element (essence) of a character or of a hit.
///
/// `Normal` hits are mitigated by DEF, every other element by EssenceDEF.
/// `Absolute` hits skip defense mitigation entirely.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::EnumCount,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Element {
    Normal,
    Earth,
    Water,
    Electricity,
    Nature,
    Air,
    Fire,
    Ice,
    Light,
    Darkness,
    Absolute,
}

impl Element {
    /// Index into fixed per-element tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// True for every element except `Normal`.
    #[must_use]
    pub const fn is_essence(self) -> bool {
        !matches!(self, Element::Normal)
    }
}

/// Weapon family of a character. Flavor for content, not read by the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
pub enum WeaponType {
    #[default]
    Unarmed,
    Sword,
    Bow,
    Staff,
    Gauntlet,
    Scythe,
}

/// Resource key naming one of the four pools.
///
/// Parsed case-insensitively from "LP", "EP", "MP", "UP". Unknown keys are a
/// load-time configuration error.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(try_from = "String", into = "String")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Pool {
    /// Life points.
    Lp,
    /// Energy points.
    Ep,
    /// Mana points.
    Mp,
    /// Ultimate charge.
    Up,
}

impl Pool {
    /// Parse a resource key from content data.
    pub fn parse(key: &str) -> Result<Self, ConfigError> {
        Pool::from_str(key).map_err(|_| ConfigError::UnknownResource(key.to_string()))
    }
}

impl TryFrom<String> for Pool {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Pool::parse(&value)
    }
}

impl From<Pool> for String {
    fn from(pool: Pool) -> Self {
        pool.to_string()
    }
}

/// Current and maximum value of one pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gauge {
    pub current: i64,
    pub max: i64,
}

impl Gauge {
    /// A gauge starting full. A negative max is treated as zero.
    #[must_use]
    pub const fn full(max: i64) -> Self {
        let max = if max < 0 { 0 } else { max };
        Self { current: max, max }
    }

    /// A gauge with an explicit starting value, clamped to `[0, max]`.
    #[must_use]
    pub fn with_current(current: i64, max: i64) -> Self {
        let max = max.max(0);
        Self {
            current: current.clamp(0, max),
            max,
        }
    }

    /// True when the gauge is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.current == 0
    }
}

/// The four pools of a character.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pools {
    pub lp: Gauge,
    pub ep: Gauge,
    pub mp: Gauge,
    pub up: Gauge,
}

impl Pools {
    /// Pools starting from the given maximums. LP, EP and MP start full,
    /// UP starts empty.
    #[must_use]
    pub fn from_maximums(max: &PoolMaximums) -> Self {
        Self {
            lp: Gauge::full(max.lp),
            ep: Gauge::full(max.ep),
            mp: Gauge::full(max.mp),
            up: Gauge::with_current(0, max.up),
        }
    }

    /// Get a pool by key.
    #[must_use]
    pub fn get(&self, pool: Pool) -> &Gauge {
        match pool {
            Pool::Lp => &self.lp,
            Pool::Ep => &self.ep,
            Pool::Mp => &self.mp,
            Pool::Up => &self.up,
        }
    }

    /// Get a pool mutably by key.
    pub fn get_mut(&mut self, pool: Pool) -> &mut Gauge {
        match pool {
            Pool::Lp => &mut self.lp,
            Pool::Ep => &mut self.ep,
            Pool::Mp => &mut self.mp,
            Pool::Up => &mut self.up,
        }
    }

    /// Current value of a pool.
    #[must_use]
    pub fn current(&self, pool: Pool) -> i64 {
        self.get(pool).current
    }
}

/// Pool maximums from a character definition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolMaximums {
    pub lp: i64,
    #[serde(default)]
    pub ep: i64,
    #[serde(default)]
    pub mp: i64,
    #[serde(default)]
    pub up: i64,
}

/// Defense stats.
///
/// Interpreted by `DefenseMode`: flat points subtracted from the hit, or a
/// percentage reduction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Defense {
    #[serde(default)]
    pub def: f64,
    #[serde(default)]
    pub essence_def: f64,
}

/// Critical hit stats.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Crit {
    /// Probability in `[0, 1]`.
    pub rate: f64,
    /// Multiplier applied on a crit (1.5 = +50%).
    pub damage: f64,
}

impl Default for Crit {
    fn default() -> Self {
        Self {
            rate: 0.0,
            damage: 1.5,
        }
    }
}

/// Damage bonus for one element.
///
/// Applied as `(amount + flat) * (1 + percent / 100)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageBonus {
    #[serde(default)]
    pub flat: f64,
    #[serde(default)]
    pub percent: f64,
}

impl DamageBonus {
    /// Apply this bonus to a raw amount.
    #[must_use]
    pub fn apply(&self, amount: f64) -> f64 {
        (amount + self.flat) * (1.0 + self.percent / 100.0)
    }
}

/// Fixed per-element damage bonus table.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ElementBonuses {
    table: [DamageBonus; <Element as strum::EnumCount>::COUNT],
}

impl ElementBonuses {
    /// Bonus for an element.
    #[must_use]
    pub fn get(&self, element: Element) -> DamageBonus {
        self.table[element.index()]
    }

    /// Mutable bonus for an element.
    pub fn get_mut(&mut self, element: Element) -> &mut DamageBonus {
        &mut self.table[element.index()]
    }
}

impl From<&BTreeMap<Element, DamageBonus>> for ElementBonuses {
    fn from(map: &BTreeMap<Element, DamageBonus>) -> Self {
        let mut bonuses = Self::default();
        for (element, bonus) in map {
            *bonuses.get_mut(*element) = *bonus;
        }
        bonuses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_pool_parse() {
        assert_eq!(Pool::parse("MP").unwrap(), Pool::Mp);
        assert_eq!(Pool::parse("lp").unwrap(), Pool::Lp);
        assert_eq!(
            Pool::parse("Rage"),
            Err(ConfigError::UnknownResource("Rage".to_string()))
        );
    }

    #[test]
    fn test_pool_serde_rejects_unknown() {
        let ok: Pool = serde_json::from_str("\"EP\"").unwrap();
        assert_eq!(ok, Pool::Ep);
        assert!(serde_json::from_str::<Pool>("\"Rage\"").is_err());
    }

    #[test]
    fn test_pool_serde_ignores_case() {
        let pools: Vec<Pool> = serde_json::from_str(r#"["mp", "Lp", "uP"]"#).unwrap();
        assert_eq!(pools, vec![Pool::Mp, Pool::Lp, Pool::Up]);
        assert_eq!(serde_json::to_string(&Pool::Ep).unwrap(), "\"EP\"");
    }

    #[test]
    fn test_element_index_is_dense() {
        for (i, element) in Element::iter().enumerate() {
            assert_eq!(element.index(), i);
        }
        assert!(!Element::Normal.is_essence());
        assert!(Element::Fire.is_essence());
    }

    #[test]
    fn test_element_from_str() {
        assert_eq!("fire".parse::<Element>().unwrap(), Element::Fire);
        assert_eq!("Electricity".parse::<Element>().unwrap(), Element::Electricity);
    }

    #[test]
    fn test_gauge_clamps() {
        let gauge = Gauge::with_current(150, 100);
        assert_eq!(gauge.current, 100);

        let gauge = Gauge::with_current(-5, 100);
        assert_eq!(gauge.current, 0);
        assert!(gauge.is_empty());

        assert_eq!(Gauge::full(-5), Gauge { current: 0, max: 0 });
    }

    #[test]
    fn test_pools_from_maximums() {
        let pools = Pools::from_maximums(&PoolMaximums { lp: 100, ep: 50, mp: 60, up: 30 });
        assert_eq!(pools.current(Pool::Lp), 100);
        assert_eq!(pools.current(Pool::Mp), 60);
        assert_eq!(pools.current(Pool::Up), 0);
        assert_eq!(pools.get(Pool::Up).max, 30);
    }

    #[test]
    fn test_damage_bonus_apply() {
        let bonus = DamageBonus { flat: 10.0, percent: 50.0 };
        assert_eq!(bonus.apply(20.0), 45.0);
        assert_eq!(DamageBonus::default().apply(20.0), 20.0);
    }

    #[test]
    fn test_element_bonuses_from_map() {
        let mut map = BTreeMap::new();
        map.insert(Element::Fire, DamageBonus { flat: 0.0, percent: 20.0 });

        let bonuses = ElementBonuses::from(&map);
        assert_eq!(bonuses.get(Element::Fire).percent, 20.0);
        assert_eq!(bonuses.get(Element::Ice), DamageBonus::default());
    }
}
