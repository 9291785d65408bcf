//! Characters and their resources.
//!
//! ## Key Types
//!
//! - `Character`: Runtime combatant (pools, stats, equipment)
//! - `CharacterDefinition`: Immutable content it is built from
//! - `Pools` / `Pool`: The four spendable resources
//! - `ResourceCosts`: Card cost map
//! - `StatusFlags`: Derived status bitset

pub mod entity;
pub mod resources;
pub mod stats;
pub mod status;

pub use entity::{Character, CharacterDefinition, SetBonus};
pub use resources::ResourceCosts;
pub use stats::{
    Crit, DamageBonus, Defense, Element, ElementBonuses, Gauge, Pool, PoolMaximums, Pools,
    WeaponType,
};
pub use status::StatusFlags;
