//! Damage computation and the combat event log.

pub mod damage;
pub mod event;

pub use damage::{Combat, DamageReport};
pub use event::CombatEvent;
