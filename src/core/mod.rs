//! Core battle types: sides, actions, RNG, configuration.
//!
//! Content sets tune behavior through `BattleConfig` rather than by
//! modifying the engine.

pub mod action;
pub mod config;
pub mod rng;
pub mod side;

pub use action::{Action, ActionOutcome, ActionRecord};
pub use config::{BattleConfig, DefenseMode};
pub use rng::{FixedRoll, GameRng, RandomSource};
pub use side::{Side, SideMap};
