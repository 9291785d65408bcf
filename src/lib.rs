//! # essence-duel
//!
//! Combat engine for a two-character, turn-based card battler.
//!
//! ## Design Principles
//!
//! 1. **Content Is Data**: Cards and characters are plain serde structs.
//!    Behavior is looked up by string key in an `EffectRegistry`, so a
//!    content set can be loaded and validated before a battle begins.
//!
//! 2. **Reject Before Mutating**: Every gate (lock, slot, usability, freeze,
//!    cost) is checked before anything changes. A rejected action leaves the
//!    battle exactly as it was.
//!
//! 3. **Deterministic**: Crit rolls and random branch choices come from a
//!    seeded ChaCha stream. Same seed, same actions, same battle.
//!
//! ## Architecture
//!
//! - **Damage Pipeline**: element bonus, crit, shield absorption, defense
//!   mitigation, LP drain. One function per stage ordering.
//!
//! - **Factors**: timed status effects per side with a status bitset kept
//!   in sync, ticked at the start of their holder's turn.
//!
//! - **Turn Machine**: side to act plus an action lock; observers hear
//!   about turn changes.
//!
//! ## Modules
//!
//! - `core`: Sides, actions, RNG, configuration
//! - `character`: Resource pools, stats, characters, status flags
//! - `cards`: Card definitions, instances, equipment slots
//! - `factors`: Timed status effects
//! - `combat`: Damage calculation and the event log
//! - `effects`: Effect registry, execution context, built-in catalog
//! - `rules`: Turn state machine and the battle dispatcher
//! - `error`: Error types

pub mod core;
pub mod character;
pub mod cards;
pub mod factors;
pub mod combat;
pub mod effects;
pub mod rules;
pub mod error;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionOutcome, ActionRecord, BattleConfig, DefenseMode, FixedRoll, GameRng,
    RandomSource, Side, SideMap,
};

pub use crate::character::{
    Character, CharacterDefinition, Element, Pool, PoolMaximums, ResourceCosts, StatusFlags,
};

pub use crate::cards::{CardDefinition, CardId, CardType, CharmKind};

pub use crate::factors::{FactorKind, FactorManager, FactorTag};

pub use crate::combat::{Combat, CombatEvent, DamageReport};

pub use crate::effects::{BranchPolicy, EffectContext, EffectRegistry};

pub use crate::rules::{Battle, TurnObserver, TurnSignal, TurnStateMachine};

pub use crate::error::{ActionError, ConfigError, FactorError, IllegalAction, ResourceError};
