//! Error types for battle construction and action dispatch.
//!
//! Four families, none fatal to the process:
//!
//! - [`ActionError`]: a player action was rejected before any mutation
//!   (illegal action or insufficient resources). The battle continues.
//! - [`ResourceError`]: a raw pool operation was refused.
//! - [`FactorError`]: a factor was refused (immune target, zero duration).
//! - [`ConfigError`]: content data is broken. Only produced while building
//!   definitions, registries or a battle, never once a battle is running.

use crate::cards::{CardId, CardType};
use crate::character::Pool;
use crate::core::Side;
use crate::factors::FactorTag;

/// Why an action is illegal in the current state.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IllegalAction {
    #[error("actions are locked until the turn advances")]
    ActionsLocked,

    #[error("no card equipped in slot {0}")]
    EmptySlot(CardType),

    #[error("card {card} of type {card_type} cannot occupy slot {slot}")]
    WrongSlot {
        card: CardId,
        card_type: CardType,
        slot: CardType,
    },

    #[error("card {0} has no active effect")]
    NotUsable(CardId),

    #[error("card {card} is frozen for {turns} more turn(s)")]
    CardFrozen { card: CardId, turns: u32 },

    #[error("card {0} is not ready yet")]
    NotReady(CardId),
}

/// Errors surfaced while performing a player action.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("illegal action: {0}")]
    Illegal(#[from] IllegalAction),

    #[error("cannot afford: {key} requires {required}, only {available} available")]
    CannotAfford {
        key: Pool,
        required: i64,
        available: i64,
    },

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// Errors from raw pool operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    #[error("spending {amount} {key} would underflow (available {available})")]
    Underflow { key: Pool, amount: i64, available: i64 },
}

/// A factor the factor system refused to add.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FactorError {
    #[error("factor duration must be at least one turn")]
    ZeroDuration,

    #[error("{side} is immune to {tag}")]
    TargetImmune { side: Side, tag: FactorTag },

    #[error("{side} has no freezable card in slot {slot}")]
    NotFreezable { side: Side, slot: CardType },

    #[error("shield capacity must be positive")]
    EmptyShield,
}

/// Broken content definitions, detected at load or battle start.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown resource key '{0}'")]
    UnknownResource(String),

    #[error("unknown card type '{0}'")]
    UnknownCardType(String),

    #[error("character '{character}' equips two cards in slot {slot}")]
    DuplicateSlot { character: String, slot: CardType },

    #[error("character '{character}' cannot equip a card: {source}")]
    Equip {
        character: String,
        #[source]
        source: IllegalAction,
    },

    #[error("registry key '{0}' registered twice")]
    DuplicateKey(String),

    #[error("character '{character}' card {card}: essential key '{key}' is not registered")]
    MissingEssentialEffect {
        character: String,
        card: CardId,
        key: String,
    },
}
