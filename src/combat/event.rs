//! Combat events.
//!
//! Everything observable that happens during a battle is appended to the
//! battle's event log in order. Consumers (presentation, replays, tests)
//! read the log; the engine never reads it back.

use crate::cards::CardType;
use crate::character::Pool;
use crate::core::Side;
use crate::error::ActionError;
use crate::factors::FactorTag;

use super::damage::DamageReport;

/// A battle event.
#[derive(Clone, Debug, PartialEq)]
pub enum CombatEvent {
    /// A hit landed (possibly for zero).
    DamageDealt(DamageReport),
    /// A pool gained points from an effect, regeneration or turn regen.
    ResourceGained { side: Side, pool: Pool, amount: i64 },
    FactorApplied { side: Side, tag: FactorTag, duration: u32 },
    FactorExpired { side: Side, tag: FactorTag },
    CardFrozen { side: Side, slot: CardType, turns: u32 },
    CardUnfrozen { side: Side, slot: CardType },
    TurnStarted { side: Side, turn: u32 },
    /// An action was refused with no state change.
    ActionRejected { side: Side, reason: ActionError },
}

impl CombatEvent {
    /// The side the event happened to.
    #[must_use]
    pub fn side(&self) -> Side {
        match self {
            CombatEvent::DamageDealt(report) => report.target,
            CombatEvent::ResourceGained { side, .. }
            | CombatEvent::FactorApplied { side, .. }
            | CombatEvent::FactorExpired { side, .. }
            | CombatEvent::CardFrozen { side, .. }
            | CombatEvent::CardUnfrozen { side, .. }
            | CombatEvent::TurnStarted { side, .. }
            | CombatEvent::ActionRejected { side, .. } => *side,
        }
    }

    /// LP lost, for damage events.
    #[must_use]
    pub fn damage_dealt(&self) -> Option<i64> {
        match self {
            CombatEvent::DamageDealt(report) => Some(report.dealt),
            _ => None,
        }
    }
}
