//! Per-card ability phase for multi-step cards.
//!
//! Cards like a charge-then-discharge skill or a countdown ultimate need state
//! that survives between uses. Each equipped card owns one `AbilityPhase`;
//! the owner's turn start advances it once.

use serde::{Deserialize, Serialize};

/// Phase of a multi-step ability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityPhase {
    /// Nothing in progress.
    #[default]
    Idle,
    /// Charging up; counts the owner's turns since charging began.
    Charging { turns_waited: u32 },
    /// Activated with a number of uses left.
    Active {
        charges_remaining: u32,
        turns_since_activation: u32,
    },
    /// Counting down; returns to `Idle` when it reaches zero.
    Counter { remaining: u32 },
}

impl AbilityPhase {
    /// Activate with the given number of charges.
    #[must_use]
    pub const fn active(charges: u32) -> Self {
        AbilityPhase::Active {
            charges_remaining: charges,
            turns_since_activation: 0,
        }
    }

    /// True when no ability is in progress.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, AbilityPhase::Idle)
    }

    /// Advance by one owner turn.
    pub fn advance(&mut self) {
        *self = match *self {
            AbilityPhase::Idle => AbilityPhase::Idle,
            AbilityPhase::Charging { turns_waited } => AbilityPhase::Charging {
                turns_waited: turns_waited.saturating_add(1),
            },
            AbilityPhase::Active {
                charges_remaining,
                turns_since_activation,
            } => AbilityPhase::Active {
                charges_remaining,
                turns_since_activation: turns_since_activation.saturating_add(1),
            },
            AbilityPhase::Counter { remaining } if remaining <= 1 => AbilityPhase::Idle,
            AbilityPhase::Counter { remaining } => AbilityPhase::Counter {
                remaining: remaining - 1,
            },
        };
    }

    /// Spend one charge of an active phase. Returns to `Idle` when the last
    /// charge is spent. Returns false if the phase was not active.
    pub fn consume_charge(&mut self) -> bool {
        match self {
            AbilityPhase::Active {
                charges_remaining, ..
            } if *charges_remaining > 0 => {
                *charges_remaining -= 1;
                if *charges_remaining == 0 {
                    *self = AbilityPhase::Idle;
                }
                true
            }
            _ => false,
        }
    }
}
