//! Turn / action state machine.
//!
//! Two states, `Attacker` to act and `Defender` to act, each carrying an
//! action-lock flag that is clear on entry. A non-swift action sets the
//! lock; only advancing the turn clears it.
//!
//! Observers are notified after the state has changed. Having no observers
//! is valid.
//!
//! ```
//! use essence_duel::core::Side;
//! use essence_duel::rules::TurnStateMachine;
//!
//! let mut turn = TurnStateMachine::new();
//! assert_eq!(turn.active(), Side::Attacker);
//!
//! turn.lock();
//! assert!(!turn.can_act());
//!
//! turn.advance_turn();
//! assert_eq!(turn.active(), Side::Defender);
//! assert!(turn.can_act());
//! assert_eq!(turn.turn_number(), 2);
//! ```

use tracing::debug;

use crate::core::Side;

/// Signals delivered to turn observers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurnSignal {
    AttackerTurnBegan,
    DefenderTurnBegan,
    ActionLocked,
}

impl TurnSignal {
    /// The turn-began signal for `side`.
    #[must_use]
    pub const fn turn_began(side: Side) -> Self {
        match side {
            Side::Attacker => TurnSignal::AttackerTurnBegan,
            Side::Defender => TurnSignal::DefenderTurnBegan,
        }
    }
}

/// Receives turn signals. Closures taking `(TurnSignal, turn_number)`
/// implement it.
pub trait TurnObserver {
    fn on_signal(&mut self, signal: TurnSignal, turn: u32);
}

impl<F: FnMut(TurnSignal, u32)> TurnObserver for F {
    fn on_signal(&mut self, signal: TurnSignal, turn: u32) {
        self(signal, turn);
    }
}

/// Whose turn it is and whether they may still act.
pub struct TurnStateMachine {
    active: Side,
    locked: bool,
    turn_number: u32,
    observers: Vec<Box<dyn TurnObserver>>,
}

impl Default for TurnStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TurnStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnStateMachine")
            .field("active", &self.active)
            .field("locked", &self.locked)
            .field("turn_number", &self.turn_number)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl TurnStateMachine {
    /// Turn 1, attacker to act, unlocked.
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: Side::Attacker,
            locked: false,
            turn_number: 1,
            observers: Vec::new(),
        }
    }

    #[must_use]
    pub fn active(&self) -> Side {
        self.active
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// True iff the action lock is clear.
    #[must_use]
    pub fn can_act(&self) -> bool {
        !self.locked
    }

    /// Clear the lock, flip the side, then signal the new turn. Always legal.
    pub fn advance_turn(&mut self) {
        self.locked = false;
        self.active = self.active.opponent();
        self.turn_number += 1;
        debug!(side = %self.active, turn = self.turn_number, "turn began");
        self.notify(TurnSignal::turn_began(self.active));
    }

    /// Set the action lock, then signal it.
    pub fn lock(&mut self) {
        self.locked = true;
        self.notify(TurnSignal::ActionLocked);
    }

    /// Announce the current turn without changing state (battle start).
    pub fn announce(&mut self) {
        self.notify(TurnSignal::turn_began(self.active));
    }

    pub fn add_observer(&mut self, observer: Box<dyn TurnObserver>) {
        self.observers.push(observer);
    }

    fn notify(&mut self, signal: TurnSignal) {
        let turn = self.turn_number;
        for observer in &mut self.observers {
            observer.on_signal(signal, turn);
        }
    }
}
