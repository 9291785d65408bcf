//! Turn rules and the battle session.
//!
//! - `TurnStateMachine`: side to act, action lock, turn signals
//! - `Battle`: the dispatcher tying cards, effects, damage and factors
//!   together

pub mod battle;
pub mod turn;

pub use battle::Battle;
pub use turn::{TurnObserver, TurnSignal, TurnStateMachine};
