//! Card effect execution.
//!
//! - `EffectRegistry`: key → effect / passive function pointer
//! - `EffectContext`: what an effect may read and mutate
//! - `AbilityPhase`: per-card state for multi-step abilities
//! - `BranchPolicy`: chooses between a card's alternative outcomes
//! - `library`: the built-in catalog
//!
//! ## Design Philosophy
//!
//! Card definitions are plain data with string keys. Behavior lives in
//! plain functions registered once at startup, so content can be loaded from
//! JSON and checked against the registry before a battle begins.

mod context;
pub mod library;
mod phase;
mod policy;
mod registry;

pub use context::EffectContext;
pub use phase::AbilityPhase;
pub use policy::{BranchPolicy, FirstOption, FixedChoice, RandomChoice};
pub use registry::{EffectFn, EffectRegistry, PassiveFn, PassiveTrigger};
