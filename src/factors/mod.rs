//! Timed status effects ("factors").
//!
//! ## Key Types
//!
//! - `FactorKind`: Closed set of kinds with their magnitudes
//! - `FactorTag`: Payload-free kind, for queries and removal
//! - `FactorManager`: Per-side factor lists, stacking, ticking
//! - `TickReport`: What a start-of-turn tick did

pub mod factor;
pub mod manager;

pub use factor::{BoostStat, Factor, FactorKind, FactorTag, ShieldFilter, Stacking};
pub use manager::{FactorManager, TickReport};
