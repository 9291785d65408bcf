//! Battle configuration.
//!
//! Rules that vary between content sets live here instead of being
//! hardcoded in the damage pipeline or the dispatcher:
//! - `DefenseMode`: how DEF / EssenceDEF mitigate a hit
//! - `turn_regen`: pool gains at the start of each side's turn
//! - `swift_bypasses_lock`: whether swift cards ignore the action lock
//! - `seed`: crit roll stream
//!
//! `BattleConfig` deserializes from JSON with every field optional.

use serde::{Deserialize, Serialize};

use crate::character::{Pool, ResourceCosts};

/// How defense mitigates incoming damage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefenseMode {
    /// Subtract the defense stat from the hit.
    #[default]
    Flat,
    /// Reduce the hit by defense percent, capped at 100.
    Percent,
}

impl DefenseMode {
    /// Mitigate `amount` by `defense`. Never negative.
    #[must_use]
    pub fn mitigate(self, amount: f64, defense: f64) -> f64 {
        let defense = defense.max(0.0);
        let mitigated = match self {
            DefenseMode::Flat => amount - defense,
            DefenseMode::Percent => amount * (1.0 - defense.min(100.0) / 100.0),
        };
        mitigated.max(0.0)
    }
}

/// Complete battle configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Roll for critical hits. Disabled, every hit is a normal hit.
    pub crit_enabled: bool,

    /// Defense interpretation.
    pub defense_mode: DefenseMode,

    /// Gains applied to the incoming side at each turn start, after its
    /// factors tick.
    pub turn_regen: ResourceCosts,

    /// Swift cards may be used while actions are locked.
    pub swift_bypasses_lock: bool,

    /// Seed for the default crit roll stream.
    pub seed: u64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            crit_enabled: true,
            defense_mode: DefenseMode::Flat,
            turn_regen: ResourceCosts::new(),
            swift_bypasses_lock: false,
            seed: 0,
        }
    }
}

impl BattleConfig {
    /// Default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the defense mode.
    #[must_use]
    pub fn with_defense_mode(mut self, mode: DefenseMode) -> Self {
        self.defense_mode = mode;
        self
    }

    /// Add a per-turn regeneration amount for a pool.
    #[must_use]
    pub fn with_turn_regen(mut self, pool: Pool, amount: i64) -> Self {
        self.turn_regen.set(pool, amount);
        self
    }

    /// Disable critical hits.
    #[must_use]
    pub fn without_crits(mut self) -> Self {
        self.crit_enabled = false;
        self
    }

    /// Let swift cards bypass the action lock.
    #[must_use]
    pub fn swift_bypasses_lock(mut self) -> Self {
        self.swift_bypasses_lock = true;
        self
    }
}
