//! Resource model: affordability, spending and gains over the four pools.
//!
//! ## Rules
//!
//! - Every pool stays within `[0, max]`.
//! - `spend` is not implicitly checked: it refuses (and reports) an underflow
//!   instead of clamping. Callers gate with `can_afford` first.
//! - `pay` is the all-or-nothing combination used by card effects: either
//!   every cost is spent or nothing is.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

use super::stats::{Pool, Pools};
use crate::error::{ActionError, ResourceError};

/// Cost map of a card: resource key → required amount, keys unique.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Pool, i64>", into = "BTreeMap<Pool, i64>")]
pub struct ResourceCosts {
    entries: SmallVec<[(Pool, i64); 2]>,
}

impl ResourceCosts {
    /// An empty cost map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cost for a pool (builder pattern). Replaces an earlier entry
    /// for the same pool.
    #[must_use]
    pub fn with(mut self, pool: Pool, amount: i64) -> Self {
        self.set(pool, amount);
        self
    }

    /// Set the cost for a pool, keeping keys unique.
    pub fn set(&mut self, pool: Pool, amount: i64) {
        match self.entries.iter_mut().find(|(p, _)| *p == pool) {
            Some(entry) => entry.1 = amount,
            None => self.entries.push((pool, amount)),
        }
    }

    /// Cost for a pool, zero when absent.
    #[must_use]
    pub fn get(&self, pool: Pool) -> i64 {
        self.entries
            .iter()
            .find(|(p, _)| *p == pool)
            .map_or(0, |(_, amount)| *amount)
    }

    /// True when the card costs nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, amount)| *amount == 0)
    }

    /// Iterate over (pool, amount) entries.
    pub fn iter(&self) -> impl Iterator<Item = (Pool, i64)> + '_ {
        self.entries.iter().copied()
    }
}

impl From<BTreeMap<Pool, i64>> for ResourceCosts {
    fn from(map: BTreeMap<Pool, i64>) -> Self {
        Self {
            entries: map.into_iter().collect(),
        }
    }
}

impl From<ResourceCosts> for BTreeMap<Pool, i64> {
    fn from(costs: ResourceCosts) -> Self {
        costs.entries.into_iter().collect()
    }
}

impl Pools {
    /// True iff every named cost does not exceed the current amount.
    #[must_use]
    pub fn can_afford(&self, costs: &ResourceCosts) -> bool {
        costs
            .iter()
            .all(|(pool, amount)| amount <= self.current(pool))
    }

    /// The first cost that cannot be covered, as an error.
    pub fn check_afford(&self, costs: &ResourceCosts) -> Result<(), ActionError> {
        match costs
            .iter()
            .find(|(pool, amount)| *amount > self.current(*pool))
        {
            Some((key, required)) => Err(ActionError::CannotAfford {
                key,
                required,
                available: self.current(key),
            }),
            None => Ok(()),
        }
    }

    /// Decrement a pool by `amount`.
    ///
    /// Refuses with no change if the pool would drop below zero.
    pub fn spend(&mut self, pool: Pool, amount: i64) -> Result<(), ResourceError> {
        let gauge = self.get_mut(pool);
        let amount = amount.max(0);
        if gauge.current - amount < 0 {
            return Err(ResourceError::Underflow {
                key: pool,
                amount,
                available: gauge.current,
            });
        }
        gauge.current -= amount;
        Ok(())
    }

    /// Increment a pool, clamped at its max. Returns the amount actually gained.
    pub fn gain(&mut self, pool: Pool, amount: i64) -> i64 {
        let gauge = self.get_mut(pool);
        let before = gauge.current;
        gauge.current = gauge.current.saturating_add(amount.max(0)).min(gauge.max);
        gauge.current - before
    }

    /// Reduce a pool by up to `amount`, flooring at zero. Returns the amount
    /// actually lost. Used for damage, which is never refused.
    pub fn drain(&mut self, pool: Pool, amount: i64) -> i64 {
        let gauge = self.get_mut(pool);
        let lost = amount.clamp(0, gauge.current.max(0));
        gauge.current -= lost;
        lost
    }

    /// Check every cost, then spend them all. No partial spend ever occurs.
    pub fn pay(&mut self, costs: &ResourceCosts) -> Result<(), ActionError> {
        self.check_afford(costs)?;
        for (pool, amount) in costs.iter() {
            // Cannot underflow: the whole map was just checked.
            self.spend(pool, amount)?;
        }
        Ok(())
    }
}
