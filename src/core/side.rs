//! Battle sides and per-side data storage.
//!
//! ## Side
//!
//! A battle always has exactly two participants: the `Attacker`, who acts
//! first, and the `Defender`.
//!
//! ## SideMap
//!
//! Per-side storage backed by a fixed array for O(1) access. Supports
//! indexing by `Side` and borrowing both entries mutably at once, which is
//! what card effects need (user and target).

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two participants of a battle.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    /// The side that acts on turn 1.
    Attacker,
    /// The side that answers.
    Defender,
}

impl Side {
    /// Both sides in turn order.
    pub const ALL: [Side; 2] = [Side::Attacker, Side::Defender];

    /// The opposing side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Attacker => Side::Defender,
            Side::Defender => Side::Attacker,
        }
    }

    /// Array index for this side (Attacker = 0).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::Attacker => 0,
            Side::Defender => 1,
        }
    }
}

/// Per-side data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use essence_duel::core::{Side, SideMap};
///
/// let mut lp: SideMap<i64> = SideMap::new(|_| 100);
/// lp[Side::Defender] -= 30;
///
/// assert_eq!(lp[Side::Attacker], 100);
/// assert_eq!(lp[Side::Defender], 70);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    data: [T; 2],
}

impl<T> SideMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(mut factory: impl FnMut(Side) -> T) -> Self {
        Self {
            data: [factory(Side::Attacker), factory(Side::Defender)],
        }
    }

    /// Create a map from explicit attacker and defender values.
    pub fn from_pair(attacker: T, defender: T) -> Self {
        Self {
            data: [attacker, defender],
        }
    }

    /// Get a reference to a side's data.
    #[must_use]
    pub fn get(&self, side: Side) -> &T {
        &self.data[side.index()]
    }

    /// Get a mutable reference to a side's data.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        &mut self.data[side.index()]
    }

    /// Borrow `side` and its opponent mutably at the same time.
    ///
    /// Returns `(side's data, opponent's data)`.
    pub fn pair_mut(&mut self, side: Side) -> (&mut T, &mut T) {
        let [attacker, defender] = &mut self.data;
        match side {
            Side::Attacker => (attacker, defender),
            Side::Defender => (defender, attacker),
        }
    }

    /// Iterate over (Side, &T) pairs in turn order.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::ALL.into_iter().zip(self.data.iter())
    }

    /// Iterate over (Side, &mut T) pairs in turn order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Side, &mut T)> {
        Side::ALL.into_iter().zip(self.data.iter_mut())
    }
}

impl<T: Default> Default for SideMap<T> {
    fn default() -> Self {
        Self::new(|_| T::default())
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        self.get_mut(side)
    }
}
