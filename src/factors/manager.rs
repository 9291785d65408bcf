//! Factor lifecycle: add, query, consume, tick, expire.
//!
//! `FactorManager` owns every active factor, per side, in insertion order.
//! A status bitset per side is re-derived after each mutation so membership
//! checks (`has_factor`) never scan the list.
//!
//! ## Lifecycle
//!
//! 1. `add_factor` applies the kind's stacking policy, then appends.
//! 2. The damage pipeline consumes shields through `absorb`.
//! 3. `tick` runs once at the start of the owner's turn: periodic effects
//!    fire, every duration drops by one, and factors reaching zero are
//!    removed in the same pass with their expiration effects.
//!
//! Operations that touch a card (Freeze) take the side's `Character`, since
//! the frozen counter lives on the card instance.

use smallvec::SmallVec;
use tracing::{debug, warn};

use super::factor::{BoostStat, Factor, FactorKind, FactorTag, Stacking};
use crate::cards::CardType;
use crate::character::{Character, Element, Pool, StatusFlags};
use crate::combat::damage::{land_hit, DamageReport};
use crate::core::{DefenseMode, Side, SideMap};
use crate::error::FactorError;

/// What one `tick` did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Burning hits, in factor order.
    pub damage: SmallVec<[DamageReport; 2]>,
    /// Regeneration gains actually applied (after clamping).
    pub gains: SmallVec<[(Pool, i64); 2]>,
    /// Factors removed because their duration ran out.
    pub expired: SmallVec<[FactorTag; 4]>,
    /// Cards unfrozen by an expiring Freeze.
    pub unfrozen: SmallVec<[CardType; 2]>,
}

/// Active factors of both sides.
#[derive(Clone, Debug, Default)]
pub struct FactorManager {
    factors: SideMap<SmallVec<[Factor; 8]>>,
    status: SideMap<StatusFlags>,
}

impl FactorManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a factor to `side`, whose character is `target`.
    ///
    /// Refused when the duration is zero, when a harmful kind targets an
    /// immune side, when a Shield has no capacity, or when a Freeze names an
    /// empty or character slot.
    pub fn add_factor(
        &mut self,
        side: Side,
        target: &mut Character,
        kind: FactorKind,
        duration: u32,
    ) -> Result<(), FactorError> {
        let tag = kind.tag();
        if duration == 0 {
            warn!(%side, %tag, "refused factor with zero duration");
            return Err(FactorError::ZeroDuration);
        }
        if tag.is_harmful() && self.has_factor(side, FactorTag::Immunity) {
            warn!(%side, %tag, "refused harmful factor on immune target");
            return Err(FactorError::TargetImmune { side, tag });
        }
        if matches!(kind, FactorKind::Shield { capacity, .. } if capacity.is_nan() || capacity <= 0.0) {
            warn!(%side, "refused empty shield");
            return Err(FactorError::EmptyShield);
        }
        if let FactorKind::Freeze { slot } = kind {
            let freezable = target
                .card(slot)
                .is_some_and(|card| card.card_type().is_freezable());
            if !freezable {
                warn!(%side, %slot, "refused freeze on unfreezable slot");
                return Err(FactorError::NotFreezable { side, slot });
            }
        }

        let list = &mut self.factors[side];
        match tag.stacking() {
            Stacking::Stack => {}
            Stacking::Refresh => list.retain(|f| f.tag() != tag),
            Stacking::RefreshPerSlot => {
                let slot = kind_slot(&kind);
                list.retain(|f| f.tag() != tag || f.frozen_slot() != slot);
            }
        }

        if let FactorKind::Freeze { slot } = kind {
            if let Some(card) = target.card_mut(slot) {
                card.freeze(duration);
            }
        }
        list.push(Factor::new(kind, duration));
        self.refresh_status(side);
        debug!(%side, %tag, duration, "factor added");
        Ok(())
    }

    /// Remove every factor of `tag` from `side`. Returns how many were
    /// removed. Removing a Freeze unfreezes its card.
    pub fn remove_all_factors(&mut self, side: Side, target: &mut Character, tag: FactorTag) -> usize {
        let list = &mut self.factors[side];
        let before = list.len();
        for slot in list.iter().filter(|f| f.tag() == tag).filter_map(Factor::frozen_slot) {
            if let Some(card) = target.card_mut(slot) {
                card.unfreeze();
            }
        }
        list.retain(|f| f.tag() != tag);
        let removed = before - list.len();
        if removed > 0 {
            self.refresh_status(side);
            debug!(%side, %tag, removed, "factors removed");
        }
        removed
    }

    /// Start-of-turn processing for `side`.
    pub fn tick(&mut self, side: Side, target: &mut Character, mode: DefenseMode) -> TickReport {
        let mut report = TickReport::default();

        let periodic: SmallVec<[FactorKind; 8]> = self.factors[side]
            .iter()
            .map(|f| f.kind)
            .filter(|k| matches!(k, FactorKind::Burning { .. } | FactorKind::Regeneration { .. }))
            .collect();
        for kind in periodic {
            match kind {
                FactorKind::Burning { damage, element } => {
                    let mut hit = DamageReport::new(None, side, element, damage);
                    land_hit(self, side, target, mode, &mut hit);
                    report.damage.push(hit);
                }
                FactorKind::Regeneration { pool, amount } => {
                    let gained = target.pools.gain(pool, amount);
                    report.gains.push((pool, gained));
                }
                _ => {}
            }
        }

        let list = &mut self.factors[side];
        for factor in list.iter_mut() {
            factor.remaining = factor.remaining.saturating_sub(1);
            if let Some(slot) = factor.frozen_slot() {
                if let Some(card) = target.card_mut(slot) {
                    card.frozen_turns = factor.remaining;
                }
            }
        }
        list.retain(|f| {
            if f.remaining > 0 {
                return true;
            }
            report.expired.push(f.tag());
            if let Some(slot) = f.frozen_slot() {
                report.unfrozen.push(slot);
            }
            false
        });
        for slot in &report.unfrozen {
            if let Some(card) = target.card_mut(*slot) {
                card.unfreeze();
            }
        }

        self.refresh_status(side);
        if !report.expired.is_empty() {
            debug!(%side, expired = ?report.expired, "factors expired");
        }
        report
    }

    /// Consume matching shields on `side`, point for point in insertion
    /// order, against a hit of `amount`. Depleted shields are removed.
    /// Returns the amount absorbed.
    pub fn absorb(&mut self, side: Side, element: Element, amount: f64) -> f64 {
        let mut remaining = amount.max(0.0);
        let mut absorbed = 0.0;
        let list = &mut self.factors[side];
        for factor in list.iter_mut() {
            if remaining <= 0.0 {
                break;
            }
            if let FactorKind::Shield { capacity, filter } = &mut factor.kind {
                if filter.matches(element) {
                    let take = capacity.min(remaining);
                    *capacity -= take;
                    remaining -= take;
                    absorbed += take;
                }
            }
        }
        let before = list.len();
        list.retain(|f| !matches!(f.kind, FactorKind::Shield { capacity, .. } if capacity <= 0.0));
        if list.len() != before {
            self.refresh_status(side);
        }
        absorbed
    }

    /// Trigger the attacker's FrostTouch, if any: it is consumed and the
    /// victim's card is frozen. Returns the frozen slot and duration.
    pub fn on_damage_dealt(&mut self, attacker: Side, victim: &mut Character) -> Option<(CardType, u32)> {
        let (slot, turns) = self.factors[attacker].iter().find_map(|f| match f.kind {
            FactorKind::FrostTouch { slot, turns } => Some((slot, turns)),
            _ => None,
        })?;
        self.factors[attacker].retain(|f| f.tag() != FactorTag::FrostTouch);
        self.refresh_status(attacker);

        match self.add_factor(attacker.opponent(), victim, FactorKind::Freeze { slot }, turns) {
            Ok(()) => Some((slot, turns)),
            Err(err) => {
                debug!(%attacker, %err, "frost touch consumed without freezing");
                None
            }
        }
    }

    /// Fast membership check through the status bitset.
    #[must_use]
    pub fn has_factor(&self, side: Side, tag: FactorTag) -> bool {
        self.status[side].contains(tag.flag())
    }

    /// The derived status bitset of a side.
    #[must_use]
    pub fn status(&self, side: Side) -> StatusFlags {
        self.status[side]
    }

    /// Total shield capacity on `side` that would absorb a hit of `element`.
    #[must_use]
    pub fn shield_capacity(&self, side: Side, element: Element) -> f64 {
        self.factors[side]
            .iter()
            .filter_map(|f| match f.kind {
                FactorKind::Shield { capacity, filter } if filter.matches(element) => Some(capacity),
                _ => None,
            })
            .sum()
    }

    /// Summed percent of every `StatBoost` of `stat` on `side`.
    #[must_use]
    pub fn stat_boost(&self, side: Side, stat: BoostStat) -> f64 {
        self.factors[side]
            .iter()
            .filter_map(|f| match f.kind {
                FactorKind::StatBoost { stat: s, percent } if s == stat => Some(percent),
                _ => None,
            })
            .sum()
    }

    /// Burning boost percent held by `side` (non-stacking, so at most one).
    #[must_use]
    pub fn burning_boost(&self, side: Side) -> f64 {
        self.factors[side]
            .iter()
            .find_map(|f| match f.kind {
                FactorKind::BurningDamageBoost { percent } => Some(percent),
                _ => None,
            })
            .unwrap_or(0.0)
    }

    /// Active factors on `side`, in insertion order.
    #[must_use]
    pub fn factors_on(&self, side: Side) -> &[Factor] {
        &self.factors[side]
    }

    /// Longest remaining duration of `tag` on `side`.
    #[must_use]
    pub fn remaining(&self, side: Side, tag: FactorTag) -> Option<u32> {
        self.factors[side]
            .iter()
            .filter(|f| f.tag() == tag)
            .map(|f| f.remaining)
            .max()
    }

    /// Number of active factors of `tag` on `side`.
    #[must_use]
    pub fn count(&self, side: Side, tag: FactorTag) -> usize {
        self.factors[side].iter().filter(|f| f.tag() == tag).count()
    }

    fn refresh_status(&mut self, side: Side) {
        self.status[side] = self.factors[side]
            .iter()
            .fold(StatusFlags::empty(), |flags, f| flags | f.tag().flag());
    }
}

fn kind_slot(kind: &FactorKind) -> Option<CardType> {
    match kind {
        FactorKind::Freeze { slot } => Some(*slot),
        _ => None,
    }
}
