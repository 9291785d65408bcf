//! Execution context handed to effect and passive functions.
//!
//! The dispatcher borrows everything an effect may touch (both characters,
//! the damage calculator, the card's phase and the branch policy) and
//! passes them in one struct. Helpers here keep the event log in step with
//! what effects do.

use super::phase::AbilityPhase;
use super::policy::{choose_clamped, BranchPolicy};
use crate::cards::CardDefinition;
use crate::character::{Character, Element, Pool};
use crate::combat::{Combat, CombatEvent, DamageReport};
use crate::core::Side;
use crate::error::ActionError;
use crate::factors::{FactorKind, FactorTag};

/// Everything a card effect may read or mutate.
pub struct EffectContext<'a> {
    /// Side of the card's owner.
    pub user_side: Side,
    pub user: &'a mut Character,
    /// The opponent.
    pub target: &'a mut Character,
    /// Definition of the card being resolved.
    pub card: &'a CardDefinition,
    /// The card's ability phase. Restored onto the card afterwards.
    pub phase: &'a mut AbilityPhase,
    pub combat: Combat<'a>,
    pub policy: &'a mut dyn BranchPolicy,
}

impl EffectContext<'_> {
    #[must_use]
    pub fn target_side(&self) -> Side {
        self.user_side.opponent()
    }

    /// Pay the card's cost map, all or nothing.
    pub fn pay(&mut self) -> Result<(), ActionError> {
        self.user.pools.pay(&self.card.costs)
    }

    /// Hit the opponent for `base` of `element`.
    pub fn deal_damage(&mut self, base: f64, element: Element) -> DamageReport {
        self.combat
            .apply_elemental_damage(self.user_side, self.user, self.target, base, element)
    }

    /// Hit the opponent for `percent` of their max LP.
    pub fn deal_percentage_damage(&mut self, percent: f64, element: Element) -> DamageReport {
        let target_side = self.target_side();
        self.combat.apply_direct_percentage_damage(
            target_side,
            self.target,
            percent,
            element,
            Some(self.user_side),
        )
    }

    /// Add a factor to the card's owner. Returns false if refused.
    pub fn add_to_user(&mut self, kind: FactorKind, duration: u32) -> bool {
        let side = self.user_side;
        let added = self
            .combat
            .factors_mut()
            .add_factor(side, self.user, kind, duration)
            .is_ok();
        self.record_factor(side, kind, duration, added);
        added
    }

    /// Add a factor to the opponent. Returns false if refused.
    pub fn add_to_target(&mut self, kind: FactorKind, duration: u32) -> bool {
        let side = self.target_side();
        let added = self
            .combat
            .factors_mut()
            .add_factor(side, self.target, kind, duration)
            .is_ok();
        self.record_factor(side, kind, duration, added);
        added
    }

    /// Remove every factor of `tag` from the card's owner.
    pub fn cleanse_user(&mut self, tag: FactorTag) -> usize {
        let side = self.user_side;
        self.combat
            .factors_mut()
            .remove_all_factors(side, self.user, tag)
    }

    /// Gain `amount` of `pool` for the owner, clamped. Returns the gain.
    pub fn gain(&mut self, pool: Pool, amount: i64) -> i64 {
        let gained = self.user.pools.gain(pool, amount);
        if gained > 0 {
            self.combat.push_event(CombatEvent::ResourceGained {
                side: self.user_side,
                pool,
                amount: gained,
            });
        }
        gained
    }

    /// Ask the branch policy to pick one of `options`.
    pub fn choose(&mut self, options: &[&str]) -> usize {
        choose_clamped(self.policy, self.card, options)
    }

    fn record_factor(&mut self, side: Side, kind: FactorKind, duration: u32, added: bool) {
        if !added {
            return;
        }
        self.combat.push_event(CombatEvent::FactorApplied {
            side,
            tag: kind.tag(),
            duration,
        });
        if let FactorKind::Freeze { slot } = kind {
            self.combat.push_event(CombatEvent::CardFrozen {
                side,
                slot,
                turns: duration,
            });
        }
    }
}
