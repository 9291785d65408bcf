//! Damage computation pipeline.
//!
//! Every hit runs the same fixed stages:
//!
//! 1. Element bonus of the user, then the user's Damage boost
//! 2. Crit roll: `roll < crit_rate` multiplies by the crit damage
//! 3. Shield absorption on the target, in insertion order
//! 4. Defense mitigation: DEF for Normal hits, EssenceDEF for every other
//!    element, nothing for Absolute
//! 5. LP subtraction, floored at zero
//!
//! Percentage damage and Burning ticks skip stages 1 and 2. An immune target
//! takes nothing and keeps its shields.
//!
//! ## Example
//!
//! ```
//! use essence_duel::character::{Character, CharacterDefinition, PoolMaximums};
//! use essence_duel::combat::Combat;
//! use essence_duel::core::{BattleConfig, FixedRoll, Side};
//! use essence_duel::factors::FactorManager;
//!
//! let def = CharacterDefinition::new("Dummy", PoolMaximums { lp: 100, ep: 0, mp: 0, up: 0 });
//! let user = Character::from_definition(&def).unwrap();
//! let mut target = Character::from_definition(&def).unwrap();
//!
//! let mut factors = FactorManager::new();
//! let mut rng = FixedRoll::never();
//! let config = BattleConfig::default();
//! let mut events = Vec::new();
//! let mut combat = Combat::new(&mut factors, &mut rng, &config, &mut events);
//!
//! let report = combat.apply_normal_damage(Side::Attacker, &user, &mut target, 60.0);
//! assert_eq!(report.dealt, 60);
//! assert_eq!(target.lp(), 40);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::event::CombatEvent;
use crate::character::{Character, Element, Pool};
use crate::core::{BattleConfig, DefenseMode, RandomSource, Side};
use crate::factors::{BoostStat, FactorManager, FactorTag};

/// Breakdown of one hit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DamageReport {
    /// Attacking side. `None` for periodic damage.
    pub source: Option<Side>,
    pub target: Side,
    pub element: Element,
    /// Amount before bonuses.
    pub base: f64,
    /// Amount after bonuses and crit, entering the shield stage.
    pub amount: f64,
    pub crit: bool,
    pub absorbed: f64,
    /// Removed by defense.
    pub mitigated: f64,
    /// LP actually lost.
    pub dealt: i64,
    /// Target was immune; nothing happened.
    pub immune: bool,
}

impl DamageReport {
    #[must_use]
    pub fn new(source: Option<Side>, target: Side, element: Element, base: f64) -> Self {
        Self {
            source,
            target,
            element,
            base,
            amount: base.max(0.0),
            crit: false,
            absorbed: 0.0,
            mitigated: 0.0,
            dealt: 0,
            immune: false,
        }
    }
}

/// Defense stat mitigating a hit of `element`, with boosts applied.
fn defense_against(factors: &FactorManager, side: Side, target: &Character, element: Element) -> f64 {
    if element.is_essence() {
        target.defense.essence_def * (1.0 + factors.stat_boost(side, BoostStat::EssenceDefense) / 100.0)
    } else {
        target.defense.def * (1.0 + factors.stat_boost(side, BoostStat::Defense) / 100.0)
    }
}

/// Stages 3 to 5 for `report.amount` against `target` on `side`.
pub(crate) fn land_hit(
    factors: &mut FactorManager,
    side: Side,
    target: &mut Character,
    mode: DefenseMode,
    report: &mut DamageReport,
) {
    if factors.has_factor(side, FactorTag::Immunity) {
        report.immune = true;
        return;
    }

    let element = report.element;
    report.absorbed = factors.absorb(side, element, report.amount);
    let after_shield = (report.amount - report.absorbed).max(0.0);

    let after_defense = if element == Element::Absolute {
        after_shield
    } else {
        mode.mitigate(after_shield, defense_against(factors, side, target, element))
    };
    report.mitigated = after_shield - after_defense;
    report.dealt = target.pools.drain(Pool::Lp, after_defense.round() as i64);
}

/// Damage calculator bound to one battle's factor system, crit stream,
/// configuration and event log.
pub struct Combat<'a> {
    factors: &'a mut FactorManager,
    rng: &'a mut dyn RandomSource,
    config: &'a BattleConfig,
    events: &'a mut Vec<CombatEvent>,
}

impl<'a> Combat<'a> {
    pub fn new(
        factors: &'a mut FactorManager,
        rng: &'a mut dyn RandomSource,
        config: &'a BattleConfig,
        events: &'a mut Vec<CombatEvent>,
    ) -> Self {
        Self {
            factors,
            rng,
            config,
            events,
        }
    }

    #[must_use]
    pub fn factors(&self) -> &FactorManager {
        &*self.factors
    }

    pub fn factors_mut(&mut self) -> &mut FactorManager {
        &mut *self.factors
    }

    #[must_use]
    pub fn config(&self) -> &BattleConfig {
        self.config
    }

    pub fn rng(&mut self) -> &mut dyn RandomSource {
        &mut *self.rng
    }

    /// Append to the battle's event log.
    pub fn push_event(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    /// Normal-element hit from `user` on the opponent.
    pub fn apply_normal_damage(
        &mut self,
        user_side: Side,
        user: &Character,
        target: &mut Character,
        base: f64,
    ) -> DamageReport {
        self.apply_elemental_damage(user_side, user, target, base, Element::Normal)
    }

    /// Hit of `element` from `user` on the opponent, through every stage.
    pub fn apply_elemental_damage(
        &mut self,
        user_side: Side,
        user: &Character,
        target: &mut Character,
        base: f64,
        element: Element,
    ) -> DamageReport {
        let mut report = DamageReport::new(Some(user_side), user_side.opponent(), element, base);

        let boost = self.factors.stat_boost(user_side, BoostStat::Damage);
        report.amount = (user.bonuses.get(element).apply(report.amount) * (1.0 + boost / 100.0)).max(0.0);

        if self.config.crit_enabled {
            let rate = user.crit.rate + self.factors.stat_boost(user_side, BoostStat::CritRate) / 100.0;
            if self.rng.next_unit() < rate {
                report.crit = true;
                report.amount *= user.crit.damage;
            }
        }

        self.land(target, report)
    }

    /// `percent` of the target's max LP, through shields and mitigation only.
    pub fn apply_direct_percentage_damage(
        &mut self,
        target_side: Side,
        target: &mut Character,
        percent: f64,
        element: Element,
        source: Option<Side>,
    ) -> DamageReport {
        let base = target.pools.lp.max as f64 * percent / 100.0;
        let report = DamageReport::new(source, target_side, element, base);
        self.land(target, report)
    }

    /// True if any of the character's cards is frozen.
    #[must_use]
    pub fn has_frozen_cards(character: &Character) -> bool {
        character.has_frozen_cards()
    }

    fn land(&mut self, target: &mut Character, mut report: DamageReport) -> DamageReport {
        let side = report.target;
        land_hit(self.factors, side, target, self.config.defense_mode, &mut report);
        debug!(
            target = %side,
            element = %report.element,
            base = report.base,
            amount = report.amount,
            crit = report.crit,
            absorbed = report.absorbed,
            mitigated = report.mitigated,
            dealt = report.dealt,
            immune = report.immune,
            "damage"
        );
        self.events.push(CombatEvent::DamageDealt(report));

        if report.dealt > 0 {
            if let Some(attacker) = report.source {
                if let Some((slot, turns)) = self.factors.on_damage_dealt(attacker, target) {
                    self.events.push(CombatEvent::CardFrozen { side, slot, turns });
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{CharacterDefinition, DamageBonus, PoolMaximums};
    use crate::core::FixedRoll;
    use crate::factors::{FactorKind, ShieldFilter};

    fn character(lp: i64) -> Character {
        let def = CharacterDefinition::new("Test", PoolMaximums { lp, ep: 0, mp: 0, up: 0 });
        Character::from_definition(&def).unwrap()
    }

    #[test]
    fn test_normal_damage_mitigated_by_def() {
        let mut factors = FactorManager::new();
        let mut rng = FixedRoll::never();
        let config = BattleConfig::default();
        let mut events = Vec::new();
        let mut combat = Combat::new(&mut factors, &mut rng, &config, &mut events);

        let user = character(100);
        let mut target = character(100);
        target.defense.def = 15.0;
        target.defense.essence_def = 50.0;

        let report = combat.apply_normal_damage(Side::Attacker, &user, &mut target, 60.0);
        assert_eq!(report.mitigated, 15.0);
        assert_eq!(report.dealt, 45);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_elemental_uses_essence_def_and_bonus() {
        let mut factors = FactorManager::new();
        let mut rng = FixedRoll::never();
        let config = BattleConfig::default();
        let mut events = Vec::new();
        let mut combat = Combat::new(&mut factors, &mut rng, &config, &mut events);

        let mut user = character(100);
        *user.bonuses.get_mut(Element::Fire) = DamageBonus { flat: 10.0, percent: 0.0 };
        let mut target = character(200);
        target.defense.def = 100.0;
        target.defense.essence_def = 5.0;

        let report = combat.apply_elemental_damage(Side::Attacker, &user, &mut target, 40.0, Element::Fire);
        assert_eq!(report.amount, 50.0);
        assert_eq!(report.dealt, 45);
    }

    #[test]
    fn test_absolute_skips_defense() {
        let mut factors = FactorManager::new();
        let mut rng = FixedRoll::never();
        let config = BattleConfig::default();
        let mut events = Vec::new();
        let mut combat = Combat::new(&mut factors, &mut rng, &config, &mut events);

        let user = character(100);
        let mut target = character(100);
        target.defense.essence_def = 30.0;

        let report =
            combat.apply_elemental_damage(Side::Defender, &user, &mut target, 25.0, Element::Absolute);
        assert_eq!(report.target, Side::Attacker);
        assert_eq!(report.dealt, 25);
    }

    #[test]
    fn test_crit_roll() {
        let mut factors = FactorManager::new();
        let mut rng = FixedRoll(0.1);
        let config = BattleConfig::default();
        let mut events = Vec::new();
        let mut combat = Combat::new(&mut factors, &mut rng, &config, &mut events);

        let mut user = character(100);
        user.crit.rate = 0.2;
        user.crit.damage = 2.0;
        let mut target = character(100);

        let report = combat.apply_normal_damage(Side::Attacker, &user, &mut target, 20.0);
        assert!(report.crit);
        assert_eq!(report.dealt, 40);

        user.crit.rate = 0.1;
        let report = combat.apply_normal_damage(Side::Attacker, &user, &mut target, 20.0);
        assert!(!report.crit);
        assert_eq!(report.dealt, 20);
    }

    #[test]
    fn test_crit_disabled() {
        let mut factors = FactorManager::new();
        let mut rng = FixedRoll::always();
        let config = BattleConfig::default().without_crits();
        let mut events = Vec::new();
        let mut combat = Combat::new(&mut factors, &mut rng, &config, &mut events);

        let mut user = character(100);
        user.crit.rate = 1.0;
        let mut target = character(100);

        let report = combat.apply_normal_damage(Side::Attacker, &user, &mut target, 20.0);
        assert!(!report.crit);
        assert_eq!(target.lp(), 80);
    }

    #[test]
    fn test_immune_target_keeps_shield() {
        let mut factors = FactorManager::new();
        let mut target = character(100);
        factors
            .add_factor(Side::Defender, &mut target, FactorKind::Immunity, 1)
            .unwrap();
        let shield = FactorKind::Shield { capacity: 30.0, filter: ShieldFilter::Any };
        factors.add_factor(Side::Defender, &mut target, shield, 1).unwrap();

        let mut rng = FixedRoll::never();
        let config = BattleConfig::default();
        let mut events = Vec::new();
        let mut combat = Combat::new(&mut factors, &mut rng, &config, &mut events);

        let user = character(100);
        let report = combat.apply_normal_damage(Side::Attacker, &user, &mut target, 50.0);
        assert!(report.immune);
        assert_eq!(report.dealt, 0);
        assert_eq!(target.lp(), 100);
        assert_eq!(combat.factors().shield_capacity(Side::Defender, Element::Normal), 30.0);
    }

    #[test]
    fn test_lp_floors_at_zero() {
        let mut factors = FactorManager::new();
        let mut rng = FixedRoll::never();
        let config = BattleConfig::default();
        let mut events = Vec::new();
        let mut combat = Combat::new(&mut factors, &mut rng, &config, &mut events);

        let user = character(100);
        let mut target = character(30);
        let report = combat.apply_normal_damage(Side::Attacker, &user, &mut target, 500.0);
        assert_eq!(report.dealt, 30);
        assert_eq!(target.lp(), 0);
        assert!(target.is_defeated());
    }

    #[test]
    fn test_percentage_of_max_lp() {
        let mut factors = FactorManager::new();
        let mut rng = FixedRoll::always();
        let config = BattleConfig::default();
        let mut events = Vec::new();
        let mut combat = Combat::new(&mut factors, &mut rng, &config, &mut events);

        let mut target = character(1000);
        target.pools.drain(Pool::Lp, 500);
        let report =
            combat.apply_direct_percentage_damage(Side::Defender, &mut target, 10.0, Element::Darkness, None);
        assert_eq!(report.base, 100.0);
        assert!(!report.crit);
        assert_eq!(target.lp(), 400);
    }
}
