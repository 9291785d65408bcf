//! Battle dispatcher integration tests.
//!
//! These tests drive whole battles through `perform_action` and check the
//! gates, the turn lock, passives and the event log.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use essence_duel::cards::{CardDefinition, CardId, CardType, CharmKind};
use essence_duel::character::{CharacterDefinition, Pool, PoolMaximums, ResourceCosts};
use essence_duel::combat::CombatEvent;
use essence_duel::core::{Action, BattleConfig, Side};
use essence_duel::effects::{AbilityPhase, EffectRegistry, FixedChoice};
use essence_duel::error::{ActionError, ConfigError, IllegalAction};
use essence_duel::factors::{BoostStat, FactorTag};
use essence_duel::rules::{Battle, TurnSignal};

fn maximums() -> PoolMaximums {
    PoolMaximums { lp: 100, ep: 50, mp: 50, up: 0 }
}

fn strike(id: u32, slot: CardType, power: i64) -> CardDefinition {
    CardDefinition::new(CardId::new(id), "Strike", slot)
        .with_effect("strike")
        .with_attr("power", power)
}

fn battle(attacker: CharacterDefinition, defender: CharacterDefinition) -> Battle {
    battle_with(attacker, defender, BattleConfig::default().without_crits())
}

fn battle_with(attacker: CharacterDefinition, defender: CharacterDefinition, config: BattleConfig) -> Battle {
    let mut battle = Battle::new(&attacker, &defender, Arc::new(EffectRegistry::builtin()), config).unwrap();
    battle.start();
    battle
}

// =============================================================================
// Gates
// =============================================================================

/// A cost that cannot be covered rejects the second use and changes nothing.
#[test]
fn test_cannot_afford_second_use() {
    let bolt = strike(1, CardType::SkillW, 10)
        .with_costs(ResourceCosts::new().with(Pool::Mp, 40))
        .swift();
    let attacker = CharacterDefinition::new("Kael", maximums()).with_card(bolt);
    let defender = CharacterDefinition::new("Mira", maximums());
    let mut battle = battle(attacker, defender);

    battle.perform_action(Action::use_card(CardType::SkillW)).unwrap();
    assert_eq!(battle.character(Side::Attacker).pools.current(Pool::Mp), 10);
    assert_eq!(battle.character(Side::Defender).lp(), 90);

    let err = battle
        .perform_action(Action::use_card(CardType::SkillW))
        .unwrap_err();
    assert_eq!(
        err,
        ActionError::CannotAfford { key: Pool::Mp, required: 40, available: 10 }
    );
    assert_eq!(battle.character(Side::Attacker).pools.current(Pool::Mp), 10);
    assert_eq!(battle.character(Side::Defender).lp(), 90);
    assert_eq!(battle.history().len(), 1);
}

/// A non-swift action locks the turn until it advances.
#[test]
fn test_turn_lock() {
    let attacker = CharacterDefinition::new("Kael", maximums())
        .with_card(strike(1, CardType::BaseWeapon, 10))
        .with_card(strike(2, CardType::SkillE, 10));
    let defender = CharacterDefinition::new("Mira", maximums()).with_card(strike(3, CardType::BaseWeapon, 10));
    let mut battle = battle(attacker, defender);

    let outcome = battle.perform_action(Action::use_card(CardType::BaseWeapon)).unwrap();
    assert!(outcome.locked);
    assert!(!battle.can_act());

    let err = battle.perform_action(Action::use_card(CardType::SkillE)).unwrap_err();
    assert_eq!(err, ActionError::Illegal(IllegalAction::ActionsLocked));
    assert_eq!(battle.character(Side::Defender).lp(), 90);

    battle.perform_action(Action::EndTurn).unwrap();
    assert_eq!(battle.active_side(), Side::Defender);
    assert!(battle.can_act());

    battle.perform_action(Action::use_card(CardType::BaseWeapon)).unwrap();
    assert_eq!(battle.character(Side::Attacker).lp(), 90);
}

/// Swift cards never set the lock.
#[test]
fn test_swift_does_not_lock() {
    let attacker = CharacterDefinition::new("Kael", maximums())
        .with_card(strike(1, CardType::Potion, 5).swift())
        .with_card(strike(2, CardType::BaseWeapon, 10));
    let defender = CharacterDefinition::new("Mira", maximums());
    let mut battle = battle(attacker, defender);

    let outcome = battle.perform_action(Action::use_card(CardType::Potion)).unwrap();
    assert!(!outcome.locked);
    assert!(battle.can_act());

    battle.perform_action(Action::use_card(CardType::BaseWeapon)).unwrap();
    assert_eq!(battle.character(Side::Defender).lp(), 85);
}

/// Swift cards are rejected while locked unless the bypass is configured.
#[test]
fn test_swift_bypass_is_opt_in() {
    let attacker = || {
        CharacterDefinition::new("Kael", maximums())
            .with_card(strike(1, CardType::Potion, 5).swift())
            .with_card(strike(2, CardType::BaseWeapon, 10))
    };
    let defender = || CharacterDefinition::new("Mira", maximums());

    let mut strict = battle(attacker(), defender());
    strict.perform_action(Action::use_card(CardType::BaseWeapon)).unwrap();
    assert_eq!(
        strict.perform_action(Action::use_card(CardType::Potion)),
        Err(ActionError::Illegal(IllegalAction::ActionsLocked))
    );

    let config = BattleConfig::default().without_crits().swift_bypasses_lock();
    let mut relaxed = battle_with(attacker(), defender(), config);
    relaxed.perform_action(Action::use_card(CardType::BaseWeapon)).unwrap();
    relaxed.perform_action(Action::use_card(CardType::Potion)).unwrap();
    assert_eq!(relaxed.character(Side::Defender).lp(), 85);
    assert!(!relaxed.can_act());
}

#[test]
fn test_empty_slot_and_not_usable() {
    let attacker = CharacterDefinition::new("Kael", maximums())
        .with_card(CardDefinition::new(CardId::new(1), "Kael", CardType::Character));
    let defender = CharacterDefinition::new("Mira", maximums());
    let mut battle = battle(attacker, defender);

    assert_eq!(
        battle.perform_action(Action::use_card(CardType::SkillQ)),
        Err(ActionError::Illegal(IllegalAction::EmptySlot(CardType::SkillQ)))
    );
    assert_eq!(
        battle.perform_action(Action::use_card(CardType::Character)),
        Err(ActionError::Illegal(IllegalAction::NotUsable(CardId::new(1))))
    );
    assert!(battle.can_act());
    assert!(battle.history().is_empty());
}

/// Rejections are logged and leave no other trace.
#[test]
fn test_rejection_event() {
    let attacker = CharacterDefinition::new("Kael", maximums());
    let defender = CharacterDefinition::new("Mira", maximums());
    let mut battle = battle(attacker, defender);
    let before = battle.events().len();

    let _ = battle.perform_action(Action::use_card(CardType::SkillE));
    let events = &battle.events()[before..];
    assert_eq!(
        events,
        &[CombatEvent::ActionRejected {
            side: Side::Attacker,
            reason: ActionError::Illegal(IllegalAction::EmptySlot(CardType::SkillE)),
        }]
    );
}

// =============================================================================
// Freeze Across Turns
// =============================================================================

/// A Freeze of duration 2 blocks exactly one of the victim's turns.
#[test]
fn test_freeze_blocks_one_turn() {
    let attacker = CharacterDefinition::new("Kael", maximums()).with_card(
        CardDefinition::new(CardId::new(1), "Glacier", CardType::SkillQ)
            .with_effect("freeze")
            .with_attr("slot", "skill_e"),
    );
    let defender = CharacterDefinition::new("Mira", maximums()).with_card(strike(2, CardType::SkillE, 10));
    let mut battle = battle(attacker, defender);

    battle.perform_action(Action::use_card(CardType::SkillQ)).unwrap();
    assert!(battle.has_frozen_cards(Side::Defender));

    battle.perform_action(Action::EndTurn).unwrap();
    assert_eq!(
        battle.perform_action(Action::use_card(CardType::SkillE)),
        Err(ActionError::Illegal(IllegalAction::CardFrozen { card: CardId::new(2), turns: 1 }))
    );
    assert!(!battle.legal_actions().contains(&Action::use_card(CardType::SkillE)));

    battle.perform_action(Action::EndTurn).unwrap();
    battle.perform_action(Action::EndTurn).unwrap();

    assert!(!battle.has_frozen_cards(Side::Defender));
    assert!(!battle.factors().has_factor(Side::Defender, FactorTag::Freeze));
    battle.perform_action(Action::use_card(CardType::SkillE)).unwrap();
    assert_eq!(battle.character(Side::Attacker).lp(), 90);
    assert!(battle
        .events()
        .contains(&CombatEvent::CardUnfrozen { side: Side::Defender, slot: CardType::SkillE }));
}

// =============================================================================
// Passives and Phases
// =============================================================================

#[test]
fn test_equip_passive_runs_once() {
    let charm = CardDefinition::new(CardId::new(1), "Aegis", CardType::Charm(CharmKind::Defense))
        .with_passive("stat_bonus")
        .with_attr("stat", "defense")
        .with_attr("percent", 50i64);
    let attacker = CharacterDefinition::new("Kael", maximums())
        .with_defense(10.0, 0.0)
        .with_card(charm);
    let defender = CharacterDefinition::new("Mira", maximums());
    let mut battle = battle(attacker, defender);

    assert_eq!(battle.character(Side::Attacker).defense.def, 15.0);
    battle.start();
    assert_eq!(battle.character(Side::Attacker).defense.def, 15.0);
}

#[test]
fn test_turn_start_passive() {
    let charm = CardDefinition::new(CardId::new(1), "Well", CardType::Charm(CharmKind::Utility))
        .with_passive("turn_regeneration")
        .with_attr("amount", 10i64);
    let attacker = CharacterDefinition::new("Kael", maximums()).with_card(charm);
    let defender = CharacterDefinition::new("Mira", maximums());
    let mut battle = battle(attacker, defender);
    battle.character_mut(Side::Attacker).pools.spend(Pool::Mp, 30).unwrap();

    battle.perform_action(Action::EndTurn).unwrap();
    assert_eq!(battle.character(Side::Attacker).pools.current(Pool::Mp), 20);

    battle.perform_action(Action::EndTurn).unwrap();
    assert_eq!(battle.character(Side::Attacker).pools.current(Pool::Mp), 30);
}

/// Charge on one turn, discharge for free on later turns.
#[test]
fn test_storm_charge_phases() {
    let storm = CardDefinition::new(CardId::new(1), "Storm", CardType::Ultimate)
        .with_effect("storm_charge")
        .with_costs(ResourceCosts::new().with(Pool::Mp, 30))
        .with_attr("charges", 2i64)
        .with_attr("power", 20i64)
        .swift();
    let attacker = CharacterDefinition::new("Kael", maximums()).with_card(storm);
    let defender = CharacterDefinition::new("Mira", maximums());
    let mut battle = battle(attacker, defender);

    battle.perform_action(Action::use_card(CardType::Ultimate)).unwrap();
    assert_eq!(battle.character(Side::Attacker).pools.current(Pool::Mp), 20);
    assert_eq!(
        battle.perform_action(Action::use_card(CardType::Ultimate)),
        Err(ActionError::Illegal(IllegalAction::NotReady(CardId::new(1))))
    );

    battle.perform_action(Action::EndTurn).unwrap();
    battle.perform_action(Action::EndTurn).unwrap();

    battle.perform_action(Action::use_card(CardType::Ultimate)).unwrap();
    battle.perform_action(Action::use_card(CardType::Ultimate)).unwrap();
    assert_eq!(battle.character(Side::Defender).lp(), 60);
    assert_eq!(battle.character(Side::Attacker).pools.current(Pool::Mp), 20);
    assert_eq!(
        battle.character(Side::Attacker).card(CardType::Ultimate).unwrap().phase,
        AbilityPhase::Idle
    );
}

#[test]
fn test_branch_policy() {
    let cry = CardDefinition::new(CardId::new(1), "War Cry", CardType::SkillE).with_effect("war_cry");
    let attacker = CharacterDefinition::new("Kael", maximums()).with_card(cry);
    let defender = CharacterDefinition::new("Mira", maximums());
    let mut battle = Battle::new(
        &attacker,
        &defender,
        Arc::new(EffectRegistry::builtin()),
        BattleConfig::default(),
    )
    .unwrap()
    .with_policy(FixedChoice(1));
    battle.start();

    battle.perform_action(Action::use_card(CardType::SkillE)).unwrap();
    assert_eq!(battle.factors().stat_boost(Side::Attacker, BoostStat::Defense), 20.0);
    assert_eq!(battle.factors().stat_boost(Side::Attacker, BoostStat::Damage), 0.0);
}

// =============================================================================
// Construction, History, Observers
// =============================================================================

#[test]
fn test_essential_key_validation() {
    let attacker = CharacterDefinition::new("Kael", maximums()).with_card(
        CardDefinition::new(CardId::new(1), "Kael", CardType::Character).with_passive("missing"),
    );
    let defender = CharacterDefinition::new("Mira", maximums());

    let err = Battle::new(&attacker, &defender, Arc::new(EffectRegistry::builtin()), BattleConfig::default())
        .unwrap_err();
    assert!(matches!(err, ConfigError::MissingEssentialEffect { ref key, .. } if key == "missing"));
}

#[test]
fn test_duplicate_slot_rejected() {
    let attacker = CharacterDefinition::new("Kael", maximums())
        .with_card(strike(1, CardType::SkillE, 10))
        .with_card(strike(2, CardType::SkillE, 20));
    let defender = CharacterDefinition::new("Mira", maximums());

    let err = Battle::new(&attacker, &defender, Arc::new(EffectRegistry::builtin()), BattleConfig::default())
        .unwrap_err();
    assert_eq!(
        err,
        ConfigError::DuplicateSlot { character: "Kael".to_string(), slot: CardType::SkillE }
    );
}

#[test]
fn test_history_records_accepted_actions() {
    let attacker = CharacterDefinition::new("Kael", maximums()).with_card(strike(1, CardType::BaseWeapon, 10));
    let defender = CharacterDefinition::new("Mira", maximums());
    let mut battle = battle(attacker, defender);

    battle.perform_action(Action::use_card(CardType::BaseWeapon)).unwrap();
    let _ = battle.perform_action(Action::use_card(CardType::BaseWeapon));
    battle.perform_action(Action::EndTurn).unwrap();

    let history: Vec<_> = battle.history().iter().cloned().collect();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].sequence, 0);
    assert_eq!(history[0].turn, 1);
    assert_eq!(history[0].outcome.card, Some(CardId::new(1)));
    assert_eq!(history[1].action, Action::EndTurn);
    assert_eq!(history[1].side, Side::Attacker);
    assert_eq!(history[1].turn, 1);
}

#[test]
fn test_observers() {
    let attacker = CharacterDefinition::new("Kael", maximums()).with_card(strike(1, CardType::BaseWeapon, 10));
    let defender = CharacterDefinition::new("Mira", maximums());
    let mut battle = Battle::new(
        &attacker,
        &defender,
        Arc::new(EffectRegistry::builtin()),
        BattleConfig::default(),
    )
    .unwrap();

    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    battle.add_observer(move |signal: TurnSignal, turn: u32| sink.borrow_mut().push((signal, turn)));

    battle.start();
    battle.perform_action(Action::use_card(CardType::BaseWeapon)).unwrap();
    battle.perform_action(Action::EndTurn).unwrap();

    assert_eq!(
        *log.borrow(),
        vec![
            (TurnSignal::AttackerTurnBegan, 1),
            (TurnSignal::ActionLocked, 1),
            (TurnSignal::DefenderTurnBegan, 2),
        ]
    );
}

#[test]
fn test_defeated() {
    let attacker = CharacterDefinition::new("Kael", maximums()).with_card(strike(1, CardType::BaseWeapon, 150));
    let defender = CharacterDefinition::new("Mira", maximums());
    let mut battle = battle(attacker, defender);

    assert_eq!(battle.defeated(), None);
    battle.perform_action(Action::use_card(CardType::BaseWeapon)).unwrap();
    assert_eq!(battle.character(Side::Defender).lp(), 0);
    assert_eq!(battle.defeated(), Some(Side::Defender));
}
