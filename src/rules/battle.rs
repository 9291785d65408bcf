//! Battle session: the action dispatcher.
//!
//! `Battle` owns both characters, the factor system, the turn state machine,
//! the crit stream and the event log, and wires them together:
//!
//! ## Using a card
//!
//! 1. Gates, all before any mutation: action lock (swift cards may bypass it
//!    when configured), empty slot, not usable, frozen.
//! 2. The effect bound to the card's key runs. It checks affordability,
//!    pays, then deals damage / adds factors / advances its phase. An `Err`
//!    rejects the action and nothing changes.
//! 3. Unless the card is swift, the turn's action lock is set.
//!
//! An unbound effect key is "no effect": the card still counts as used.
//!
//! ## Advancing the turn
//!
//! For the incoming side: factors tick, turn regeneration applies, ability
//! phases advance, `TurnStart` passives run. Then the lock clears, the side
//! flips and observers hear about the new turn.
//!
//! The battle never declares a winner; `defeated()` reports a side at 0 LP.

use std::sync::Arc;

use tracing::{debug, warn};

use super::turn::{TurnObserver, TurnStateMachine};
use crate::cards::{CardDefinition, CardType};
use crate::character::{Character, CharacterDefinition, StatusFlags};
use crate::combat::{Combat, CombatEvent};
use crate::core::{
    Action, ActionOutcome, ActionRecord, BattleConfig, GameRng, RandomSource, Side, SideMap,
};
use crate::effects::{
    AbilityPhase, BranchPolicy, EffectContext, EffectRegistry, FirstOption, PassiveFn,
    PassiveTrigger,
};
use crate::error::{ActionError, ConfigError, FactorError, IllegalAction};
use crate::factors::{FactorKind, FactorManager, TickReport};

/// A running battle between two characters.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use essence_duel::cards::{CardDefinition, CardId, CardType};
/// use essence_duel::character::{CharacterDefinition, Pool, PoolMaximums, ResourceCosts};
/// use essence_duel::core::{Action, BattleConfig, Side};
/// use essence_duel::effects::EffectRegistry;
/// use essence_duel::rules::Battle;
///
/// let maximums = PoolMaximums { lp: 100, ep: 20, mp: 50, up: 0 };
/// let attacker = CharacterDefinition::new("Kael", maximums).with_card(
///     CardDefinition::new(CardId::new(1), "Slash", CardType::BaseWeapon)
///         .with_costs(ResourceCosts::new().with(Pool::Ep, 5))
///         .with_effect("strike")
///         .with_attr("power", 60i64),
/// );
/// let defender = CharacterDefinition::new("Mira", maximums);
///
/// let registry = Arc::new(EffectRegistry::builtin());
/// let config = BattleConfig::default().without_crits();
/// let mut battle = Battle::new(&attacker, &defender, registry, config).unwrap();
/// battle.start();
///
/// battle.perform_action(Action::use_card(CardType::BaseWeapon)).unwrap();
/// assert_eq!(battle.character(Side::Defender).lp(), 40);
/// assert!(!battle.can_act());
/// ```
pub struct Battle {
    characters: SideMap<Character>,
    factors: FactorManager,
    turn: TurnStateMachine,
    rng: Box<dyn RandomSource>,
    config: BattleConfig,
    registry: Arc<EffectRegistry>,
    policy: Box<dyn BranchPolicy>,
    events: Vec<CombatEvent>,
    history: im::Vector<ActionRecord>,
    started: bool,
}

impl std::fmt::Debug for Battle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Battle")
            .field("characters", &self.characters)
            .field("factors", &self.factors)
            .field("turn", &self.turn)
            .field("config", &self.config)
            .field("events", &self.events.len())
            .field("history", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl Battle {
    /// Build a battle from content.
    ///
    /// Fails if a character has two cards in one slot, or if a key bound on
    /// a `Character` card is not registered.
    pub fn new(
        attacker: &CharacterDefinition,
        defender: &CharacterDefinition,
        registry: Arc<EffectRegistry>,
        config: BattleConfig,
    ) -> Result<Self, ConfigError> {
        let characters = SideMap::from_pair(
            Character::from_definition(attacker)?,
            Character::from_definition(defender)?,
        );
        for (_, character) in characters.iter() {
            validate_essential_keys(character, &registry)?;
        }

        Ok(Self {
            characters,
            factors: FactorManager::new(),
            turn: TurnStateMachine::new(),
            rng: Box::new(GameRng::new(config.seed)),
            config,
            registry,
            policy: Box::new(FirstOption),
            events: Vec::new(),
            history: im::Vector::new(),
            started: false,
        })
    }

    /// Replace the crit roll source (builder pattern).
    #[must_use]
    pub fn with_rng(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Replace the branch policy (builder pattern).
    #[must_use]
    pub fn with_policy(mut self, policy: impl BranchPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn add_observer(&mut self, observer: impl TurnObserver + 'static) {
        self.turn.add_observer(Box::new(observer));
    }

    /// Run `Equip` passives for both sides and announce turn 1. Idempotent.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        for side in Side::ALL {
            self.run_passives(side, PassiveTrigger::Equip);
        }
        let side = self.turn.active();
        self.events.push(CombatEvent::TurnStarted {
            side,
            turn: self.turn.turn_number(),
        });
        debug!(%side, "battle started");
        self.turn.announce();
    }

    /// Perform an action for the side to act.
    pub fn perform_action(&mut self, action: Action) -> Result<ActionOutcome, ActionError> {
        let side = self.turn.active();
        let turn = self.turn.turn_number();
        let outcome = match action {
            Action::UseCard { slot } => match self.use_card(side, slot) {
                Ok(outcome) => outcome,
                Err(err) => {
                    warn!(%side, %slot, %err, "action rejected");
                    self.events.push(CombatEvent::ActionRejected {
                        side,
                        reason: err.clone(),
                    });
                    return Err(err);
                }
            },
            Action::EndTurn => {
                self.advance_turn();
                ActionOutcome {
                    card: None,
                    resolved: false,
                    locked: false,
                }
            }
        };

        let sequence = self.history.len() as u32;
        self.history
            .push_back(ActionRecord::new(side, action, turn, sequence, outcome));
        Ok(outcome)
    }

    /// Hand the turn to the opponent. Always legal.
    pub fn advance_turn(&mut self) {
        let next = self.turn.active().opponent();

        let report = self
            .factors
            .tick(next, &mut self.characters[next], self.config.defense_mode);
        self.record_tick(next, report);

        for (pool, amount) in self.config.turn_regen.iter() {
            let gained = self.characters[next].pools.gain(pool, amount);
            if gained > 0 {
                self.events.push(CombatEvent::ResourceGained {
                    side: next,
                    pool,
                    amount: gained,
                });
            }
        }

        self.characters[next].equipment.advance_phases();
        self.run_passives(next, PassiveTrigger::TurnStart);

        self.turn.advance_turn();
        self.events.push(CombatEvent::TurnStarted {
            side: next,
            turn: self.turn.turn_number(),
        });
    }

    fn use_card(&mut self, side: Side, slot: CardType) -> Result<ActionOutcome, ActionError> {
        let definition = self.check_card(side, slot)?;
        let effect = match definition.effect_key.as_deref() {
            Some(key) => {
                let effect = self.registry.effect(key);
                if effect.is_none() {
                    debug!(%side, key, "unbound effect key, no effect");
                }
                effect
            }
            None => None,
        };

        if let Some(effect) = effect {
            let original = self.card_phase(side, slot);
            let mut phase = original;
            let result = {
                let (user, target) = self.characters.pair_mut(side);
                let mut ctx = EffectContext {
                    user_side: side,
                    user,
                    target,
                    card: &definition,
                    phase: &mut phase,
                    combat: Combat::new(
                        &mut self.factors,
                        &mut *self.rng,
                        &self.config,
                        &mut self.events,
                    ),
                    policy: &mut *self.policy,
                };
                effect(&mut ctx)
            };
            if let Some(card) = self.characters[side].card_mut(slot) {
                card.phase = if result.is_ok() { phase } else { original };
            }
            result?;
        }

        let locked = !definition.is_swift;
        if locked {
            self.turn.lock();
        }
        debug!(%side, card = %definition.id, swift = definition.is_swift, "card used");
        Ok(ActionOutcome {
            card: Some(definition.id),
            resolved: effect.is_some(),
            locked,
        })
    }

    /// Every gate that must pass before an effect may run.
    fn check_card(&self, side: Side, slot: CardType) -> Result<Arc<CardDefinition>, IllegalAction> {
        let card = self.characters[side].card(slot);
        if !self.turn.can_act() {
            let bypass = self.config.swift_bypasses_lock
                && card.is_some_and(|c| c.definition().is_swift);
            if !bypass {
                return Err(IllegalAction::ActionsLocked);
            }
        }

        let card = card.ok_or(IllegalAction::EmptySlot(slot))?;
        let definition = card.definition();
        if !definition.is_usable {
            return Err(IllegalAction::NotUsable(definition.id));
        }
        if card.is_frozen() {
            return Err(IllegalAction::CardFrozen {
                card: definition.id,
                turns: card.frozen_turns,
            });
        }
        Ok(Arc::clone(definition))
    }

    fn card_phase(&self, side: Side, slot: CardType) -> AbilityPhase {
        self.characters[side]
            .card(slot)
            .map(|card| card.phase)
            .unwrap_or_default()
    }

    fn run_passives(&mut self, side: Side, trigger: PassiveTrigger) {
        let passives: Vec<(CardType, Arc<CardDefinition>, PassiveFn)> = self.characters[side]
            .equipment
            .iter()
            .filter(|card| card.definition().has_passive)
            .filter_map(|card| {
                let key = card.definition().passive_key.as_deref()?;
                let passive = self.registry.passive(key)?;
                Some((card.card_type(), Arc::clone(card.definition()), passive))
            })
            .collect();

        for (slot, definition, passive) in passives {
            let mut phase = self.card_phase(side, slot);
            {
                let (user, target) = self.characters.pair_mut(side);
                let mut ctx = EffectContext {
                    user_side: side,
                    user,
                    target,
                    card: &definition,
                    phase: &mut phase,
                    combat: Combat::new(
                        &mut self.factors,
                        &mut *self.rng,
                        &self.config,
                        &mut self.events,
                    ),
                    policy: &mut *self.policy,
                };
                passive(&mut ctx, trigger);
            }
            if let Some(card) = self.characters[side].card_mut(slot) {
                card.phase = phase;
            }
        }
    }

    fn record_tick(&mut self, side: Side, report: TickReport) {
        for hit in report.damage {
            self.events.push(CombatEvent::DamageDealt(hit));
        }
        for (pool, amount) in report.gains {
            if amount > 0 {
                self.events.push(CombatEvent::ResourceGained { side, pool, amount });
            }
        }
        for tag in report.expired {
            self.events.push(CombatEvent::FactorExpired { side, tag });
        }
        for slot in report.unfrozen {
            self.events.push(CombatEvent::CardUnfrozen { side, slot });
        }
    }

    // === Queries ===

    #[must_use]
    pub fn character(&self, side: Side) -> &Character {
        &self.characters[side]
    }

    /// Direct access for scripted scenarios and tooling.
    pub fn character_mut(&mut self, side: Side) -> &mut Character {
        &mut self.characters[side]
    }

    #[must_use]
    pub fn factors(&self) -> &FactorManager {
        &self.factors
    }

    /// Add a factor from outside any card (scripted scenarios, tooling).
    pub fn add_factor(
        &mut self,
        side: Side,
        kind: FactorKind,
        duration: u32,
    ) -> Result<(), FactorError> {
        self.factors
            .add_factor(side, &mut self.characters[side], kind, duration)?;
        self.events.push(CombatEvent::FactorApplied {
            side,
            tag: kind.tag(),
            duration,
        });
        Ok(())
    }

    #[must_use]
    pub fn status(&self, side: Side) -> StatusFlags {
        self.factors.status(side)
    }

    #[must_use]
    pub fn has_frozen_cards(&self, side: Side) -> bool {
        self.characters[side].has_frozen_cards()
    }

    #[must_use]
    pub fn active_side(&self) -> Side {
        self.turn.active()
    }

    #[must_use]
    pub fn can_act(&self) -> bool {
        self.turn.can_act()
    }

    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn.turn_number()
    }

    #[must_use]
    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// The event log, oldest first.
    #[must_use]
    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    /// Take the event log, leaving it empty.
    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    /// Every accepted action, oldest first.
    #[must_use]
    pub fn history(&self) -> &im::Vector<ActionRecord> {
        &self.history
    }

    /// A side whose LP reached zero, attacker checked first.
    #[must_use]
    pub fn defeated(&self) -> Option<Side> {
        Side::ALL
            .into_iter()
            .find(|side| self.characters[*side].is_defeated())
    }

    /// Actions the side to act may attempt right now. Costs are not checked
    /// here; the effect checks them.
    #[must_use]
    pub fn legal_actions(&self) -> Vec<Action> {
        let side = self.turn.active();
        let mut actions: Vec<Action> = self.characters[side]
            .equipment
            .iter()
            .filter(|card| self.check_card(side, card.card_type()).is_ok())
            .map(|card| Action::use_card(card.card_type()))
            .collect();
        actions.push(Action::EndTurn);
        actions
    }
}

/// Keys bound on a `Character` card define the character and must resolve.
fn validate_essential_keys(character: &Character, registry: &EffectRegistry) -> Result<(), ConfigError> {
    let Some(card) = character.card(CardType::Character) else {
        return Ok(());
    };
    let definition = card.definition();
    let missing = |key: &str| ConfigError::MissingEssentialEffect {
        character: character.name.clone(),
        card: definition.id,
        key: key.to_string(),
    };

    if let Some(key) = definition.effect_key.as_deref() {
        if registry.effect(key).is_none() {
            return Err(missing(key));
        }
    }
    if let Some(key) = definition.passive_key.as_deref() {
        if registry.passive(key).is_none() {
            return Err(missing(key));
        }
    }
    Ok(())
}
