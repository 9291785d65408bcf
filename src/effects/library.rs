//! Built-in effect catalog.
//!
//! A small reference set of effects and passives that content can bind to by
//! key. Each effect reads its parameters from the card's attributes and
//! falls back to the defaults listed here.
//!
//! ## Effects
//!
//! | Key | Attributes (default) |
//! |---|---|
//! | `strike` | `power` (0) |
//! | `elemental_strike` | `power` (0), `element` (user essence) |
//! | `ignite` | `power` (0), `burn` (10), `duration` (3), `element` (fire) |
//! | `kindle` | `percent` (50), `duration` (3) |
//! | `barrier` | `capacity` (50), `filter` (any), `duration` (2) |
//! | `mend` | `pool` (LP), `amount` (20), `duration` (3) |
//! | `restore` | `pool` (LP), `amount` (30) |
//! | `frost_touch` | `slot` (skill_e), `turns` (2), `duration` (2) |
//! | `freeze` | `slot` (skill_e), `duration` (2) |
//! | `sanctuary` | `duration` (1) |
//! | `execute` | `percent` (10), `element` (normal) |
//! | `war_cry` | `percent` (20), `duration` (2); branch: damage / defense |
//! | `storm_charge` | `charges` (3), `power` (30), `element` (electricity) |
//! | `cold_snap` | `power` (20), `frozen_multiplier` (2), `slot` (skill_e), `duration` (2) |
//! | `focus_blast` | `power` (20), `percent_per_turn` (50), `max_turns` (3), `element` (user essence) |
//! | `heavy_strike` | `power` (40), `cooldown` (2), `element` (normal) |
//!
//! A factor ticks at the start of its holder's own turn, so a Freeze placed
//! on the opponent needs a duration of 2 to block one of their turns.
//!
//! ## Passives
//!
//! | Key | Trigger | Attributes (default) |
//! |---|---|---|
//! | `stat_bonus` | Equip | `stat` (damage), `percent` (10) |
//! | `turn_regeneration` | TurnStart | `pool` (MP), `amount` (10) |

use strum::IntoEnumIterator;

use super::context::EffectContext;
use super::phase::AbilityPhase;
use super::registry::{EffectFn, PassiveFn, PassiveTrigger};
use crate::cards::{CardDefinition, CardType};
use crate::character::{Element, Pool};
use crate::combat::Combat;
use crate::error::{ActionError, IllegalAction};
use crate::factors::{BoostStat, FactorKind, FactorTag, ShieldFilter};

/// Built-in active effects by key.
pub const EFFECTS: &[(&str, EffectFn)] = &[
    ("strike", strike),
    ("elemental_strike", elemental_strike),
    ("ignite", ignite),
    ("kindle", kindle),
    ("barrier", barrier),
    ("mend", mend),
    ("restore", restore),
    ("frost_touch", frost_touch),
    ("freeze", freeze),
    ("sanctuary", sanctuary),
    ("execute", execute),
    ("war_cry", war_cry),
    ("storm_charge", storm_charge),
    ("cold_snap", cold_snap),
    ("focus_blast", focus_blast),
    ("heavy_strike", heavy_strike),
];

/// Built-in passives by key.
pub const PASSIVES: &[(&str, PassiveFn)] = &[
    ("stat_bonus", stat_bonus),
    ("turn_regeneration", turn_regeneration),
];

fn turns(card: &CardDefinition, key: &str, default: u32) -> u32 {
    u32::try_from(card.get_int(key, i64::from(default))).unwrap_or(0)
}

fn pool(card: &CardDefinition, key: &str, default: Pool) -> Pool {
    card.get_text(key)
        .and_then(|s| Pool::parse(s).ok())
        .unwrap_or(default)
}

fn slot(card: &CardDefinition, key: &str) -> CardType {
    card.get_slot(key).unwrap_or(CardType::SkillE)
}

fn shield_filter(text: Option<&str>) -> ShieldFilter {
    match text.map(str::to_ascii_lowercase).as_deref() {
        None | Some("any") => ShieldFilter::Any,
        Some("normal") => ShieldFilter::Normal,
        Some("essence") => ShieldFilter::Essence,
        Some(other) => other
            .parse::<Element>()
            .map_or(ShieldFilter::Any, ShieldFilter::Element),
    }
}

fn strike(ctx: &mut EffectContext<'_>) -> Result<(), ActionError> {
    ctx.pay()?;
    let power = ctx.card.get_float("power", 0.0);
    ctx.deal_damage(power, Element::Normal);
    Ok(())
}

fn elemental_strike(ctx: &mut EffectContext<'_>) -> Result<(), ActionError> {
    ctx.pay()?;
    let power = ctx.card.get_float("power", 0.0);
    let element = ctx.card.get_element("element", ctx.user.essence);
    ctx.deal_damage(power, element);
    Ok(())
}

fn ignite(ctx: &mut EffectContext<'_>) -> Result<(), ActionError> {
    ctx.pay()?;
    let element = ctx.card.get_element("element", Element::Fire);
    let power = ctx.card.get_float("power", 0.0);
    if power > 0.0 {
        ctx.deal_damage(power, element);
    }

    let boost = ctx.combat.factors().burning_boost(ctx.user_side);
    let damage = ctx.card.get_float("burn", 10.0) * (1.0 + boost / 100.0);
    let duration = turns(ctx.card, "duration", 3);
    ctx.add_to_target(FactorKind::Burning { damage, element }, duration);
    Ok(())
}

fn kindle(ctx: &mut EffectContext<'_>) -> Result<(), ActionError> {
    ctx.pay()?;
    let percent = ctx.card.get_float("percent", 50.0);
    let duration = turns(ctx.card, "duration", 3);
    ctx.add_to_user(FactorKind::BurningDamageBoost { percent }, duration);
    Ok(())
}

fn barrier(ctx: &mut EffectContext<'_>) -> Result<(), ActionError> {
    ctx.pay()?;
    let capacity = ctx.card.get_float("capacity", 50.0);
    let filter = shield_filter(ctx.card.get_text("filter"));
    let duration = turns(ctx.card, "duration", 2);
    ctx.add_to_user(FactorKind::Shield { capacity, filter }, duration);
    Ok(())
}

fn mend(ctx: &mut EffectContext<'_>) -> Result<(), ActionError> {
    ctx.pay()?;
    let pool = pool(ctx.card, "pool", Pool::Lp);
    let amount = ctx.card.get_int("amount", 20);
    let duration = turns(ctx.card, "duration", 3);
    ctx.add_to_user(FactorKind::Regeneration { pool, amount }, duration);
    Ok(())
}

fn restore(ctx: &mut EffectContext<'_>) -> Result<(), ActionError> {
    ctx.pay()?;
    let pool = pool(ctx.card, "pool", Pool::Lp);
    let amount = ctx.card.get_int("amount", 30);
    ctx.gain(pool, amount);
    Ok(())
}

fn frost_touch(ctx: &mut EffectContext<'_>) -> Result<(), ActionError> {
    ctx.pay()?;
    let slot = slot(ctx.card, "slot");
    let freeze_turns = turns(ctx.card, "turns", 2);
    let duration = turns(ctx.card, "duration", 2);
    ctx.add_to_user(FactorKind::FrostTouch { slot, turns: freeze_turns }, duration);
    Ok(())
}

fn freeze(ctx: &mut EffectContext<'_>) -> Result<(), ActionError> {
    ctx.pay()?;
    let slot = slot(ctx.card, "slot");
    let duration = turns(ctx.card, "duration", 2);
    ctx.add_to_target(FactorKind::Freeze { slot }, duration);
    Ok(())
}

fn sanctuary(ctx: &mut EffectContext<'_>) -> Result<(), ActionError> {
    ctx.pay()?;
    ctx.cleanse_user(FactorTag::Burning);
    ctx.cleanse_user(FactorTag::Freeze);
    let duration = turns(ctx.card, "duration", 1);
    ctx.add_to_user(FactorKind::Immunity, duration);
    Ok(())
}

fn execute(ctx: &mut EffectContext<'_>) -> Result<(), ActionError> {
    ctx.pay()?;
    let percent = ctx.card.get_float("percent", 10.0);
    let element = ctx.card.get_element("element", Element::Normal);
    ctx.deal_percentage_damage(percent, element);
    Ok(())
}

fn war_cry(ctx: &mut EffectContext<'_>) -> Result<(), ActionError> {
    ctx.pay()?;
    let stat = match ctx.choose(&["damage", "defense"]) {
        0 => BoostStat::Damage,
        _ => BoostStat::Defense,
    };
    let percent = ctx.card.get_float("percent", 20.0);
    let duration = turns(ctx.card, "duration", 2);
    ctx.add_to_user(FactorKind::StatBoost { stat, percent }, duration);
    Ok(())
}

/// First use pays and charges; later uses discharge one charge each, free,
/// starting the owner's next turn.
fn storm_charge(ctx: &mut EffectContext<'_>) -> Result<(), ActionError> {
    match *ctx.phase {
        AbilityPhase::Active {
            turns_since_activation: 0,
            ..
        } => Err(IllegalAction::NotReady(ctx.card.id).into()),
        AbilityPhase::Active { .. } => {
            let power = ctx.card.get_float("power", 30.0);
            let element = ctx.card.get_element("element", Element::Electricity);
            ctx.deal_damage(power, element);
            ctx.phase.consume_charge();
            Ok(())
        }
        _ => {
            ctx.pay()?;
            let charges = turns(ctx.card, "charges", 3).max(1);
            *ctx.phase = AbilityPhase::active(charges);
            Ok(())
        }
    }
}

/// Shatters frozen cards for extra damage, otherwise chills and freezes.
fn cold_snap(ctx: &mut EffectContext<'_>) -> Result<(), ActionError> {
    ctx.pay()?;
    let power = ctx.card.get_float("power", 20.0);
    if Combat::has_frozen_cards(ctx.target) {
        let multiplier = ctx.card.get_float("frozen_multiplier", 2.0);
        ctx.deal_damage(power * multiplier, Element::Ice);
    } else {
        ctx.deal_damage(power, Element::Ice);
        let slot = slot(ctx.card, "slot");
        let duration = turns(ctx.card, "duration", 2);
        ctx.add_to_target(FactorKind::Freeze { slot }, duration);
    }
    Ok(())
}

/// The first use pays and starts charging. Any later use, once at least one
/// owner turn has passed, releases the blast at `power` plus
/// `percent_per_turn` for every turn waited (capped at `max_turns`).
fn focus_blast(ctx: &mut EffectContext<'_>) -> Result<(), ActionError> {
    match *ctx.phase {
        AbilityPhase::Charging { turns_waited: 0 } => Err(IllegalAction::NotReady(ctx.card.id).into()),
        AbilityPhase::Charging { turns_waited } => {
            let waited = turns_waited.min(turns(ctx.card, "max_turns", 3));
            let step = ctx.card.get_float("percent_per_turn", 50.0);
            let power = ctx.card.get_float("power", 20.0) * (1.0 + f64::from(waited) * step / 100.0);
            let element = ctx.card.get_element("element", ctx.user.essence);
            ctx.deal_damage(power, element);
            *ctx.phase = AbilityPhase::Idle;
            Ok(())
        }
        _ => {
            ctx.pay()?;
            *ctx.phase = AbilityPhase::Charging { turns_waited: 0 };
            Ok(())
        }
    }
}

/// Usable again `cooldown` owner turns after each hit.
fn heavy_strike(ctx: &mut EffectContext<'_>) -> Result<(), ActionError> {
    if let AbilityPhase::Counter { .. } = *ctx.phase {
        return Err(IllegalAction::NotReady(ctx.card.id).into());
    }
    ctx.pay()?;
    let power = ctx.card.get_float("power", 40.0);
    let element = ctx.card.get_element("element", Element::Normal);
    ctx.deal_damage(power, element);
    let cooldown = turns(ctx.card, "cooldown", 2);
    if cooldown > 0 {
        *ctx.phase = AbilityPhase::Counter { remaining: cooldown };
    }
    Ok(())
}

fn stat_bonus(ctx: &mut EffectContext<'_>, trigger: PassiveTrigger) {
    if trigger != PassiveTrigger::Equip {
        return;
    }
    let percent = ctx.card.get_float("percent", 10.0);
    let stat = ctx
        .card
        .get_text("stat")
        .and_then(|s| s.parse().ok())
        .unwrap_or(BoostStat::Damage);

    let user = &mut *ctx.user;
    match stat {
        BoostStat::Damage => {
            for element in Element::iter() {
                user.bonuses.get_mut(element).percent += percent;
            }
        }
        BoostStat::Defense => user.defense.def *= 1.0 + percent / 100.0,
        BoostStat::EssenceDefense => user.defense.essence_def *= 1.0 + percent / 100.0,
        BoostStat::CritRate => user.crit.rate += percent / 100.0,
    }
}

fn turn_regeneration(ctx: &mut EffectContext<'_>, trigger: PassiveTrigger) {
    if trigger != PassiveTrigger::TurnStart {
        return;
    }
    let pool = pool(ctx.card, "pool", Pool::Mp);
    let amount = ctx.card.get_int("amount", 10);
    ctx.gain(pool, amount);
}
