//! Effect registry.
//!
//! Card definitions carry string keys; the registry maps them to plain
//! function pointers. It is populated once, then shared read-only (`Arc`)
//! by every battle. An unresolved key means "no effect".

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::context::EffectContext;
use super::library;
use crate::error::{ActionError, ConfigError};

/// Active effect: runs when the card is used.
///
/// Must check affordability (usually via `ctx.pay()`) before mutating
/// anything; an `Err` rejects the action.
pub type EffectFn = fn(&mut EffectContext<'_>) -> Result<(), ActionError>;

/// Passive effect: runs on battle events for every equipped card that has
/// one.
pub type PassiveFn = fn(&mut EffectContext<'_>, PassiveTrigger);

/// When a passive runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassiveTrigger {
    /// Once, when the battle starts.
    Equip,
    /// At the start of the owner's turn, after regeneration.
    TurnStart,
}

/// Registry of effect and passive functions.
///
/// ## Example
///
/// ```
/// use essence_duel::effects::{EffectContext, EffectRegistry};
/// use essence_duel::error::ActionError;
///
/// fn nothing(_ctx: &mut EffectContext<'_>) -> Result<(), ActionError> {
///     Ok(())
/// }
///
/// let mut registry = EffectRegistry::builtin();
/// registry.register_effect("nothing", nothing).unwrap();
///
/// assert!(registry.effect("nothing").is_some());
/// assert!(registry.effect("strike").is_some());
/// assert!(registry.register_effect("strike", nothing).is_err());
/// ```
#[derive(Clone, Default)]
pub struct EffectRegistry {
    effects: FxHashMap<String, EffectFn>,
    passives: FxHashMap<String, PassiveFn>,
}

impl std::fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut effects: Vec<_> = self.effects.keys().collect();
        let mut passives: Vec<_> = self.passives.keys().collect();
        effects.sort();
        passives.sort();
        f.debug_struct("EffectRegistry")
            .field("effects", &effects)
            .field("passives", &passives)
            .finish()
    }
}

impl EffectRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-filled with the built-in library.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (key, f) in library::EFFECTS {
            registry.effects.insert((*key).to_string(), *f);
        }
        for (key, f) in library::PASSIVES {
            registry.passives.insert((*key).to_string(), *f);
        }
        registry
    }

    /// Register an active effect. Keys are unique.
    pub fn register_effect(&mut self, key: impl Into<String>, f: EffectFn) -> Result<(), ConfigError> {
        let key = key.into();
        if self.effects.contains_key(&key) {
            return Err(ConfigError::DuplicateKey(key));
        }
        self.effects.insert(key, f);
        Ok(())
    }

    /// Register a passive effect. Keys are unique.
    pub fn register_passive(&mut self, key: impl Into<String>, f: PassiveFn) -> Result<(), ConfigError> {
        let key = key.into();
        if self.passives.contains_key(&key) {
            return Err(ConfigError::DuplicateKey(key));
        }
        self.passives.insert(key, f);
        Ok(())
    }

    #[must_use]
    pub fn effect(&self, key: &str) -> Option<EffectFn> {
        self.effects.get(key).copied()
    }

    #[must_use]
    pub fn passive(&self, key: &str) -> Option<PassiveFn> {
        self.passives.get(key).copied()
    }

    /// Number of registered active effects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty() && self.passives.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_ctx: &mut EffectContext<'_>) -> Result<(), ActionError> {
        Ok(())
    }

    fn noop_passive(_ctx: &mut EffectContext<'_>, _trigger: PassiveTrigger) {}

    #[test]
    fn test_register_and_lookup() {
        let mut registry = EffectRegistry::new();
        assert!(registry.is_empty());

        registry.register_effect("noop", noop).unwrap();
        registry.register_passive("noop", noop_passive).unwrap();

        assert!(registry.effect("noop").is_some());
        assert!(registry.passive("noop").is_some());
        assert!(registry.effect("missing").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let mut registry = EffectRegistry::new();
        registry.register_effect("noop", noop).unwrap();
        assert_eq!(
            registry.register_effect("noop", noop),
            Err(ConfigError::DuplicateKey("noop".to_string()))
        );
    }

    #[test]
    fn test_builtin_library() {
        let registry = EffectRegistry::builtin();
        for key in [
            "strike",
            "elemental_strike",
            "ignite",
            "kindle",
            "barrier",
            "mend",
            "restore",
            "frost_touch",
            "freeze",
            "sanctuary",
            "execute",
            "war_cry",
            "storm_charge",
            "cold_snap",
        ] {
            assert!(registry.effect(key).is_some(), "missing {key}");
        }
        assert!(registry.passive("stat_bonus").is_some());
        assert!(registry.passive("turn_regeneration").is_some());
    }
}
