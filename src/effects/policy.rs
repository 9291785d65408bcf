//! Branch choice for cards with alternative outcomes.
//!
//! When a card offers options (e.g. boost damage or boost defense), the
//! effect asks the battle's `BranchPolicy`. Presentation layers implement it
//! to ask the player; the engine ships three non-interactive policies.

use crate::cards::CardDefinition;
use crate::core::{GameRng, RandomSource};

/// Chooses one of a card's options.
pub trait BranchPolicy {
    /// Return an index into `options`. Out-of-range answers are clamped by
    /// the caller.
    fn choose(&mut self, card: &CardDefinition, options: &[&str]) -> usize;
}

/// Always takes the first option.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstOption;

impl BranchPolicy for FirstOption {
    fn choose(&mut self, _card: &CardDefinition, _options: &[&str]) -> usize {
        0
    }
}

/// Always takes the same index.
#[derive(Clone, Copy, Debug)]
pub struct FixedChoice(pub usize);

impl BranchPolicy for FixedChoice {
    fn choose(&mut self, _card: &CardDefinition, _options: &[&str]) -> usize {
        self.0
    }
}

/// Uniform seeded choice.
#[derive(Clone, Debug)]
pub struct RandomChoice(pub GameRng);

impl RandomChoice {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self(GameRng::new(seed))
    }
}

impl BranchPolicy for RandomChoice {
    fn choose(&mut self, _card: &CardDefinition, options: &[&str]) -> usize {
        if options.is_empty() {
            return 0;
        }
        self.0.next_index(options.len())
    }
}

/// Ask `policy` and clamp the answer into range.
pub(crate) fn choose_clamped(
    policy: &mut dyn BranchPolicy,
    card: &CardDefinition,
    options: &[&str],
) -> usize {
    policy
        .choose(card, options)
        .min(options.len().saturating_sub(1))
}
