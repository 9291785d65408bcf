use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Fast membership set of the factor kinds currently active on a side.
    ///
    /// Derived from the factor list by the factor manager after every
    /// mutation; never written directly.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct StatusFlags: u16 {
        const IMMUNE               = 1 << 0;
        const FREEZE               = 1 << 1;
        const BURNING              = 1 << 2;
        const BURNING_DAMAGE_BOOST = 1 << 3;
        const SHIELDED             = 1 << 4;
        const REGENERATING         = 1 << 5;
        const BOOSTED              = 1 << 6;
        const FROST_TOUCH          = 1 << 7;
    }
}
