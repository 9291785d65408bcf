//! Card system: definitions, instances, and equipment.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for card definitions
//! - `CardType`: Closed set of slot types
//! - `CardDefinition`: Static card data, costs, and registry keys
//! - `Card`: Runtime card state (frozen counter, ability phase)
//! - `Equipment`: One card per slot type

pub mod attributes;
pub mod definition;
pub mod equipment;
pub mod instance;

pub use attributes::{AttributeKey, AttributeValue, Attributes};
pub use definition::{CardDefinition, CardId, CardType, CharmKind};
pub use equipment::Equipment;
pub use instance::Card;
