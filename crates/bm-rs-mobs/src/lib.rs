//! Mob types: the property schema, typed values, single-parent inheritance
//! and the friendliness predicate.

pub mod entity_kind;
pub mod error;
pub mod mob_type;
pub mod registry;
pub mod resolver;
pub mod schema;
pub mod value;

pub use entity_kind::{Capability, EntityKind};
pub use error::MobError;
pub use mob_type::{MobType, PropertySlot};
pub use registry::{MobTypeLookup, MobTypeRegistry};
pub use resolver::{derived_value, is_friendly_to, resolve_derived};
pub use value::{PropertyValue, SoundEffect, ValueKind};
