//! Mob type errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MobError {
    #[error("unknown property: {0}")]
    UnknownProperty(String),

    #[error("unknown mob type: {0}")]
    UnknownMobType(String),

    #[error("property {property} of predefined mob type {mob_type} cannot be changed")]
    ImmutableProperty { mob_type: String, property: String },

    #[error("cyclic inheritance: {}", .chain.join(" -> "))]
    CyclicInheritance { chain: Vec<String> },

    #[error("invalid value for {property}: {reason}")]
    InvalidValue { property: String, reason: String },

    #[error("mob type {0} already exists")]
    DuplicateMobType(String),

    #[error("predefined mob type {0} cannot be removed")]
    PredefinedMobType(String),

    #[error("mob type {id} is the parent of: {}", .children.join(", "))]
    MobTypeHasChildren { id: String, children: Vec<String> },
}
