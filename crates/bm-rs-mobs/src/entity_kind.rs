//! Vanilla entity kinds and the capabilities they expose.
//!
//! Kind-specific property appliers declare the [`Capability`] they need; the
//! entity configuration pass consults the capability set instead of testing
//! for concrete entity types.

/// Something a concrete entity can do that not every entity can.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    /// Has health, attributes and potion effects.
    Living,
    /// Can be a baby or an adult.
    Ageable,
    /// Can be charged by lightning (creeper).
    Chargeable,
    /// Has a fuse and explosion radius.
    Explosive,
    /// Has a variable size (slime, magma cube, phantom).
    Sized,
    /// Has an anger timer.
    Angerable,
    /// Can hold items in equipment slots.
    Equippable,
}

/// A vanilla entity kind that a predefined mob type wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityKind {
    pub name: &'static str,
    pub capabilities: &'static [Capability],
}

use Capability::{Ageable, Angerable, Chargeable, Equippable, Explosive, Living};

const HUMANOID: &[Capability] = &[Living, Ageable, Equippable];
const ARMED: &[Capability] = &[Living, Equippable];
const PLAIN: &[Capability] = &[Living];
const ANIMAL: &[Capability] = &[Living, Ageable];

/// All known entity kinds, in the order predefined mob types are created.
pub const ENTITY_KINDS: &[EntityKind] = &[
    EntityKind { name: "zombie", capabilities: HUMANOID },
    EntityKind { name: "husk", capabilities: HUMANOID },
    EntityKind { name: "drowned", capabilities: HUMANOID },
    EntityKind { name: "zombie-villager", capabilities: HUMANOID },
    EntityKind { name: "zombified-piglin", capabilities: &[Living, Ageable, Equippable, Angerable] },
    EntityKind { name: "skeleton", capabilities: ARMED },
    EntityKind { name: "stray", capabilities: ARMED },
    EntityKind { name: "wither-skeleton", capabilities: ARMED },
    EntityKind { name: "pillager", capabilities: ARMED },
    EntityKind { name: "vindicator", capabilities: ARMED },
    EntityKind { name: "evoker", capabilities: ARMED },
    EntityKind { name: "witch", capabilities: PLAIN },
    EntityKind { name: "creeper", capabilities: &[Living, Chargeable, Explosive] },
    EntityKind { name: "spider", capabilities: PLAIN },
    EntityKind { name: "cave-spider", capabilities: PLAIN },
    EntityKind { name: "enderman", capabilities: PLAIN },
    EntityKind { name: "slime", capabilities: &[Living, Capability::Sized] },
    EntityKind { name: "magma-cube", capabilities: &[Living, Capability::Sized] },
    EntityKind { name: "phantom", capabilities: &[Living, Capability::Sized] },
    EntityKind { name: "blaze", capabilities: PLAIN },
    EntityKind { name: "ghast", capabilities: PLAIN },
    EntityKind { name: "guardian", capabilities: PLAIN },
    EntityKind { name: "ravager", capabilities: PLAIN },
    EntityKind { name: "warden", capabilities: PLAIN },
    EntityKind { name: "bee", capabilities: &[Living, Ageable, Angerable] },
    EntityKind { name: "wolf", capabilities: &[Living, Ageable, Angerable] },
    EntityKind { name: "cow", capabilities: ANIMAL },
    EntityKind { name: "pig", capabilities: ANIMAL },
    EntityKind { name: "chicken", capabilities: ANIMAL },
    EntityKind { name: "sheep", capabilities: ANIMAL },
    EntityKind { name: "villager", capabilities: ANIMAL },
];

impl EntityKind {
    /// Look up an entity kind by name.
    pub fn from_name(name: &str) -> Option<&'static EntityKind> {
        ENTITY_KINDS.iter().find(|k| k.name == name)
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}
