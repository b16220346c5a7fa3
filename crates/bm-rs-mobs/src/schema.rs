//! The fixed property schema shared by every mob type.
//!
//! Declaration order is significant: mob types store their slots in this
//! order, `mob info` lists properties in this order, and the configuration
//! pass applies them in this order (e.g. `can-despawn` after `name`).

use crate::entity_kind::Capability;
use crate::value::ValueKind;

/// Parent mob type reference. Immutable on predefined mob types.
pub const PARENT_TYPE: &str = "parent-type";
/// Underlying entity kind. Immutable on predefined mob types.
pub const ENTITY_TYPE: &str = "entity-type";

/// Properties locked on predefined mob types.
const IMMUTABLE_ON_PREDEFINED: &[&str] = &[PARENT_TYPE, ENTITY_TYPE];

/// Display grouping of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyGroup {
    Appearance,
    Sounds,
    Buffs,
    Equipment,
    Drops,
    Behaviour,
    SupportMobs,
}

/// Schema entry: a property ID and its value kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyDescriptor {
    pub id: &'static str,
    pub kind: ValueKind,
    pub group: PropertyGroup,
    /// Capability the target entity needs for this property to be applied.
    pub requires: Option<Capability>,
}

const fn prop(id: &'static str, kind: ValueKind, group: PropertyGroup) -> PropertyDescriptor {
    PropertyDescriptor {
        id,
        kind,
        group,
        requires: None,
    }
}

const fn needs(
    id: &'static str,
    kind: ValueKind,
    group: PropertyGroup,
    capability: Capability,
) -> PropertyDescriptor {
    PropertyDescriptor {
        id,
        kind,
        group,
        requires: Some(capability),
    }
}

use Capability::{Ageable, Angerable, Chargeable, Equippable, Explosive, Living};
use PropertyGroup::*;
use ValueKind as K;

const SPEED: ValueKind = K::ClampedDouble {
    min: 0.0,
    max: 1024.0,
};
const RANGE: ValueKind = K::ClampedDouble {
    min: 0.0,
    max: 2048.0,
};

/// Every property, in declaration order.
pub const SCHEMA: &[PropertyDescriptor] = &[
    // Appearance
    prop(PARENT_TYPE, K::String, Appearance),
    prop(ENTITY_TYPE, K::EntityType, Appearance),
    prop("name", K::String, Appearance),
    prop("show-name-plate", K::Boolean, Appearance),
    prop("disguise", K::Disguise, Appearance),
    prop("passenger", K::LootOrMob, Appearance),
    prop("passenger-percent", K::Percent, Appearance),
    needs("size", K::NonNegativeInteger, Appearance, Capability::Sized),
    prop("burning-percent", K::Percent, Appearance),
    prop("glowing", K::Boolean, Appearance),
    prop("glowing-percent", K::Percent, Appearance),
    prop("invisible-percent", K::Percent, Appearance),
    needs("baby-percent", K::Percent, Appearance, Ageable),
    needs("charged-percent", K::Percent, Appearance, Chargeable),
    // Sounds
    prop("silent", K::Boolean, Sounds),
    prop("spawn-sound", K::SoundEffect, Sounds),
    prop("death-sound", K::SoundEffect, Sounds),
    prop("projectile-launch-sound", K::SoundEffect, Sounds),
    prop("projectile-immunity-sound", K::SoundEffect, Sounds),
    prop("projectile-hurt-sound", K::SoundEffect, Sounds),
    prop("melee-hurt-sound", K::SoundEffect, Sounds),
    prop("melee-attack-sound", K::SoundEffect, Sounds),
    prop("teleport-sound", K::SoundEffect, Sounds),
    // Buffs
    needs("health", K::NonNegativeDouble, Buffs, Living),
    needs("breath-seconds", K::NonNegativeInteger, Buffs, Living),
    needs("speed", SPEED, Buffs, Living),
    needs("flying-speed", SPEED, Buffs, Living),
    needs("follow-range", RANGE, Buffs, Living),
    needs("attack-damage", RANGE, Buffs, Living),
    prop("sonic-boom-damage-scale", K::NonNegativeDouble, Buffs),
    needs("attack-speed", K::NonNegativeDouble, Buffs, Living),
    needs("pick-up-percent", K::Percent, Buffs, Living),
    needs("potion-buffs", K::PotionSet, Buffs, Living),
    prop("attack-potions", K::PotionSet, Buffs),
    prop("hurt-potions", K::PotionSet, Buffs),
    // Equipment
    needs("helmet", K::LootOrItem, Equipment, Equippable),
    needs("helmet-drop-percent", K::Percent, Equipment, Equippable),
    needs("chest-plate", K::LootOrItem, Equipment, Equippable),
    needs("chest-plate-drop-percent", K::Percent, Equipment, Equippable),
    needs("leggings", K::LootOrItem, Equipment, Equippable),
    needs("leggings-drop-percent", K::Percent, Equipment, Equippable),
    needs("boots", K::LootOrItem, Equipment, Equippable),
    needs("boots-drop-percent", K::Percent, Equipment, Equippable),
    needs("main-hand", K::LootOrItem, Equipment, Equippable),
    needs("main-hand-drop-percent", K::Percent, Equipment, Equippable),
    needs("off-hand", K::LootOrItem, Equipment, Equippable),
    needs("off-hand-drop-percent", K::Percent, Equipment, Equippable),
    // Drops
    prop("drops", K::Loot, Drops),
    prop("experience", K::NonNegativeInteger, Drops),
    // Behaviour
    needs("explosion-radius", K::ClampedInteger { min: 0, max: 127 }, Behaviour, Explosive),
    needs("fuse-ticks", K::NonNegativeInteger, Behaviour, Explosive),
    needs("ignited-percent", K::Percent, Behaviour, Explosive),
    prop("groups", K::TagSet, Behaviour),
    prop("friend-groups", K::TagSet, Behaviour),
    prop("tags", K::TagSet, Behaviour),
    needs("anger-ticks", K::NonNegativeInteger, Behaviour, Angerable),
    prop("target-damager", K::Boolean, Behaviour),
    // Applied after `name`, which would otherwise make the mob persistent.
    prop("can-despawn", K::Boolean, Behaviour),
    prop("projectile-mobs", K::LootOrMob, Behaviour),
    prop("projectile-disguise", K::Disguise, Behaviour),
    prop("projectile-removed", K::Boolean, Behaviour),
    prop("projectile-immunity-percent", K::Percent, Behaviour),
    prop("hurt-teleport-percent", K::Percent, Behaviour),
    prop("slime-can-split", K::Boolean, Behaviour),
    // Support mobs
    prop("support-mobs", K::LootOrMob, SupportMobs),
    prop("support-percent", K::Percent, SupportMobs),
    prop("support-health", K::NonNegativeDouble, SupportMobs),
    prop("support-health-step", K::NonNegativeDouble, SupportMobs),
];

/// Position of a property in the schema, or `None` if unknown.
pub fn index_of(id: &str) -> Option<usize> {
    SCHEMA.iter().position(|d| d.id == id)
}

/// Schema entry for a property, or `None` if unknown.
pub fn descriptor(id: &str) -> Option<&'static PropertyDescriptor> {
    SCHEMA.iter().find(|d| d.id == id)
}

/// All property IDs in declaration order.
pub fn all_ids() -> impl Iterator<Item = &'static str> {
    SCHEMA.iter().map(|d| d.id)
}

/// All property IDs sorted case-insensitively, for listings.
pub fn sorted_ids() -> Vec<&'static str> {
    let mut ids: Vec<&'static str> = all_ids().collect();
    ids.sort_by_key(|id| id.to_lowercase());
    ids
}

/// True for the identity-defining properties locked on predefined mob types.
pub fn is_immutable_on_predefined(id: &str) -> bool {
    IMMUTABLE_ON_PREDEFINED.contains(&id)
}
