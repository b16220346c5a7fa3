//! Property inheritance resolution.
//!
//! A mob type that leaves a property unset inherits it from its parent,
//! transitively. Resolution walks the parent chain and returns the slot of the
//! most-derived type that sets the property, or the root ancestor's empty slot
//! if no type in the chain sets it. A parent ID that names no mob type ends the
//! chain. Cycles are detected and reported instead of looping.

use crate::error::MobError;
use crate::mob_type::{MobType, PropertySlot};
use crate::registry::MobTypeLookup;
use crate::value::PropertyValue;

/// Resolve the slot that supplies the derived value of `property_id`.
///
/// Returns `Ok(None)` if `property_id` is not in the schema.
pub fn resolve_derived<'a, L>(
    lookup: &'a L,
    mob_type: &'a MobType,
    property_id: &str,
) -> Result<Option<&'a PropertySlot>, MobError>
where
    L: MobTypeLookup + ?Sized,
{
    let Some(mut slot) = mob_type.property(property_id) else {
        return Ok(None);
    };
    let mut node = mob_type;
    let mut visited: Vec<&'a str> = vec![node.id()];

    loop {
        if slot.is_set() {
            return Ok(Some(slot));
        }
        let Some(parent) = node.parent_id().and_then(|id| lookup.mob_type(id)) else {
            return Ok(Some(slot));
        };
        check_revisit(&visited, parent.id())?;
        visited.push(parent.id());
        node = parent;
        // Every mob type carries every schema slot.
        slot = match node.property(property_id) {
            Some(s) => s,
            None => return Ok(Some(slot)),
        };
    }
}

/// Resolve the derived value of `property_id`, if any type in the chain sets it.
pub fn derived_value<'a, L>(
    lookup: &'a L,
    mob_type: &'a MobType,
    property_id: &str,
) -> Result<Option<&'a PropertyValue>, MobError>
where
    L: MobTypeLookup + ?Sized,
{
    Ok(resolve_derived(lookup, mob_type, property_id)?.and_then(PropertySlot::value))
}

/// The derived ID of the drop table consulted when the mob dies.
pub fn drops_id<'a, L>(lookup: &'a L, mob_type: &'a MobType) -> Result<Option<&'a str>, MobError>
where
    L: MobTypeLookup + ?Sized,
{
    Ok(derived_value(lookup, mob_type, "drops")?.and_then(PropertyValue::as_str))
}

/// The inheritance chain from `mob_type` up to its root ancestor, inclusive.
pub fn ancestors<'a, L>(lookup: &'a L, mob_type: &'a MobType) -> Result<Vec<&'a MobType>, MobError>
where
    L: MobTypeLookup + ?Sized,
{
    let mut chain = vec![mob_type];
    let mut visited: Vec<&'a str> = vec![mob_type.id()];
    let mut node = mob_type;
    while let Some(parent) = node.parent_id().and_then(|id| lookup.mob_type(id)) {
        check_revisit(&visited, parent.id())?;
        visited.push(parent.id());
        chain.push(parent);
        node = parent;
    }
    Ok(chain)
}

fn check_revisit(visited: &[&str], next: &str) -> Result<(), MobError> {
    if let Some(pos) = visited.iter().position(|id| *id == next) {
        let mut chain: Vec<String> = visited[pos..].iter().map(|s| s.to_string()).collect();
        chain.push(next.to_string());
        return Err(MobError::CyclicInheritance { chain });
    }
    Ok(())
}

/// True if `mob_type` will not target or damage mobs of type `other`.
///
/// Mobs are friendly when one of this type's derived `friend-groups` is among
/// the other type's derived `groups`. Hostile by default: a missing other type
/// or empty group sets yield `false`.
pub fn is_friendly_to<L>(
    lookup: &L,
    mob_type: &MobType,
    other: Option<&MobType>,
) -> Result<bool, MobError>
where
    L: MobTypeLookup + ?Sized,
{
    let Some(other) = other else {
        return Ok(false);
    };
    let friend_groups = match derived_value(lookup, mob_type, "friend-groups")?
        .and_then(PropertyValue::as_tags)
    {
        Some(tags) if !tags.is_empty() => tags,
        _ => return Ok(false),
    };
    let Some(groups) = derived_value(lookup, other, "groups")?.and_then(PropertyValue::as_tags)
    else {
        return Ok(false);
    };
    Ok(friend_groups.iter().any(|g| groups.contains(g)))
}
