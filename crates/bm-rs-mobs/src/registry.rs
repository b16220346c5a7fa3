//! Registry of mob types.
//!
//! Holds one predefined mob type per vanilla entity kind plus any number of
//! custom types loaded from the catalog or created by administrators.

use std::collections::BTreeMap;

use tracing::debug;

use crate::entity_kind::ENTITY_KINDS;
use crate::error::MobError;
use crate::mob_type::MobType;
use crate::resolver;
use crate::value::PropertyValue;

/// Read access to mob types by ID.
pub trait MobTypeLookup {
    fn mob_type(&self, id: &str) -> Option<&MobType>;
}

impl MobTypeLookup for BTreeMap<String, MobType> {
    fn mob_type(&self, id: &str) -> Option<&MobType> {
        self.get(id)
    }
}

/// Registry of all mob types, keyed by ID.
#[derive(Debug, Clone)]
pub struct MobTypeRegistry {
    types: BTreeMap<String, MobType>,
}

impl Default for MobTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MobTypeRegistry {
    /// Build the registry with the predefined mob types.
    pub fn new() -> Self {
        let types = ENTITY_KINDS
            .iter()
            .map(|kind| (kind.name.to_string(), MobType::predefined(kind)))
            .collect();
        Self { types }
    }

    /// Look up a mob type by ID.
    pub fn get(&self, id: &str) -> Option<&MobType> {
        self.types.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut MobType> {
        self.types.get_mut(id)
    }

    /// All mob types in ID order.
    pub fn all(&self) -> impl Iterator<Item = &MobType> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// IDs of the types that name `id` as their parent.
    pub fn children_of(&self, id: &str) -> Vec<String> {
        self.types
            .values()
            .filter(|t| t.parent_id() == Some(id))
            .map(|t| t.id().to_string())
            .collect()
    }

    /// Register a new custom mob type.
    pub fn add_custom(&mut self, id: &str, parent_id: Option<&str>) -> Result<&MobType, MobError> {
        self.insert(MobType::custom(id, parent_id))
    }

    /// Register a fully built mob type (used by the loader).
    pub fn insert(&mut self, mob_type: MobType) -> Result<&MobType, MobError> {
        let id = mob_type.id().to_string();
        if self.types.contains_key(&id) {
            return Err(MobError::DuplicateMobType(id));
        }
        debug!("Registered mob type {id}");
        Ok(self.types.entry(id).or_insert(mob_type))
    }

    /// Copy the overrides of a loaded `mob_type` onto the predefined type with its ID.
    ///
    /// Identity properties are kept from the existing predefined type.
    pub fn merge_predefined(&mut self, mob_type: &MobType) -> Result<(), MobError> {
        let existing = self
            .types
            .get_mut(mob_type.id())
            .ok_or_else(|| MobError::UnknownMobType(mob_type.id().into()))?;
        for slot in mob_type.overridden() {
            existing.set_property(slot.id(), slot.value().cloned())?;
        }
        Ok(())
    }

    /// Remove a custom mob type.
    ///
    /// Fails for predefined types and for types that are still a parent.
    pub fn remove(&mut self, id: &str) -> Result<MobType, MobError> {
        let mob_type = self
            .types
            .get(id)
            .ok_or_else(|| MobError::UnknownMobType(id.into()))?;
        if mob_type.is_predefined() {
            return Err(MobError::PredefinedMobType(id.into()));
        }
        let children = self.children_of(id);
        if !children.is_empty() {
            return Err(MobError::MobTypeHasChildren {
                id: id.into(),
                children,
            });
        }
        self.types
            .remove(id)
            .ok_or_else(|| MobError::UnknownMobType(id.into()))
    }

    /// Set (or clear, with `None`) a property of a mob type.
    pub fn set_property(
        &mut self,
        type_id: &str,
        property_id: &str,
        value: Option<PropertyValue>,
    ) -> Result<(), MobError> {
        self.types
            .get_mut(type_id)
            .ok_or_else(|| MobError::UnknownMobType(type_id.into()))?
            .set_property(property_id, value)
    }

    /// Report every distinct inheritance cycle in the registry.
    pub fn check_inheritance(&self) -> Vec<MobError> {
        let mut cycles: Vec<Vec<String>> = Vec::new();
        for mob_type in self.types.values() {
            if let Err(MobError::CyclicInheritance { chain }) =
                resolver::ancestors(self, mob_type)
            {
                // The same cycle is reported from each of its members; keep one.
                let mut members = chain[..chain.len() - 1].to_vec();
                members.sort();
                let seen = cycles.iter().any(|c| {
                    let mut other = c[..c.len() - 1].to_vec();
                    other.sort();
                    other == members
                });
                if !seen {
                    cycles.push(chain);
                }
            }
        }
        cycles
            .into_iter()
            .map(|chain| MobError::CyclicInheritance { chain })
            .collect()
    }
}

impl MobTypeLookup for MobTypeRegistry {
    fn mob_type(&self, id: &str) -> Option<&MobType> {
        self.get(id)
    }
}
