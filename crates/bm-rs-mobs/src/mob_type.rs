//! Mob type nodes and their property slots.

use crate::entity_kind::EntityKind;
use crate::error::MobError;
use crate::schema::{self, PropertyDescriptor, ENTITY_TYPE, PARENT_TYPE, SCHEMA};
use crate::value::{PropertyValue, ValueKind};

/// One property of one mob type.
///
/// A `None` value means "not overridden here": the derived value comes from
/// the nearest ancestor that sets it.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySlot {
    descriptor: &'static PropertyDescriptor,
    /// ID of the mob type owning this slot. Identity only.
    owner: String,
    value: Option<PropertyValue>,
}

impl PropertySlot {
    fn new(descriptor: &'static PropertyDescriptor, owner: &str) -> Self {
        Self {
            descriptor,
            owner: owner.to_string(),
            value: None,
        }
    }

    pub fn id(&self) -> &'static str {
        self.descriptor.id
    }

    pub fn kind(&self) -> ValueKind {
        self.descriptor.kind
    }

    pub fn descriptor(&self) -> &'static PropertyDescriptor {
        self.descriptor
    }

    /// ID of the mob type this slot belongs to.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn value(&self) -> Option<&PropertyValue> {
        self.value.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }
}

/// A node in the mob type inheritance graph.
#[derive(Debug, Clone, PartialEq)]
pub struct MobType {
    id: String,
    predefined: bool,
    /// One slot per schema entry, in schema order.
    slots: Vec<PropertySlot>,
}

impl MobType {
    fn with_slots(id: &str, predefined: bool) -> Self {
        Self {
            id: id.to_string(),
            predefined,
            slots: SCHEMA.iter().map(|d| PropertySlot::new(d, id)).collect(),
        }
    }

    /// Create the predefined mob type wrapping a vanilla entity kind.
    pub fn predefined(kind: &EntityKind) -> Self {
        let mut mob_type = Self::with_slots(kind.name, true);
        // Written directly: the lock only applies after construction.
        if let Some(i) = schema::index_of(ENTITY_TYPE) {
            mob_type.slots[i].value = Some(PropertyValue::Text(kind.name.to_string()));
        }
        mob_type
    }

    /// Create a custom mob type, optionally inheriting from `parent_id`.
    /// An empty `parent_id` means no parent.
    pub fn custom(id: &str, parent_id: Option<&str>) -> Self {
        let mut mob_type = Self::with_slots(id, false);
        let parent_id = parent_id.filter(|p| !p.is_empty());
        if let (Some(parent), Some(i)) = (parent_id, schema::index_of(PARENT_TYPE)) {
            mob_type.slots[i].value = Some(PropertyValue::Text(parent.to_string()));
        }
        mob_type
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// True if this mob type wraps a vanilla entity kind.
    ///
    /// Predefined types cannot change `parent-type` or `entity-type`.
    pub fn is_predefined(&self) -> bool {
        self.predefined
    }

    /// The parent mob type ID, or `None` if unset. The ID may be dangling.
    pub fn parent_id(&self) -> Option<&str> {
        self.property(PARENT_TYPE)
            .and_then(|s| s.value())
            .and_then(PropertyValue::as_str)
    }

    /// This type's own slot for `id`, ignoring inheritance.
    pub fn property(&self, id: &str) -> Option<&PropertySlot> {
        schema::index_of(id).map(|i| &self.slots[i])
    }

    /// All slots in schema order.
    pub fn properties(&self) -> &[PropertySlot] {
        &self.slots
    }

    /// Slots that this type overrides, in schema order.
    pub fn overridden(&self) -> impl Iterator<Item = &PropertySlot> {
        self.slots.iter().filter(|s| s.is_set())
    }

    /// Set or clear a property value.
    ///
    /// The value is validated against the property's kind. Identity
    /// properties of predefined types are rejected.
    pub fn set_property(
        &mut self,
        id: &str,
        value: Option<PropertyValue>,
    ) -> Result<(), MobError> {
        let index = schema::index_of(id).ok_or_else(|| MobError::UnknownProperty(id.into()))?;
        if self.predefined && schema::is_immutable_on_predefined(id) {
            return Err(MobError::ImmutableProperty {
                mob_type: self.id.clone(),
                property: id.into(),
            });
        }
        let slot = &mut self.slots[index];
        slot.value = match value {
            Some(v) => Some(slot.kind().validate(v).map_err(|reason| {
                MobError::InvalidValue {
                    property: id.into(),
                    reason,
                }
            })?),
            None => None,
        };
        Ok(())
    }

    /// Parse `text` with the property's kind and set it.
    pub fn set_property_text(&mut self, id: &str, text: &str) -> Result<(), MobError> {
        let descriptor = schema::descriptor(id).ok_or_else(|| MobError::UnknownProperty(id.into()))?;
        let value = descriptor
            .kind
            .parse(text)
            .map_err(|reason| MobError::InvalidValue {
                property: id.into(),
                reason,
            })?;
        self.set_property(id, Some(value))
    }

    /// One-line description for listings.
    pub fn short_description(&self, parent_exists: bool) -> String {
        if self.predefined {
            return self.id.clone();
        }
        let parent = match self.parent_id() {
            Some(p) if parent_exists => p.to_string(),
            Some(p) => format!("{p} (missing)"),
            None => "none".to_string(),
        };
        format!("id: {}, parent-type: {parent}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zombie() -> MobType {
        MobType::predefined(EntityKind::from_name("zombie").unwrap())
    }

    #[test]
    fn one_slot_per_schema_entry() {
        let z = zombie();
        assert_eq!(z.properties().len(), SCHEMA.len());
        for (slot, d) in z.properties().iter().zip(SCHEMA) {
            assert_eq!(slot.id(), d.id);
            assert_eq!(slot.owner(), "zombie");
        }
    }

    #[test]
    fn predefined_has_entity_type_only() {
        let z = zombie();
        assert!(z.is_predefined());
        assert_eq!(
            z.property("entity-type").unwrap().value(),
            Some(&PropertyValue::Text("zombie".into()))
        );
        assert!(z.parent_id().is_none());
        assert_eq!(z.overridden().count(), 1);
    }

    #[test]
    fn predefined_identity_is_immutable() {
        let mut z = zombie();
        let err = z
            .set_property("parent-type", Some(PropertyValue::Text("husk".into())))
            .unwrap_err();
        assert!(matches!(err, MobError::ImmutableProperty { .. }));
        assert!(z.set_property("entity-type", None).is_err());
        assert!(z.set_property_text("health", "30").is_ok());
    }

    #[test]
    fn custom_parent_can_change() {
        let mut baron = MobType::custom("zombie-baron", None);
        assert!(baron.parent_id().is_none());
        baron.set_property_text("parent-type", "zombie").unwrap();
        assert_eq!(baron.parent_id(), Some("zombie"));
        baron.set_property("parent-type", None).unwrap();
        assert!(baron.parent_id().is_none());
    }

    #[test]
    fn set_validates_kind() {
        let mut baron = MobType::custom("zombie-baron", Some("zombie"));
        let err = baron.set_property_text("baby-percent", "150").unwrap_err();
        assert!(matches!(err, MobError::InvalidValue { .. }));
        let err = baron
            .set_property("health", Some(PropertyValue::Text("lots".into())))
            .unwrap_err();
        assert!(matches!(err, MobError::InvalidValue { .. }));
        assert!(baron.property("baby-percent").unwrap().value().is_none());
    }

    #[test]
    fn unknown_property() {
        let mut baron = MobType::custom("zombie-baron", None);
        assert!(baron.property("mana").is_none());
        assert_eq!(
            baron.set_property_text("mana", "3"),
            Err(MobError::UnknownProperty("mana".into()))
        );
    }

    #[test]
    fn short_descriptions() {
        assert_eq!(zombie().short_description(false), "zombie");
        let baron = MobType::custom("zombie-baron", Some("zombie"));
        assert_eq!(
            baron.short_description(true),
            "id: zombie-baron, parent-type: zombie"
        );
        assert!(baron.short_description(false).contains("(missing)"));
    }
}
