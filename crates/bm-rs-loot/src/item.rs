//! Custom items and the item registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::LootError;

/// Special item: leave the mob's vanilla equipment unchanged.
pub const DEFAULT_ITEM: &str = "DEFAULT";
/// Special item: explicitly empty (air).
pub const NOTHING_ITEM: &str = "NOTHING";

/// Persisted form of a custom item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub material: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A materialized stack of items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStack {
    pub item_id: String,
    pub material: String,
    pub name: Option<String>,
    pub count: u32,
}

/// An item that drops and equipment properties can name.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    id: String,
    special: bool,
    record: Option<ItemRecord>,
}

impl Item {
    /// A concrete custom item.
    pub fn new(id: &str, record: ItemRecord) -> Self {
        Self {
            id: id.to_string(),
            special: false,
            record: Some(record),
        }
    }

    fn special(id: &str) -> Self {
        Self {
            id: id.to_string(),
            special: true,
            record: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Special items stand for a behavior, not a concrete stack.
    pub fn is_special(&self) -> bool {
        self.special
    }

    pub fn record(&self) -> Option<&ItemRecord> {
        self.record.as_ref()
    }

    /// A single-item stack, or `None` for special items.
    pub fn materialize(&self) -> Option<ItemStack> {
        self.record.as_ref().map(|r| ItemStack {
            item_id: self.id.clone(),
            material: r.material.clone(),
            name: r.name.clone(),
            count: 1,
        })
    }
}

/// Read access to items by ID.
pub trait ItemLookup {
    fn item(&self, id: &str) -> Option<&Item>;
}

/// Registry of custom items plus the two special items.
#[derive(Debug, Clone)]
pub struct ItemRegistry {
    items: BTreeMap<String, Item>,
}

impl Default for ItemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemRegistry {
    pub fn new() -> Self {
        let mut items = BTreeMap::new();
        for id in [DEFAULT_ITEM, NOTHING_ITEM] {
            items.insert(id.to_string(), Item::special(id));
        }
        Self { items }
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    /// All items in ID order, special items included.
    pub fn all(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Custom (non-special) items in ID order.
    pub fn custom(&self) -> impl Iterator<Item = &Item> {
        self.items.values().filter(|i| !i.is_special())
    }

    pub fn add(&mut self, id: &str, record: ItemRecord) -> Result<&Item, LootError> {
        if self.items.contains_key(id) {
            return Err(LootError::DuplicateItem(id.into()));
        }
        Ok(self
            .items
            .entry(id.to_string())
            .or_insert(Item::new(id, record)))
    }

    pub fn remove(&mut self, id: &str) -> Result<Item, LootError> {
        match self.items.get(id) {
            None => Err(LootError::UnknownItem(id.into())),
            Some(item) if item.is_special() => Err(LootError::SpecialItem(id.into())),
            Some(_) => self
                .items
                .remove(id)
                .ok_or_else(|| LootError::UnknownItem(id.into())),
        }
    }
}

impl ItemLookup for ItemRegistry {
    fn item(&self, id: &str) -> Option<&Item> {
        self.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gold() -> ItemRecord {
        ItemRecord {
            material: "gold_ingot".into(),
            name: None,
        }
    }

    #[test]
    fn special_items_seeded() {
        let reg = ItemRegistry::new();
        assert!(reg.get(DEFAULT_ITEM).unwrap().is_special());
        assert!(reg.get(NOTHING_ITEM).unwrap().is_special());
        assert!(reg.get(NOTHING_ITEM).unwrap().materialize().is_none());
        assert_eq!(reg.custom().count(), 0);
    }

    #[test]
    fn add_and_materialize() {
        let mut reg = ItemRegistry::new();
        reg.add("gold", gold()).unwrap();
        let stack = reg.get("gold").unwrap().materialize().unwrap();
        assert_eq!(stack.item_id, "gold");
        assert_eq!(stack.material, "gold_ingot");
        assert_eq!(stack.count, 1);
        assert_eq!(
            reg.add("gold", gold()).unwrap_err(),
            LootError::DuplicateItem("gold".into())
        );
    }

    #[test]
    fn special_items_cannot_be_removed() {
        let mut reg = ItemRegistry::new();
        assert_eq!(
            reg.remove(DEFAULT_ITEM).unwrap_err(),
            LootError::SpecialItem(DEFAULT_ITEM.into())
        );
        reg.add("gold", gold()).unwrap();
        reg.remove("gold").unwrap();
        assert!(reg.remove("gold").is_err());
    }

    #[test]
    fn record_json_omits_missing_name() {
        let json = serde_json::to_string(&gold()).unwrap();
        assert_eq!(json, r#"{"material":"gold_ingot"}"#);
    }
}
