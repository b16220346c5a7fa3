//! Loading and saving the catalog as a single JSON document.
//!
//! A malformed record is logged and skipped; only I/O errors and a document
//! that is not valid JSON fail the whole load.

use std::path::Path;

use bm_rs_loot::{DropTable, DropTableRecord, ItemRecord};
use bm_rs_mobs::schema;
use bm_rs_mobs::{MobError, MobType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::potion::{PotionSet, PotionSetRecord};

/// The persisted catalog, one map per record type, keyed by ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub items: Map<String, Value>,
    #[serde(rename = "potion-sets", default)]
    pub potion_sets: Map<String, Value>,
    #[serde(default)]
    pub drops: Map<String, Value>,
    #[serde(default)]
    pub mobs: Map<String, Value>,
}

/// Persisted form of a mob type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MobTypeRecord {
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// Load a catalog file.
pub fn load_file(path: &Path) -> Result<Catalog, CatalogError> {
    let text = std::fs::read_to_string(path)?;
    let catalog = load_str(&text)?;
    info!(
        "Loaded catalog {} ({} mob types, {} drop tables, {} items, {} potion sets)",
        path.display(),
        catalog.mobs.len(),
        catalog.drops.len(),
        catalog.items.custom().count(),
        catalog.potions.len()
    );
    Ok(catalog)
}

/// Save a catalog file, replacing any previous contents.
pub fn save_file(catalog: &Catalog, path: &Path) -> Result<(), CatalogError> {
    let text = save_string(catalog)?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, text)?;
    info!("Saved catalog to {}", path.display());
    Ok(())
}

/// Decode a catalog document and log anything the audit finds.
pub fn load_str(text: &str) -> Result<Catalog, CatalogError> {
    let document: CatalogDocument = serde_json::from_str(text)?;
    let catalog = from_document(&document);
    for issue in catalog.audit() {
        warn!("Catalog: {issue}");
    }
    Ok(catalog)
}

pub fn save_string(catalog: &Catalog) -> Result<String, CatalogError> {
    Ok(serde_json::to_string_pretty(&to_document(catalog))?)
}

fn decode<T: serde::de::DeserializeOwned>(what: &str, id: &str, value: &Value) -> Option<T> {
    match serde_json::from_value(value.clone()) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!("Skipping {what} {id}: {e}");
            None
        }
    }
}

pub fn from_document(document: &CatalogDocument) -> Catalog {
    let mut catalog = Catalog::new();

    for (id, value) in &document.items {
        let Some(record) = decode::<ItemRecord>("item", id, value) else {
            continue;
        };
        if let Err(e) = catalog.items.add(id, record) {
            warn!("Skipping item {id}: {e}");
        }
    }

    for (id, value) in &document.potion_sets {
        let Some(record) = decode::<PotionSetRecord>("potion set", id, value) else {
            continue;
        };
        let set = PotionSet {
            id: id.clone(),
            effects: record.effects,
        };
        if let Err(e) = catalog.potions.add(set) {
            warn!("Skipping potion set {id}: {e}");
        }
    }

    for (id, value) in &document.drops {
        let Some(record) = decode::<DropTableRecord>("drop table", id, value) else {
            continue;
        };
        let added =
            DropTable::from_record(id, &record).and_then(|t| catalog.drops.add(t).map(|_| ()));
        if let Err(e) = added {
            warn!("Skipping drop table {id}: {e}");
        }
    }

    for (id, value) in &document.mobs {
        let Some(record) = decode::<MobTypeRecord>("mob type", id, value) else {
            continue;
        };
        if let Err(e) = load_mob_type(&mut catalog, id, &record) {
            warn!("Skipping mob type {id}: {e}");
        }
    }
    catalog
}

/// Load one mob type. A bad property is logged and skipped; the rest of the
/// type still loads.
fn load_mob_type(catalog: &mut Catalog, id: &str, record: &MobTypeRecord) -> Result<(), MobError> {
    let predefined = catalog.mobs.get(id).is_some_and(MobType::is_predefined);
    let mut mob_type = match catalog.mobs.get(id) {
        Some(_) if !predefined => return Err(MobError::DuplicateMobType(id.into())),
        _ => MobType::custom(id, None),
    };

    for (property, json) in &record.properties {
        if predefined && schema::is_immutable_on_predefined(property) {
            warn!("Mob type {id}: ignoring {property} of predefined type");
            continue;
        }
        let Some(descriptor) = schema::descriptor(property) else {
            warn!("Mob type {id}: {}", MobError::UnknownProperty(property.clone()));
            continue;
        };
        let value = match descriptor.kind.from_json(json) {
            Ok(value) => value,
            Err(reason) => {
                warn!("Mob type {id}: invalid {property}: {reason}");
                continue;
            }
        };
        if let Err(e) = mob_type.set_property(property, Some(value)) {
            warn!("Mob type {id}: {e}");
        }
    }

    if predefined {
        catalog.mobs.merge_predefined(&mob_type)
    } else {
        catalog.mobs.insert(mob_type).map(|_| ())
    }
}

pub fn to_document(catalog: &Catalog) -> CatalogDocument {
    let mut document = CatalogDocument::default();

    for item in catalog.items.custom() {
        if let Some(record) = item.record() {
            document
                .items
                .insert(item.id().to_string(), to_value(record));
        }
    }
    for set in catalog.potions.all() {
        let record = PotionSetRecord {
            effects: set.effects.clone(),
        };
        document
            .potion_sets
            .insert(set.id.clone(), to_value(&record));
    }
    for table in catalog.drops.all() {
        document
            .drops
            .insert(table.id().to_string(), to_value(&table.to_record()));
    }
    for mob_type in catalog.mobs.all() {
        // Schema order, so parent-type comes first.
        let mut properties = Map::new();
        for slot in mob_type.overridden() {
            if mob_type.is_predefined() && schema::is_immutable_on_predefined(slot.id()) {
                continue;
            }
            if let Some(value) = slot.value() {
                properties.insert(slot.id().to_string(), value.to_json());
            }
        }
        if mob_type.is_predefined() && properties.is_empty() {
            continue;
        }
        document.mobs.insert(
            mob_type.id().to_string(),
            to_value(&MobTypeRecord { properties }),
        );
    }
    document
}

fn to_value<T: Serialize>(record: &T) -> Value {
    serde_json::to_value(record).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bm_rs_loot::DropKind;
    use bm_rs_mobs::PropertyValue;

    const CATALOG: &str = r#"{
        "items": {
            "gold": { "material": "gold_ingot" },
            "crown": { "material": "golden_helmet", "name": "Crown" },
            "DEFAULT": { "material": "stone" }
        },
        "potion-sets": {
            "buffs": { "effects": [ { "effect": "speed", "amplifier": 1, "duration": 200 } ] }
        },
        "drops": {
            "baron-loot": {
                "single": false,
                "drops": {
                    "gold": { "type": "item", "chance": 0.3333333333333333, "min": 1, "max": 3 },
                    "zombie": { "type": "mob", "chance": 0.1, "objective": "baron-key" },
                    "nothing": { "chance": 0.25 }
                }
            },
            "broken": { "drops": { "gold": { "chance": 7 } } }
        },
        "mobs": {
            "zombie": { "properties": { "parent-type": "husk", "speed": 0.25 } },
            "zombie-baron": {
                "properties": {
                    "parent-type": "zombie",
                    "health": 200.0,
                    "drops": "baron-loot",
                    "friend-groups": ["undead"],
                    "baby-percent": 150,
                    "mana": 3
                }
            },
            "bad": "not a record"
        }
    }"#;

    #[test]
    fn loads_records_and_skips_bad_ones() {
        let catalog = load_str(CATALOG).unwrap();
        assert_eq!(catalog.items.custom().count(), 2);
        assert!(catalog.items.get("DEFAULT").unwrap().is_special());
        assert!(catalog.potions.get("buffs").is_some());
        assert!(catalog.drops.get("broken").is_none());
        assert!(catalog.mobs.get("bad").is_none());

        let table = catalog.drops.get("baron-loot").unwrap();
        assert!(!table.is_single());
        let keys: Vec<&str> = table.entries().iter().map(|e| e.key()).collect();
        assert_eq!(keys, vec!["gold", "zombie", "nothing"]);
        assert_eq!(table.entries()[1].kind(), DropKind::Mob);
        assert_eq!(table.entries()[2].kind(), DropKind::Nothing);

        let zombie = catalog.mobs.get("zombie").unwrap();
        assert_eq!(zombie.parent_id(), None);
        assert_eq!(
            zombie.property("speed").unwrap().value(),
            Some(&PropertyValue::Double(0.25))
        );

        let baron = catalog.mobs.get("zombie-baron").unwrap();
        assert_eq!(baron.parent_id(), Some("zombie"));
        assert!(!baron.property("baby-percent").unwrap().is_set());
        assert_eq!(
            baron.property("health").unwrap().value(),
            Some(&PropertyValue::Double(200.0))
        );
    }

    #[test]
    fn save_load_save_is_stable() {
        let catalog = load_str(CATALOG).unwrap();
        let first = save_string(&catalog).unwrap();
        let again = load_str(&first).unwrap();
        let second = save_string(&again).unwrap();
        assert_eq!(first, second);

        let table = again.drops.get("baron-loot").unwrap();
        assert_eq!(table.entries()[0].chance(), 0.3333333333333333);
        assert_eq!(table.entries()[1].objective(), Some("baron-key"));
    }

    #[test]
    fn nothing_drops_keep_their_keys_through_save() {
        let text = r#"{
            "items": { "gold": { "material": "gold_ingot" } },
            "drops": {
                "loot": {
                    "drops": {
                        "air": { "type": "nothing", "chance": 0.2 },
                        "nothing": { "chance": 0.3 },
                        "gold": { "chance": 0.5 },
                        "void": { "type": "nothing", "chance": 0.1 }
                    }
                }
            }
        }"#;
        let catalog = load_str(text).unwrap();
        let saved = save_string(&catalog).unwrap();
        let again = load_str(&saved).unwrap();

        let table = again.drops.get("loot").unwrap();
        let keys: Vec<&str> = table.entries().iter().map(|e| e.key()).collect();
        assert_eq!(keys, vec!["air", "nothing", "gold", "void"]);
        assert_eq!(table, catalog.drops.get("loot").unwrap());
        assert_eq!(save_string(&again).unwrap(), saved);
    }

    #[test]
    fn untouched_predefined_types_are_not_saved() {
        let catalog = load_str(CATALOG).unwrap();
        let document = to_document(&catalog);
        assert!(document.mobs.contains_key("zombie"));
        assert!(!document.mobs.contains_key("skeleton"));
        let zombie: MobTypeRecord =
            serde_json::from_value(document.mobs["zombie"].clone()).unwrap();
        assert!(!zombie.properties.contains_key("parent-type"));
        assert!(!zombie.properties.contains_key("entity-type"));
        let baron: MobTypeRecord =
            serde_json::from_value(document.mobs["zombie-baron"].clone()).unwrap();
        assert_eq!(baron.properties.keys().next().map(String::as_str), Some("parent-type"));
    }

    #[test]
    fn file_roundtrip() {
        let dir = std::env::temp_dir().join(format!("bm-rs-store-{}", std::process::id()));
        let path = dir.join("catalog.json");
        let catalog = load_str(CATALOG).unwrap();
        save_file(&catalog, &path).unwrap();
        let loaded = load_file(&path).unwrap();
        assert_eq!(
            save_string(&loaded).unwrap(),
            save_string(&catalog).unwrap()
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn invalid_json_fails() {
        assert!(matches!(load_str("{ nope"), Err(CatalogError::Json(_))));
        assert!(matches!(
            load_file(Path::new("/nonexistent/bm-rs/catalog.json")),
            Err(CatalogError::Io(_))
        ));
    }
}
