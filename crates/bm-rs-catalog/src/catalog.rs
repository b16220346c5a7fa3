//! The catalog: every mob type, drop table, item and potion set.

use std::fmt;

use bm_rs_loot::{
    DropKind, DropTable, DropTableLookup, DropTableRegistry, Item, ItemLookup, ItemRegistry,
};
use bm_rs_mobs::schema::PARENT_TYPE;
use bm_rs_mobs::{MobError, MobType, MobTypeLookup, MobTypeRegistry, PropertySlot, ValueKind};

use crate::potion::PotionRegistry;

/// Owned catalog state. Cloned wholesale for copy-on-write edits.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub mobs: MobTypeRegistry,
    pub drops: DropTableRegistry,
    pub items: ItemRegistry,
    pub potions: PotionRegistry,
}

impl MobTypeLookup for Catalog {
    fn mob_type(&self, id: &str) -> Option<&MobType> {
        self.mobs.get(id)
    }
}

impl DropTableLookup for Catalog {
    fn drop_table(&self, id: &str) -> Option<&DropTable> {
        self.drops.get(id)
    }
}

impl ItemLookup for Catalog {
    fn item(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }
}

/// A consistency problem found by [`Catalog::audit`].
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogIssue {
    DanglingParent {
        mob_type: String,
        parent: String,
    },
    Cycle(MobError),
    MissingDropTable {
        mob_type: String,
        property: String,
        id: String,
    },
    MissingReference {
        mob_type: String,
        property: String,
        id: String,
    },
    MissingPotionSet {
        mob_type: String,
        property: String,
        id: String,
    },
    MissingDropPayload {
        table: String,
        payload: String,
        kind: DropKind,
    },
    SpecialItemDrop {
        table: String,
        item: String,
    },
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogIssue::DanglingParent { mob_type, parent } => {
                write!(f, "mob type {mob_type} has missing parent type {parent}")
            }
            CatalogIssue::Cycle(e) => write!(f, "{e}"),
            CatalogIssue::MissingDropTable {
                mob_type,
                property,
                id,
            } => write!(f, "{mob_type}.{property}: no drop table {id}"),
            CatalogIssue::MissingReference {
                mob_type,
                property,
                id,
            } => write!(f, "{mob_type}.{property}: {id} names no drop table or target"),
            CatalogIssue::MissingPotionSet {
                mob_type,
                property,
                id,
            } => write!(f, "{mob_type}.{property}: no potion set {id}"),
            CatalogIssue::MissingDropPayload {
                table,
                payload,
                kind,
            } => write!(f, "drop table {table}: {kind:?} {payload} does not exist"),
            CatalogIssue::SpecialItemDrop { table, item } => {
                write!(f, "drop table {table}: special item {item} cannot be dropped")
            }
        }
    }
}

impl Catalog {
    /// A catalog holding only the predefined mob types and special items.
    pub fn new() -> Self {
        Self::default()
    }

    /// See [`bm_rs_mobs::resolve_derived`].
    pub fn resolve_derived<'a>(
        &'a self,
        mob_type: &'a MobType,
        property_id: &str,
    ) -> Result<Option<&'a PropertySlot>, MobError> {
        bm_rs_mobs::resolve_derived(self, mob_type, property_id)
    }

    /// Find dangling references and inheritance cycles.
    pub fn audit(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();

        for mob_type in self.mobs.all() {
            for slot in mob_type.overridden() {
                if let Some(issue) = self.audit_slot(mob_type, slot) {
                    issues.push(issue);
                }
            }
        }
        issues.extend(
            self.mobs
                .check_inheritance()
                .into_iter()
                .map(CatalogIssue::Cycle),
        );

        for table in self.drops.all() {
            for entry in table.entries() {
                let payload = entry.key();
                match entry.kind() {
                    DropKind::Nothing => {}
                    DropKind::Item => match self.items.get(payload) {
                        None => issues.push(CatalogIssue::MissingDropPayload {
                            table: table.id().into(),
                            payload: payload.into(),
                            kind: DropKind::Item,
                        }),
                        Some(item) if item.is_special() => {
                            issues.push(CatalogIssue::SpecialItemDrop {
                                table: table.id().into(),
                                item: payload.into(),
                            })
                        }
                        Some(_) => {}
                    },
                    DropKind::Mob => {
                        if self.mobs.get(payload).is_none() {
                            issues.push(CatalogIssue::MissingDropPayload {
                                table: table.id().into(),
                                payload: payload.into(),
                                kind: DropKind::Mob,
                            });
                        }
                    }
                }
            }
        }
        issues
    }

    fn audit_slot(&self, mob_type: &MobType, slot: &PropertySlot) -> Option<CatalogIssue> {
        let id = slot.value()?.as_str()?;
        let mob = || mob_type.id().to_string();
        let property = || slot.id().to_string();

        if slot.id() == PARENT_TYPE {
            return self.mobs.get(id).is_none().then(|| CatalogIssue::DanglingParent {
                mob_type: mob(),
                parent: id.into(),
            });
        }
        let kind = slot.kind();
        if kind.references_drop_table() && self.drops.get(id).is_some() {
            return None;
        }
        match kind {
            ValueKind::Loot => Some(CatalogIssue::MissingDropTable {
                mob_type: mob(),
                property: property(),
                id: id.into(),
            }),
            ValueKind::LootOrItem if self.items.get(id).is_none() => {
                Some(CatalogIssue::MissingReference {
                    mob_type: mob(),
                    property: property(),
                    id: id.into(),
                })
            }
            ValueKind::LootOrMob if self.mobs.get(id).is_none() => {
                Some(CatalogIssue::MissingReference {
                    mob_type: mob(),
                    property: property(),
                    id: id.into(),
                })
            }
            ValueKind::PotionSet if self.potions.get(id).is_none() => {
                Some(CatalogIssue::MissingPotionSet {
                    mob_type: mob(),
                    property: property(),
                    id: id.into(),
                })
            }
            _ => None,
        }
    }
}
