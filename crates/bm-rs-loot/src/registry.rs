//! Registry of drop tables.

use std::collections::BTreeMap;

use tracing::debug;

use crate::drop_table::DropTable;
use crate::error::LootError;

/// Read access to drop tables by ID.
pub trait DropTableLookup {
    fn drop_table(&self, id: &str) -> Option<&DropTable>;
}

/// All drop tables, keyed by ID.
#[derive(Debug, Clone, Default)]
pub struct DropTableRegistry {
    tables: BTreeMap<String, DropTable>,
}

impl DropTableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&DropTable> {
        self.tables.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut DropTable> {
        self.tables.get_mut(id)
    }

    /// All tables in ID order.
    pub fn all(&self) -> impl Iterator<Item = &DropTable> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn add(&mut self, table: DropTable) -> Result<&mut DropTable, LootError> {
        let id = table.id().to_string();
        if self.tables.contains_key(&id) {
            return Err(LootError::DuplicateDropTable(id));
        }
        debug!("Registered drop table {id}");
        Ok(self.tables.entry(id).or_insert(table))
    }

    pub fn remove(&mut self, id: &str) -> Result<DropTable, LootError> {
        self.tables
            .remove(id)
            .ok_or_else(|| LootError::UnknownDropTable(id.into()))
    }
}

impl DropTableLookup for DropTableRegistry {
    fn drop_table(&self, id: &str) -> Option<&DropTable> {
        self.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_get_remove() {
        let mut reg = DropTableRegistry::new();
        reg.add(DropTable::new("zombie-loot")).unwrap();
        assert!(reg.drop_table("zombie-loot").is_some());
        assert_eq!(
            reg.add(DropTable::new("zombie-loot")).unwrap_err(),
            LootError::DuplicateDropTable("zombie-loot".into())
        );
        reg.remove("zombie-loot").unwrap();
        assert!(reg.is_empty());
        assert!(matches!(
            reg.remove("zombie-loot"),
            Err(LootError::UnknownDropTable(_))
        ));
    }

    #[test]
    fn all_in_id_order() {
        let mut reg = DropTableRegistry::new();
        reg.add(DropTable::new("b")).unwrap();
        reg.add(DropTable::new("a")).unwrap();
        let ids: Vec<&str> = reg.all().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
