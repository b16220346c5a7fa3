//! Snapshot sharing between readers and the admin editor.

use std::sync::{Arc, RwLock};

use crate::catalog::Catalog;

/// The live catalog, swapped copy-on-write.
///
/// Readers take an `Arc` snapshot and keep it for a whole resolution or
/// configuration pass, so they never see a half-applied edit.
#[derive(Debug, Default)]
pub struct SharedCatalog {
    current: RwLock<Arc<Catalog>>,
}

impl SharedCatalog {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    /// The current catalog.
    pub fn snapshot(&self) -> Arc<Catalog> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Apply `f` to a copy of the catalog and publish the copy.
    ///
    /// If `f` fails the published catalog is left untouched.
    pub fn edit<T, E>(&self, f: impl FnOnce(&mut Catalog) -> Result<T, E>) -> Result<T, E> {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut next = Catalog::clone(&guard);
        let out = f(&mut next)?;
        *guard = Arc::new(next);
        Ok(out)
    }

    /// Publish a whole new catalog, e.g. one reloaded from disk.
    pub fn replace(&self, catalog: Catalog) {
        let mut guard = match self.current.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Arc::new(catalog);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bm_rs_mobs::{MobError, PropertyValue};

    #[test]
    fn snapshot_is_isolated_from_edits() {
        let shared = SharedCatalog::new(Catalog::new());
        let before = shared.snapshot();
        shared
            .edit(|c| c.mobs.add_custom("zombie-baron", Some("zombie")).map(|_| ()))
            .unwrap();
        assert!(before.mobs.get("zombie-baron").is_none());
        assert!(shared.snapshot().mobs.get("zombie-baron").is_some());
    }

    #[test]
    fn failed_edit_publishes_nothing() {
        let shared = SharedCatalog::new(Catalog::new());
        let result: Result<(), MobError> = shared.edit(|c| {
            c.mobs
                .set_property("zombie", "health", Some(PropertyValue::Double(40.0)))?;
            c.mobs.set_property("zombie", "mana", None)
        });
        assert!(result.is_err());
        let snap = shared.snapshot();
        let zombie = snap.mobs.get("zombie").unwrap();
        assert!(!zombie.property("health").unwrap().is_set());
    }
}
