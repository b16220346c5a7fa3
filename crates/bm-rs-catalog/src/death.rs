//! Loot produced when a configured mob dies.

use bm_rs_loot::{DropKind, ItemStack};
use bm_rs_mobs::resolver::{derived_value, drops_id};
use bm_rs_mobs::{MobType, PropertyValue};
use rand::Rng;
use tracing::warn;

use crate::catalog::Catalog;
use crate::error::CatalogError;

/// Everything one death event produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeathDrops {
    pub items: Vec<ItemStack>,
    /// Mob type IDs to spawn at the death location.
    pub mobs: Vec<String>,
    /// Objective tags attached to the selected drops.
    pub objectives: Vec<String>,
    /// Derived `experience`, if set anywhere in the chain.
    pub experience: Option<i64>,
}

impl DeathDrops {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.mobs.is_empty() && self.objectives.is_empty()
    }
}

/// Roll the derived `drops` table of `mob_type`.
///
/// A missing table produces no loot. Individual item drops that fail to
/// materialize are logged and skipped.
pub fn death_drops<R: Rng + ?Sized>(
    catalog: &Catalog,
    mob_type: &MobType,
    rng: &mut R,
) -> Result<DeathDrops, CatalogError> {
    let mut out = DeathDrops {
        experience: derived_value(catalog, mob_type, "experience")?
            .and_then(PropertyValue::as_integer),
        ..Default::default()
    };
    let Some(table_id) = drops_id(catalog, mob_type)? else {
        return Ok(out);
    };
    let Some(table) = catalog.drops.get(table_id) else {
        warn!("Mob type {} has missing drop table {table_id}", mob_type.id());
        return Ok(out);
    };

    for drop in table.roll(rng) {
        match drop.kind() {
            DropKind::Nothing => continue,
            DropKind::Item => match drop.generate(catalog, rng) {
                Ok(Some(stack)) => out.items.push(stack),
                Ok(None) => {}
                Err(e) => {
                    warn!("Drop table {table_id}: {e}");
                    continue;
                }
            },
            DropKind::Mob => out.mobs.push(drop.key().to_string()),
        }
        if let Some(objective) = drop.objective() {
            out.objectives.push(objective.to_string());
        }
    }
    Ok(out)
}
