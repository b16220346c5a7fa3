//! Table-or-direct reference resolution.
//!
//! Equipment, passenger, projectile and support-mob properties hold a single
//! ID. A drop table with that ID always takes precedence; only when no table
//! exists is the ID read as a direct item or mob type reference.

use bm_rs_loot::{
    DropKind, DropTable, DropTableLookup, ItemStack, LootError, DEFAULT_ITEM, NOTHING_ITEM,
};
use bm_rs_mobs::MobType;
use rand::Rng;
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::CatalogError;

/// What an ID stored in a table-or-direct property refers to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reference<'a> {
    Table(&'a DropTable),
    Direct(&'a str),
}

/// Try drop table lookup first, then fall back to a direct reference.
pub fn resolve_reference<'a, D>(tables: &'a D, id: &'a str) -> Reference<'a>
where
    D: DropTableLookup + ?Sized,
{
    match tables.drop_table(id) {
        Some(table) => Reference::Table(table),
        None => Reference::Direct(id),
    }
}

/// The outcome of resolving an equipment property.
#[derive(Debug, Clone, PartialEq)]
pub enum EquipmentChoice {
    /// Leave the vanilla equipment in place.
    Unchanged,
    /// Clear the slot.
    Empty,
    Stack(ItemStack),
}

/// Resolve an equipment property value to the item to equip.
///
/// Tables are selected with a guaranteed result. A `Nothing` outcome empties
/// the slot and a mob outcome leaves it unchanged. Direct references name an
/// item: `DEFAULT` leaves the slot unchanged and `NOTHING` empties it.
pub fn resolve_equipment<R: Rng + ?Sized>(
    catalog: &Catalog,
    id: &str,
    rng: &mut R,
) -> Result<EquipmentChoice, CatalogError> {
    match resolve_reference(catalog, id) {
        Reference::Table(table) => {
            let drop = table.select_one(true, rng)?;
            match drop.kind() {
                DropKind::Nothing => Ok(EquipmentChoice::Empty),
                DropKind::Mob => {
                    debug!("Equipment table {id} chose mob {}; slot unchanged", drop.key());
                    Ok(EquipmentChoice::Unchanged)
                }
                DropKind::Item => Ok(drop
                    .generate(catalog, rng)?
                    .map_or(EquipmentChoice::Empty, EquipmentChoice::Stack)),
            }
        }
        Reference::Direct(item_id) => {
            let item = catalog
                .items
                .get(item_id)
                .ok_or_else(|| LootError::UnknownItem(item_id.into()))?;
            Ok(match item.id() {
                DEFAULT_ITEM => EquipmentChoice::Unchanged,
                NOTHING_ITEM => EquipmentChoice::Empty,
                _ => item
                    .materialize()
                    .map_or(EquipmentChoice::Empty, EquipmentChoice::Stack),
            })
        }
    }
}

/// Resolve a mob reference (passengers, projectiles, support mobs).
///
/// Returns `None` when a table selects a non-mob outcome or the direct ID
/// names no mob type.
pub fn resolve_mob_reference<'a, R: Rng + ?Sized>(
    catalog: &'a Catalog,
    id: &str,
    rng: &mut R,
) -> Result<Option<&'a MobType>, CatalogError> {
    match resolve_reference(catalog, id) {
        Reference::Table(table) => {
            let drop = table.select_one(true, rng)?;
            if drop.kind() != DropKind::Mob {
                return Ok(None);
            }
            Ok(catalog.mobs.get(drop.key()))
        }
        Reference::Direct(mob_id) => Ok(catalog.mobs.get(mob_id)),
    }
}
