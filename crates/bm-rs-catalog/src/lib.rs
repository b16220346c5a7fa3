//! The catalog of mob types, drop tables, items and potion sets, with
//! persistence, consistency auditing and the entity configuration pass.

pub mod catalog;
pub mod configure;
pub mod death;
pub mod error;
pub mod potion;
pub mod reference;
pub mod shared;
pub mod store;

pub use catalog::{Catalog, CatalogIssue};
pub use configure::{
    configure_mob, Attribute, ConfigureReport, EntityEffect, EquipmentSlot, MobEntity,
    PropertyFailure, SimulatedEntity,
};
pub use death::{death_drops, DeathDrops};
pub use error::CatalogError;
pub use potion::{PotionEffect, PotionRegistry, PotionSet, PotionSetRecord};
pub use reference::{
    resolve_equipment, resolve_mob_reference, resolve_reference, EquipmentChoice, Reference,
};
pub use shared::SharedCatalog;
pub use store::{load_file, save_file, CatalogDocument};
