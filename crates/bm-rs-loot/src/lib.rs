//! Drop tables: independent-chance drop entries, single-outcome selection
//! with an optional guarantee, and item materialization.

pub mod drop;
pub mod drop_table;
pub mod error;
pub mod item;
pub mod registry;

pub use drop::{DropEntry, DropKind, DropRecord, NOTHING_KEY};
pub use drop_table::{DropTable, DropTableRecord};
pub use error::LootError;
pub use item::{Item, ItemLookup, ItemRecord, ItemRegistry, ItemStack, DEFAULT_ITEM, NOTHING_ITEM};
pub use registry::{DropTableLookup, DropTableRegistry};
