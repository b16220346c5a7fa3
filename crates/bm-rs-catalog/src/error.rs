//! Catalog errors.

use bm_rs_loot::LootError;
use bm_rs_mobs::MobError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Mob(#[from] MobError),

    #[error(transparent)]
    Loot(#[from] LootError),

    #[error("unknown potion set: {0}")]
    UnknownPotionSet(String),

    #[error("unknown entity type: {0}")]
    UnknownEntityType(String),

    #[error("potion set {0} already exists")]
    DuplicatePotionSet(String),

    #[error("catalog I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
