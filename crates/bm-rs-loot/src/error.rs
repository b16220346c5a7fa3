//! Loot errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LootError {
    #[error("drop table {0} has no entries to choose from")]
    EmptyDropTable(String),

    #[error("can't drop special item {0}")]
    UnsupportedSpecialItem(String),

    #[error("unknown item: {0}")]
    UnknownItem(String),

    #[error("unknown drop table: {0}")]
    UnknownDropTable(String),

    #[error("drop table {table} has no drop {payload}")]
    UnknownDrop { table: String, payload: String },

    #[error("drop {0} is not an item drop")]
    NotAnItemDrop(String),

    #[error("drop chance {chance} of {payload} is outside [0,1]")]
    InvalidChance { payload: String, chance: f64 },

    #[error("drop quantity [{min},{max}] of {payload} is invalid")]
    InvalidQuantity { payload: String, min: u32, max: u32 },

    #[error("drop table {0} already exists")]
    DuplicateDropTable(String),

    #[error("item {0} already exists")]
    DuplicateItem(String),

    #[error("special item {0} cannot be changed")]
    SpecialItem(String),

    #[error("invalid record {id}: {reason}")]
    InvalidRecord { id: String, reason: String },
}
