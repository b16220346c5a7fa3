//! Drop tables and outcome selection.
//!
//! Each entry is an independent trial, tried in table order. Chances do not
//! need to sum to 1, so a table can produce no outcome at all unless the
//! caller asks for a guaranteed result.

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::drop::{DropEntry, DropRecord};
use crate::error::LootError;

/// Persisted form of a drop table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropTableRecord {
    #[serde(default = "default_single")]
    pub single: bool,
    /// Drops keyed by payload ID, in table order.
    #[serde(default)]
    pub drops: Map<String, Value>,
}

fn default_single() -> bool {
    true
}

/// An ordered set of independent drop candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct DropTable {
    id: String,
    /// When set, a death produces at most one outcome.
    single: bool,
    entries: Vec<DropEntry>,
}

impl DropTable {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            single: true,
            entries: Vec::new(),
        }
    }

    pub fn with_entries(id: &str, entries: Vec<DropEntry>) -> Self {
        let mut table = Self::new(id);
        for entry in entries {
            table.set_entry(entry);
        }
        table
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_single(&self) -> bool {
        self.single
    }

    pub fn set_single(&mut self, single: bool) {
        self.single = single;
    }

    pub fn entries(&self) -> &[DropEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, key: &str) -> Option<&DropEntry> {
        self.entries.iter().find(|e| e.key() == key)
    }

    /// Add a drop, replacing in place any drop with the same key.
    pub fn set_entry(&mut self, entry: DropEntry) {
        match self.entries.iter_mut().find(|e| e.key() == entry.key()) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn remove_entry(&mut self, key: &str) -> Option<DropEntry> {
        let index = self.entries.iter().position(|e| e.key() == key)?;
        Some(self.entries.remove(index))
    }

    /// Select at most one outcome.
    ///
    /// Entries are tried in order and the first successful trial wins. When
    /// no trial succeeds the result is a synthesized `Nothing` entry, unless
    /// `guarantee` is set: then one entry is chosen uniformly, ignoring
    /// chances. A guaranteed selection from an empty table fails.
    pub fn select_one<R: Rng + ?Sized>(
        &self,
        guarantee: bool,
        rng: &mut R,
    ) -> Result<DropEntry, LootError> {
        if let Some(entry) = self.entries.iter().find(|e| e.trial(rng)) {
            return Ok(entry.clone());
        }
        if !guarantee {
            return Ok(DropEntry::no_outcome());
        }
        if self.entries.is_empty() {
            return Err(LootError::EmptyDropTable(self.id.clone()));
        }
        let index = rng.gen_range(0..self.entries.len());
        Ok(self.entries[index].clone())
    }

    /// Outcomes of one death event, in table order, `Nothing` excluded.
    ///
    /// Single tables yield at most one outcome; otherwise every entry is
    /// tried independently.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<DropEntry> {
        if self.single {
            // Non-guaranteed selection cannot fail.
            match self.select_one(false, rng) {
                Ok(entry) if !entry.is_nothing() => vec![entry],
                _ => Vec::new(),
            }
        } else {
            self.entries
                .iter()
                .filter(|e| e.trial(rng) && !e.is_nothing())
                .cloned()
                .collect()
        }
    }

    /// Decode a persisted table. Drops keep the order of the record.
    pub fn from_record(id: &str, record: &DropTableRecord) -> Result<Self, LootError> {
        let mut table = Self::new(id);
        table.single = record.single;
        for (key, value) in &record.drops {
            let drop: DropRecord =
                serde_json::from_value(value.clone()).map_err(|e| LootError::InvalidRecord {
                    id: format!("{id}/{key}"),
                    reason: e.to_string(),
                })?;
            table.set_entry(DropEntry::from_record(key, &drop)?);
        }
        Ok(table)
    }

    pub fn to_record(&self) -> DropTableRecord {
        let mut drops = Map::new();
        for entry in &self.entries {
            let value = serde_json::to_value(entry.to_record()).unwrap_or(Value::Null);
            drops.insert(entry.key().to_string(), value);
        }
        DropTableRecord {
            single: self.single,
            drops,
        }
    }

    /// Multi-line description: a header and one line per drop.
    pub fn description(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "{} ({}, {} drop{})",
            self.id,
            if self.single { "single" } else { "multiple" },
            self.entries.len(),
            if self.entries.len() == 1 { "" } else { "s" }
        )];
        lines.extend(
            self.entries
                .iter()
                .map(|e| format!("  {}", e.short_description())),
        );
        lines
    }
}
