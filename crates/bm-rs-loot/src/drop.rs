//! A single candidate drop: an item, a mob, or nothing.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::LootError;
use crate::item::{ItemLookup, ItemStack};

/// Payload key used for `Nothing` entries in persisted tables.
pub const NOTHING_KEY: &str = "nothing";

/// What a drop produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropKind {
    Nothing,
    Item,
    Mob,
}

/// Persisted form of a drop, keyed by payload ID in its table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropRecord {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<DropKind>,
    #[serde(default)]
    pub chance: f64,
    #[serde(default = "default_min")]
    pub min: u32,
    #[serde(default)]
    pub max: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
}

fn default_min() -> u32 {
    1
}

/// One candidate outcome of a drop table.
///
/// `chance` is an independent probability: each entry is its own trial.
#[derive(Debug, Clone, PartialEq)]
pub struct DropEntry {
    kind: DropKind,
    /// Key of this drop in its table. `Nothing` drops keep the key they were
    /// stored under.
    key: String,
    payload_id: Option<String>,
    chance: f64,
    min: u32,
    max: u32,
    objective: Option<String>,
}

impl DropEntry {
    /// Create a drop keyed by `payload_id`.
    ///
    /// `Nothing` drops have no payload; the ID only keys them in the table,
    /// and an empty ID keys them as `nothing`.
    pub fn new(
        kind: DropKind,
        payload_id: &str,
        chance: f64,
        min: u32,
        max: u32,
    ) -> Result<Self, LootError> {
        let key = match kind {
            DropKind::Nothing if payload_id.is_empty() => NOTHING_KEY,
            _ => payload_id,
        };
        if !(0.0..=1.0).contains(&chance) {
            return Err(LootError::InvalidChance {
                payload: key.into(),
                chance,
            });
        }
        if min > max {
            return Err(LootError::InvalidQuantity {
                payload: key.into(),
                min,
                max,
            });
        }
        Ok(Self {
            kind,
            key: key.to_string(),
            payload_id: (kind != DropKind::Nothing).then(|| payload_id.to_string()),
            chance,
            min,
            max,
            objective: None,
        })
    }

    pub fn item(item_id: &str, chance: f64, min: u32, max: u32) -> Result<Self, LootError> {
        Self::new(DropKind::Item, item_id, chance, min, max)
    }

    pub fn mob(mob_type_id: &str, chance: f64) -> Result<Self, LootError> {
        Self::new(DropKind::Mob, mob_type_id, chance, 1, 1)
    }

    pub fn nothing(chance: f64) -> Result<Self, LootError> {
        Self::new(DropKind::Nothing, NOTHING_KEY, chance, 0, 0)
    }

    /// The "no outcome" result of a selection that found nothing.
    pub(crate) fn no_outcome() -> Self {
        Self {
            kind: DropKind::Nothing,
            key: NOTHING_KEY.to_string(),
            payload_id: None,
            chance: 0.0,
            min: 0,
            max: 0,
            objective: None,
        }
    }

    /// Decode a persisted drop keyed by `key`.
    ///
    /// Defaults follow the catalog format: kind `item` (or `nothing` for the
    /// `nothing` key), chance 0, min 1, max `max(1, min)`.
    pub fn from_record(key: &str, record: &DropRecord) -> Result<Self, LootError> {
        let kind = record.kind.unwrap_or(if key == NOTHING_KEY {
            DropKind::Nothing
        } else {
            DropKind::Item
        });
        let max = record.max.unwrap_or(record.min.max(1));
        let entry = Self::new(kind, key, record.chance, record.min, max)?;
        Ok(entry.with_objective(record.objective.clone()))
    }

    pub fn to_record(&self) -> DropRecord {
        DropRecord {
            kind: Some(self.kind),
            chance: self.chance,
            min: self.min,
            max: Some(self.max),
            objective: self.objective.clone(),
        }
    }

    /// Attach (or clear) the objective tag associated with this drop.
    pub fn with_objective(mut self, objective: Option<String>) -> Self {
        self.objective = objective;
        self
    }

    pub fn kind(&self) -> DropKind {
        self.kind
    }

    pub fn payload_id(&self) -> Option<&str> {
        self.payload_id.as_deref()
    }

    /// Key of this drop in its table.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn chance(&self) -> f64 {
        self.chance
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn objective(&self) -> Option<&str> {
        self.objective.as_deref()
    }

    pub fn is_nothing(&self) -> bool {
        self.kind == DropKind::Nothing
    }

    /// Run this entry's independent trial.
    pub fn trial<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen::<f64>() < self.chance
    }

    /// Uniform quantity in `[min, max]`.
    pub fn roll_quantity<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if self.min == self.max {
            self.min
        } else {
            rng.gen_range(self.min..=self.max)
        }
    }

    /// Materialize an item drop as a stack with a random quantity.
    ///
    /// Returns `Ok(None)` if the item materializes to nothing.
    pub fn generate<L, R>(&self, items: &L, rng: &mut R) -> Result<Option<ItemStack>, LootError>
    where
        L: ItemLookup + ?Sized,
        R: Rng + ?Sized,
    {
        if self.kind != DropKind::Item {
            return Err(LootError::NotAnItemDrop(self.key().into()));
        }
        let item = items
            .item(self.key())
            .ok_or_else(|| LootError::UnknownItem(self.key().into()))?;
        if item.is_special() {
            return Err(LootError::UnsupportedSpecialItem(item.id().into()));
        }
        Ok(item.materialize().map(|mut stack| {
            stack.count = self.roll_quantity(rng);
            stack
        }))
    }

    /// One-line description, e.g. `50% [1,3] gold`.
    pub fn short_description(&self) -> String {
        let mut s = String::new();
        if let Some(objective) = &self.objective {
            s.push_str(&format!("(objective: {objective}) "));
        }
        s.push_str(&format!("{}% ", format_percent(self.chance)));
        match self.kind {
            DropKind::Nothing if self.key == NOTHING_KEY => s.push_str("nothing"),
            DropKind::Nothing => s.push_str(&format!("nothing ({})", self.key)),
            DropKind::Item => {
                if self.min == self.max {
                    s.push_str(&format!("{} {}", self.min, self.key()));
                } else {
                    s.push_str(&format!("[{},{}] {}", self.min, self.max, self.key()));
                }
            }
            DropKind::Mob => s.push_str(&format!("mob {}", self.key())),
        }
        s
    }
}

fn format_percent(chance: f64) -> f64 {
    (chance * 100.0 * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemRecord, ItemRegistry, DEFAULT_ITEM};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn items() -> ItemRegistry {
        let mut reg = ItemRegistry::new();
        reg.add(
            "gold",
            ItemRecord {
                material: "gold_ingot".into(),
                name: None,
            },
        )
        .unwrap();
        reg
    }

    #[test]
    fn rejects_invalid_chance_and_range() {
        assert!(matches!(
            DropEntry::item("gold", 1.5, 1, 1),
            Err(LootError::InvalidChance { .. })
        ));
        assert!(matches!(
            DropEntry::item("gold", -0.1, 1, 1),
            Err(LootError::InvalidChance { .. })
        ));
        assert!(matches!(
            DropEntry::item("gold", 0.5, 3, 2),
            Err(LootError::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn quantity_within_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let drop = DropEntry::item("gold", 1.0, 2, 5).unwrap();
        let mut seen = [false; 6];
        for _ in 0..500 {
            let n = drop.roll_quantity(&mut rng);
            assert!((2..=5).contains(&n));
            seen[n as usize] = true;
        }
        assert!(seen[2] && seen[5]);
    }

    #[test]
    fn fixed_quantity() {
        let mut rng = StdRng::seed_from_u64(1);
        let drop = DropEntry::item("gold", 1.0, 3, 3).unwrap();
        for _ in 0..50 {
            assert_eq!(drop.roll_quantity(&mut rng), 3);
        }
    }

    #[test]
    fn trial_extremes() {
        let mut rng = StdRng::seed_from_u64(3);
        let always = DropEntry::item("gold", 1.0, 1, 1).unwrap();
        let never = DropEntry::item("gold", 0.0, 1, 1).unwrap();
        for _ in 0..1000 {
            assert!(always.trial(&mut rng));
            assert!(!never.trial(&mut rng));
        }
    }

    #[test]
    fn generate_item_stack() {
        let mut rng = StdRng::seed_from_u64(11);
        let drop = DropEntry::item("gold", 1.0, 1, 4).unwrap();
        let stack = drop.generate(&items(), &mut rng).unwrap().unwrap();
        assert_eq!(stack.item_id, "gold");
        assert!((1..=4).contains(&stack.count));
    }

    #[test]
    fn generate_special_item_fails() {
        let mut rng = StdRng::seed_from_u64(11);
        let drop = DropEntry::item(DEFAULT_ITEM, 1.0, 1, 1).unwrap();
        assert_eq!(
            drop.generate(&items(), &mut rng),
            Err(LootError::UnsupportedSpecialItem(DEFAULT_ITEM.into()))
        );
    }

    #[test]
    fn generate_unknown_or_non_item_fails() {
        let mut rng = StdRng::seed_from_u64(11);
        let missing = DropEntry::item("diamond", 1.0, 1, 1).unwrap();
        assert_eq!(
            missing.generate(&items(), &mut rng),
            Err(LootError::UnknownItem("diamond".into()))
        );
        let mob = DropEntry::mob("zombie", 1.0).unwrap();
        assert!(matches!(
            mob.generate(&items(), &mut rng),
            Err(LootError::NotAnItemDrop(_))
        ));
    }

    #[test]
    fn record_defaults() {
        let record: DropRecord = serde_json::from_str(r#"{ "chance": 0.25 }"#).unwrap();
        let drop = DropEntry::from_record("gold", &record).unwrap();
        assert_eq!(drop.kind(), DropKind::Item);
        assert_eq!((drop.min(), drop.max()), (1, 1));

        let record: DropRecord = serde_json::from_str(r#"{ "min": 4 }"#).unwrap();
        let drop = DropEntry::from_record("gold", &record).unwrap();
        assert_eq!((drop.min(), drop.max()), (4, 4));
        assert_eq!(drop.chance(), 0.0);

        let record: DropRecord = serde_json::from_str(r#"{ "chance": 0.5 }"#).unwrap();
        let drop = DropEntry::from_record(NOTHING_KEY, &record).unwrap();
        assert!(drop.is_nothing());
        assert!(drop.payload_id().is_none());
    }

    #[test]
    fn nothing_drop_keeps_its_key() {
        let record: DropRecord =
            serde_json::from_str(r#"{ "type": "nothing", "chance": 0.2 }"#).unwrap();
        let drop = DropEntry::from_record("air", &record).unwrap();
        assert!(drop.is_nothing());
        assert_eq!(drop.key(), "air");
        assert!(drop.payload_id().is_none());
        assert_eq!(drop.short_description(), "20% nothing (air)");

        let back = DropEntry::from_record(drop.key(), &drop.to_record()).unwrap();
        assert_eq!(back, drop);
        assert_eq!(DropEntry::nothing(0.5).unwrap().key(), NOTHING_KEY);
    }

    #[test]
    fn record_roundtrip_keeps_objective() {
        let drop = DropEntry::mob("zombie-baron", 0.125)
            .unwrap()
            .with_objective(Some("boss-key".into()));
        let back = DropEntry::from_record(drop.key(), &drop.to_record()).unwrap();
        assert_eq!(back, drop);
    }

    #[test]
    fn short_descriptions() {
        let d = DropEntry::item("gold", 0.5, 1, 3).unwrap();
        assert_eq!(d.short_description(), "50% [1,3] gold");
        let d = DropEntry::item("gold", 1.0, 1, 1)
            .unwrap()
            .with_objective(Some("key".into()));
        assert_eq!(d.short_description(), "(objective: key) 100% 1 gold");
        let d = DropEntry::nothing(0.1).unwrap();
        assert_eq!(d.short_description(), "10% nothing");
    }
}
