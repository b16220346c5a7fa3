//! Potion sets: named bundles of potion effects applied to mobs.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// One potion effect with its own application chance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotionEffect {
    pub effect: String,
    #[serde(default)]
    pub amplifier: u8,
    /// Duration in ticks.
    #[serde(rename = "duration", default = "default_duration")]
    pub duration_ticks: u32,
    #[serde(default = "default_chance")]
    pub chance: f64,
}

fn default_duration() -> u32 {
    // Effectively permanent.
    i32::MAX as u32
}

fn default_chance() -> f64 {
    1.0
}

/// Persisted form of a potion set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PotionSetRecord {
    #[serde(default)]
    pub effects: Vec<PotionEffect>,
}

/// A named set of potion effects.
#[derive(Debug, Clone, PartialEq)]
pub struct PotionSet {
    pub id: String,
    pub effects: Vec<PotionEffect>,
}

impl PotionSet {
    /// Roll each effect's chance and return the effects that apply.
    pub fn choose_effects<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<PotionEffect> {
        self.effects
            .iter()
            .filter(|e| rng.gen::<f64>() < e.chance)
            .cloned()
            .collect()
    }
}

/// Registry of potion sets, keyed by ID.
#[derive(Debug, Clone, Default)]
pub struct PotionRegistry {
    sets: BTreeMap<String, PotionSet>,
}

impl PotionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&PotionSet> {
        self.sets.get(id)
    }

    pub fn all(&self) -> impl Iterator<Item = &PotionSet> {
        self.sets.values()
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn add(&mut self, set: PotionSet) -> Result<(), CatalogError> {
        if self.sets.contains_key(&set.id) {
            return Err(CatalogError::DuplicatePotionSet(set.id));
        }
        self.sets.insert(set.id.clone(), set);
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<PotionSet, CatalogError> {
        self.sets
            .remove(id)
            .ok_or_else(|| CatalogError::UnknownPotionSet(id.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn effect_defaults() {
        let record: PotionSetRecord =
            serde_json::from_str(r#"{ "effects": [ { "effect": "speed" } ] }"#).unwrap();
        let e = &record.effects[0];
        assert_eq!(e.amplifier, 0);
        assert_eq!(e.chance, 1.0);
        assert_eq!(e.duration_ticks, i32::MAX as u32);
    }

    #[test]
    fn choose_effects_respects_chance() {
        let mut rng = StdRng::seed_from_u64(4);
        let set = PotionSet {
            id: "buffs".into(),
            effects: vec![
                PotionEffect {
                    effect: "speed".into(),
                    amplifier: 1,
                    duration_ticks: 200,
                    chance: 1.0,
                },
                PotionEffect {
                    effect: "invisibility".into(),
                    amplifier: 0,
                    duration_ticks: 200,
                    chance: 0.0,
                },
            ],
        };
        let chosen = set.choose_effects(&mut rng);
        assert_eq!(chosen.len(), 1);
        assert_eq!(chosen[0].effect, "speed");
    }

    #[test]
    fn duplicate_set_rejected() {
        let mut reg = PotionRegistry::new();
        let set = PotionSet {
            id: "buffs".into(),
            effects: vec![],
        };
        reg.add(set.clone()).unwrap();
        assert!(matches!(
            reg.add(set),
            Err(CatalogError::DuplicatePotionSet(_))
        ));
        reg.remove("buffs").unwrap();
        assert!(reg.remove("buffs").is_err());
    }
}
