//! Applying a mob type's derived properties to a spawned entity.
//!
//! The pass walks the schema in declaration order, resolves each property's
//! derived value and turns it into [`EntityEffect`]s for the entity to apply.
//! Properties whose capability the entity lacks are skipped. A failing
//! property is logged and recorded; the rest of the pass continues.

use std::collections::BTreeSet;

use bm_rs_loot::ItemStack;
use bm_rs_mobs::schema::{ENTITY_TYPE, SCHEMA};
use bm_rs_mobs::{
    derived_value, resolve_derived, Capability, EntityKind, MobType, PropertyValue, SoundEffect,
};
use rand::Rng;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::potion::PotionEffect;
use crate::reference::{resolve_equipment, resolve_mob_reference, EquipmentChoice};

/// An equipment slot on a mob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipmentSlot {
    Helmet,
    ChestPlate,
    Leggings,
    Boots,
    MainHand,
    OffHand,
}

impl EquipmentSlot {
    /// The slot configured by an equipment property.
    pub fn for_property(id: &str) -> Option<Self> {
        Some(match id {
            "helmet" | "helmet-drop-percent" => EquipmentSlot::Helmet,
            "chest-plate" | "chest-plate-drop-percent" => EquipmentSlot::ChestPlate,
            "leggings" | "leggings-drop-percent" => EquipmentSlot::Leggings,
            "boots" | "boots-drop-percent" => EquipmentSlot::Boots,
            "main-hand" | "main-hand-drop-percent" => EquipmentSlot::MainHand,
            "off-hand" | "off-hand-drop-percent" => EquipmentSlot::OffHand,
            _ => return None,
        })
    }
}

/// Entity attributes set from buff properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    MaxHealth,
    MovementSpeed,
    FlyingSpeed,
    FollowRange,
    AttackDamage,
    AttackSpeed,
}

/// A change the configuration pass asks the entity to make.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityEffect {
    /// Tag the entity with the ID of its mob type.
    SetMobType(String),
    SetCustomName(String),
    SetNamePlateVisible(bool),
    SetDisguise(String),
    /// Spawn a mob of this type and mount it on the entity.
    AddPassenger(String),
    SetSize(i64),
    SetVisualFire(bool),
    SetGlowing(bool),
    SetInvisible(bool),
    SetBaby(bool),
    SetPowered(bool),
    SetSilent(bool),
    PlaySound(SoundEffect),
    SetAttribute { attribute: Attribute, value: f64 },
    SetBreathTicks(i64),
    SetCanPickupItems(bool),
    ApplyPotionSet { id: String, effects: Vec<PotionEffect> },
    Equip { slot: EquipmentSlot, stack: ItemStack },
    ClearEquipment { slot: EquipmentSlot },
    SetDropChance { slot: EquipmentSlot, chance: f64 },
    SetExplosionRadius(i64),
    SetFuseTicks(i64),
    Ignite,
    AddTags(BTreeSet<String>),
    SetAnger(i64),
    SetRemoveWhenFarAway(bool),
}

/// A live entity that can be configured.
pub trait MobEntity {
    fn capabilities(&self) -> &[Capability];
    fn apply(&mut self, effect: EntityEffect);
}

/// A property that could not be applied.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyFailure {
    pub property: &'static str,
    pub reason: String,
}

/// Outcome of one configuration pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigureReport {
    /// Properties that produced effects, in schema order.
    pub applied: Vec<&'static str>,
    /// Properties skipped because the entity lacks the needed capability.
    pub unsupported: Vec<&'static str>,
    pub failures: Vec<PropertyFailure>,
}

/// Configure `entity` from the derived properties of `mob_type`.
pub fn configure_mob<E, R>(
    catalog: &Catalog,
    mob_type: &MobType,
    entity: &mut E,
    rng: &mut R,
) -> ConfigureReport
where
    E: MobEntity + ?Sized,
    R: Rng + ?Sized,
{
    let mut report = ConfigureReport::default();
    entity.apply(EntityEffect::SetMobType(mob_type.id().to_string()));

    for descriptor in SCHEMA {
        let id = descriptor.id;
        let value = match resolve_derived(catalog, mob_type, id) {
            Ok(slot) => slot.and_then(|s| s.value()),
            Err(e) => {
                fail(&mut report, mob_type, id, &CatalogError::from(e));
                continue;
            }
        };
        let Some(value) = value else {
            continue;
        };
        if let Some(capability) = descriptor.requires {
            if !entity.capabilities().contains(&capability) {
                debug!("{}: entity cannot apply {id}", mob_type.id());
                report.unsupported.push(id);
                continue;
            }
        }
        match effects_for(catalog, mob_type, id, value, rng) {
            Ok(effects) if effects.is_empty() => {}
            Ok(effects) => {
                for effect in effects {
                    entity.apply(effect);
                }
                report.applied.push(id);
            }
            Err(e) => fail(&mut report, mob_type, id, &e),
        }
    }
    report
}

fn fail(report: &mut ConfigureReport, mob_type: &MobType, property: &'static str, e: &CatalogError) {
    warn!("Error applying property {property} of mob type {}: {e}", mob_type.id());
    report.failures.push(PropertyFailure {
        property,
        reason: e.to_string(),
    });
}

fn roll_percent<R: Rng + ?Sized>(rng: &mut R, percent: f64) -> bool {
    rng.gen::<f64>() * 100.0 < percent
}

/// Effects for one property. Properties consulted elsewhere (sounds played
/// on death, drops, projectile and support-mob rules) yield no effects.
fn effects_for<R: Rng + ?Sized>(
    catalog: &Catalog,
    mob_type: &MobType,
    id: &str,
    value: &PropertyValue,
    rng: &mut R,
) -> Result<Vec<EntityEffect>, CatalogError> {
    use EntityEffect as E;

    let text = || value.as_str().unwrap_or_default().to_string();
    let flag = value.as_bool().unwrap_or_default();
    let number = value.as_double().unwrap_or_default();
    let integer = value.as_integer().unwrap_or_default();
    let attribute = |attribute| vec![E::SetAttribute { attribute, value: number }];

    let effects = match id {
        "name" => vec![E::SetCustomName(text())],
        "show-name-plate" => vec![E::SetNamePlateVisible(flag)],
        "disguise" => vec![E::SetDisguise(text())],
        "passenger" => {
            let chance = derived_value(catalog, mob_type, "passenger-percent")?
                .and_then(PropertyValue::as_double)
                .unwrap_or(100.0);
            if !roll_percent(rng, chance) {
                return Ok(Vec::new());
            }
            match resolve_mob_reference(catalog, &text(), rng)? {
                Some(passenger) => vec![E::AddPassenger(passenger.id().to_string())],
                None => Vec::new(),
            }
        }
        "size" => vec![E::SetSize(integer)],
        "burning-percent" => vec![E::SetVisualFire(roll_percent(rng, number))],
        "glowing" => vec![E::SetGlowing(flag)],
        "glowing-percent" => vec![E::SetGlowing(roll_percent(rng, number))],
        "invisible-percent" => vec![E::SetInvisible(roll_percent(rng, number))],
        "baby-percent" => vec![E::SetBaby(roll_percent(rng, number))],
        "charged-percent" => vec![E::SetPowered(roll_percent(rng, number))],
        "silent" => vec![E::SetSilent(flag)],
        "spawn-sound" => value.as_sound().cloned().map(E::PlaySound).into_iter().collect(),
        "health" => attribute(Attribute::MaxHealth),
        "breath-seconds" => vec![E::SetBreathTicks(integer.saturating_mul(20))],
        "speed" => attribute(Attribute::MovementSpeed),
        "flying-speed" => attribute(Attribute::FlyingSpeed),
        "follow-range" => attribute(Attribute::FollowRange),
        "attack-damage" => attribute(Attribute::AttackDamage),
        "attack-speed" => attribute(Attribute::AttackSpeed),
        "pick-up-percent" => vec![E::SetCanPickupItems(roll_percent(rng, number))],
        "potion-buffs" => {
            let set_id = text();
            let set = catalog
                .potions
                .get(&set_id)
                .ok_or_else(|| CatalogError::UnknownPotionSet(set_id.clone()))?;
            vec![E::ApplyPotionSet {
                effects: set.choose_effects(rng),
                id: set_id,
            }]
        }
        "helmet" | "chest-plate" | "leggings" | "boots" | "main-hand" | "off-hand" => {
            let Some(slot) = EquipmentSlot::for_property(id) else {
                return Ok(Vec::new());
            };
            match resolve_equipment(catalog, &text(), rng)? {
                EquipmentChoice::Unchanged => Vec::new(),
                EquipmentChoice::Empty => vec![E::ClearEquipment { slot }],
                EquipmentChoice::Stack(stack) => vec![E::Equip { slot, stack }],
            }
        }
        "helmet-drop-percent"
        | "chest-plate-drop-percent"
        | "leggings-drop-percent"
        | "boots-drop-percent"
        | "main-hand-drop-percent"
        | "off-hand-drop-percent" => EquipmentSlot::for_property(id)
            .map(|slot| E::SetDropChance {
                slot,
                chance: number / 100.0,
            })
            .into_iter()
            .collect(),
        "explosion-radius" => vec![E::SetExplosionRadius(integer)],
        "fuse-ticks" => vec![E::SetFuseTicks(integer)],
        "ignited-percent" => {
            if roll_percent(rng, number) {
                vec![E::Ignite]
            } else {
                Vec::new()
            }
        }
        "tags" => value.as_tags().cloned().map(E::AddTags).into_iter().collect(),
        "anger-ticks" => vec![E::SetAnger(integer)],
        "can-despawn" => vec![E::SetRemoveWhenFarAway(flag)],
        _ => Vec::new(),
    };
    Ok(effects)
}

/// An entity that records the effects applied to it.
///
/// Used for dry runs of the configuration pass.
#[derive(Debug, Clone)]
pub struct SimulatedEntity {
    kind: &'static EntityKind,
    effects: Vec<EntityEffect>,
}

impl SimulatedEntity {
    pub fn new(kind: &'static EntityKind) -> Self {
        Self {
            kind,
            effects: Vec::new(),
        }
    }

    /// A simulated entity of the derived `entity-type` of `mob_type`.
    pub fn for_mob_type(catalog: &Catalog, mob_type: &MobType) -> Result<Self, CatalogError> {
        let name = derived_value(catalog, mob_type, ENTITY_TYPE)?
            .and_then(PropertyValue::as_str)
            .unwrap_or(mob_type.id());
        EntityKind::from_name(name)
            .map(Self::new)
            .ok_or_else(|| CatalogError::UnknownEntityType(name.to_string()))
    }

    pub fn kind(&self) -> &'static EntityKind {
        self.kind
    }

    pub fn effects(&self) -> &[EntityEffect] {
        &self.effects
    }
}

impl MobEntity for SimulatedEntity {
    fn capabilities(&self) -> &[Capability] {
        self.kind.capabilities
    }

    fn apply(&mut self, effect: EntityEffect) {
        self.effects.push(effect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::potion::PotionSet;
    use bm_rs_loot::{DropEntry, DropTable, ItemRecord};
    use bm_rs_mobs::MobError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn set(catalog: &mut Catalog, mob: &str, property: &str, value: PropertyValue) {
        catalog
            .mobs
            .set_property(mob, property, Some(value))
            .unwrap();
    }

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .items
            .add(
                "crown",
                ItemRecord {
                    material: "golden_helmet".into(),
                    name: None,
                },
            )
            .unwrap();
        catalog.mobs.add_custom("zombie-baron", Some("zombie")).unwrap();
        set(&mut catalog, "zombie", "speed", PropertyValue::Double(0.23));
        set(&mut catalog, "zombie-baron", "health", PropertyValue::Double(200.0));
        set(&mut catalog, "zombie-baron", "name", PropertyValue::Text("Baron".into()));
        set(&mut catalog, "zombie-baron", "helmet", PropertyValue::Text("crown".into()));
        set(&mut catalog, "zombie-baron", "helmet-drop-percent", PropertyValue::Double(50.0));
        set(&mut catalog, "zombie-baron", "can-despawn", PropertyValue::Bool(false));
        catalog
    }

    fn entity(kind: &str) -> SimulatedEntity {
        SimulatedEntity::new(EntityKind::from_name(kind).unwrap())
    }

    #[test]
    fn applies_derived_properties_in_schema_order() {
        let catalog = catalog();
        let baron = catalog.mobs.get("zombie-baron").unwrap();
        let mut zombie = entity("zombie");
        let mut rng = StdRng::seed_from_u64(3);
        let report = configure_mob(&catalog, baron, &mut zombie, &mut rng);

        assert!(report.failures.is_empty());
        assert_eq!(
            report.applied,
            vec!["name", "health", "speed", "helmet", "helmet-drop-percent", "can-despawn"]
        );
        let effects = zombie.effects();
        assert_eq!(effects[0], EntityEffect::SetMobType("zombie-baron".into()));
        assert!(effects.contains(&EntityEffect::SetAttribute {
            attribute: Attribute::MovementSpeed,
            value: 0.23,
        }));
        assert!(effects.contains(&EntityEffect::SetDropChance {
            slot: EquipmentSlot::Helmet,
            chance: 0.5,
        }));
        assert!(matches!(
            effects.last(),
            Some(EntityEffect::SetRemoveWhenFarAway(false))
        ));
    }

    #[test]
    fn skips_properties_without_capability() {
        let mut catalog = catalog();
        set(&mut catalog, "zombie-baron", "charged-percent", PropertyValue::Double(100.0));
        let baron = catalog.mobs.get("zombie-baron").unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        let mut zombie = entity("zombie");
        let report = configure_mob(&catalog, baron, &mut zombie, &mut rng);
        assert_eq!(report.unsupported, vec!["charged-percent"]);

        // A creeper cannot wear a helmet but can be charged.
        let mut creeper = entity("creeper");
        let report = configure_mob(&catalog, baron, &mut creeper, &mut rng);
        assert!(report.unsupported.contains(&"helmet"));
        assert!(creeper.effects().contains(&EntityEffect::SetPowered(true)));
    }

    #[test]
    fn failing_property_does_not_stop_the_pass() {
        let mut catalog = catalog();
        set(&mut catalog, "zombie-baron", "potion-buffs", PropertyValue::Text("missing".into()));
        set(&mut catalog, "zombie-baron", "main-hand", PropertyValue::Text("sceptre".into()));
        let baron = catalog.mobs.get("zombie-baron").unwrap();
        let mut zombie = entity("zombie");
        let mut rng = StdRng::seed_from_u64(3);
        let report = configure_mob(&catalog, baron, &mut zombie, &mut rng);

        let failed: Vec<&str> = report.failures.iter().map(|f| f.property).collect();
        assert_eq!(failed, vec!["potion-buffs", "main-hand"]);
        assert!(report.applied.contains(&"can-despawn"));
    }

    #[test]
    fn cycles_are_reported_per_property() {
        let mut catalog = Catalog::new();
        catalog.mobs.add_custom("a", Some("b")).unwrap();
        catalog.mobs.add_custom("b", Some("a")).unwrap();
        set(&mut catalog, "a", "entity-type", PropertyValue::Text("zombie".into()));
        let a = catalog.mobs.get("a").unwrap();
        let mut zombie = entity("zombie");
        let mut rng = StdRng::seed_from_u64(3);
        let report = configure_mob(&catalog, a, &mut zombie, &mut rng);
        // Every property except the two set on `a` itself hits the cycle.
        assert_eq!(report.failures.len(), SCHEMA.len() - 2);
        assert_eq!(
            report.failures[0].reason,
            MobError::CyclicInheritance {
                chain: vec!["a".into(), "b".into(), "a".into()],
            }
            .to_string()
        );
    }

    #[test]
    fn passenger_defaults_to_certain() {
        let mut catalog = catalog();
        set(&mut catalog, "zombie-baron", "passenger", PropertyValue::Text("chicken".into()));
        let baron = catalog.mobs.get("zombie-baron").unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let mut zombie = entity("zombie");
            configure_mob(&catalog, baron, &mut zombie, &mut rng);
            assert!(zombie
                .effects()
                .contains(&EntityEffect::AddPassenger("chicken".into())));
        }

        set(&mut catalog, "zombie-baron", "passenger-percent", PropertyValue::Double(0.0));
        let baron = catalog.mobs.get("zombie-baron").unwrap();
        let mut zombie = entity("zombie");
        let report = configure_mob(&catalog, baron, &mut zombie, &mut rng);
        assert!(!report.applied.contains(&"passenger"));
    }

    #[test]
    fn equipment_and_potions_from_catalog() {
        let mut catalog = catalog();
        catalog
            .drops
            .add(DropTable::with_entries(
                "bare-hands",
                vec![DropEntry::nothing(1.0).unwrap()],
            ))
            .unwrap();
        catalog
            .potions
            .add(PotionSet {
                id: "buffs".into(),
                effects: vec![PotionEffect {
                    effect: "speed".into(),
                    amplifier: 1,
                    duration_ticks: 200,
                    chance: 1.0,
                }],
            })
            .unwrap();
        set(&mut catalog, "zombie-baron", "main-hand", PropertyValue::Text("bare-hands".into()));
        set(&mut catalog, "zombie-baron", "potion-buffs", PropertyValue::Text("buffs".into()));
        let baron = catalog.mobs.get("zombie-baron").unwrap();
        let mut zombie = entity("zombie");
        let mut rng = StdRng::seed_from_u64(3);
        configure_mob(&catalog, baron, &mut zombie, &mut rng);

        let effects = zombie.effects();
        assert!(effects.contains(&EntityEffect::ClearEquipment {
            slot: EquipmentSlot::MainHand
        }));
        assert!(effects.iter().any(|e| matches!(
            e,
            EntityEffect::Equip { slot: EquipmentSlot::Helmet, stack } if stack.item_id == "crown"
        )));
        assert!(effects.iter().any(|e| matches!(
            e,
            EntityEffect::ApplyPotionSet { id, effects } if id == "buffs" && effects.len() == 1
        )));
    }

    #[test]
    fn simulated_entity_uses_derived_entity_type() {
        let mut catalog = catalog();
        catalog.mobs.add_custom("spooky", None).unwrap();
        let baron = catalog.mobs.get("zombie-baron").unwrap();
        let sim = SimulatedEntity::for_mob_type(&catalog, baron).unwrap();
        assert_eq!(sim.kind().name, "zombie");

        let spooky = catalog.mobs.get("spooky").unwrap();
        assert!(matches!(
            SimulatedEntity::for_mob_type(&catalog, spooky),
            Err(CatalogError::UnknownEntityType(_))
        ));
    }
}
