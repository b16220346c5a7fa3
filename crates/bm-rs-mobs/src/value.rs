//! Property value kinds and typed values.
//!
//! Every schema entry declares a [`ValueKind`]. The kind owns parsing (from
//! admin text and from catalog JSON) and range validation, so a
//! [`PropertyValue`] stored in a slot has always been checked against it.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity_kind::EntityKind;

/// The declared type of a property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueKind {
    String,
    /// Name of a vanilla entity kind.
    EntityType,
    Boolean,
    /// Opaque encoded disguise string, interpreted by the disguise provider.
    Disguise,
    /// ID of a drop table.
    Loot,
    /// ID of a drop table, or of an item when no such table exists.
    LootOrItem,
    /// ID of a drop table, or of a mob type when no such table exists.
    LootOrMob,
    /// Percentage in [0, 100]. Out of range values are rejected.
    Percent,
    NonNegativeInteger,
    NonNegativeDouble,
    /// Integer silently clamped into `[min, max]`.
    ClampedInteger { min: i64, max: i64 },
    /// Double silently clamped into `[min, max]`.
    ClampedDouble { min: f64, max: f64 },
    SoundEffect,
    /// ID of a potion set.
    PotionSet,
    TagSet,
}

/// A sound played at a mob's location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundEffect {
    pub sound: String,
    #[serde(default = "default_one")]
    pub volume: f64,
    #[serde(default = "default_one")]
    pub pitch: f64,
}

fn default_one() -> f64 {
    1.0
}

impl fmt::Display for SoundEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.sound, self.volume, self.pitch)
    }
}

/// A validated property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Text(String),
    Bool(bool),
    Integer(i64),
    Double(f64),
    Tags(BTreeSet<String>),
    Sound(SoundEffect),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            PropertyValue::Double(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_tags(&self) -> Option<&BTreeSet<String>> {
        match self {
            PropertyValue::Tags(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_sound(&self) -> Option<&SoundEffect> {
        match self {
            PropertyValue::Sound(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to the JSON form written to the catalog file.
    pub fn to_json(&self) -> Value {
        match self {
            PropertyValue::Text(s) => Value::String(s.clone()),
            PropertyValue::Bool(b) => Value::Bool(*b),
            PropertyValue::Integer(n) => Value::from(*n),
            PropertyValue::Double(d) => Value::from(*d),
            PropertyValue::Tags(tags) => {
                Value::Array(tags.iter().cloned().map(Value::String).collect())
            }
            PropertyValue::Sound(sound) => serde_json::to_value(sound).unwrap_or(Value::Null),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Text(s) => write!(f, "{s}"),
            PropertyValue::Bool(b) => write!(f, "{b}"),
            PropertyValue::Integer(n) => write!(f, "{n}"),
            PropertyValue::Double(d) => write!(f, "{d}"),
            PropertyValue::Tags(tags) => {
                let joined: Vec<&str> = tags.iter().map(String::as_str).collect();
                write!(f, "{}", joined.join(", "))
            }
            PropertyValue::Sound(sound) => write!(f, "{sound}"),
        }
    }
}

impl ValueKind {
    /// Short human-readable name of the kind.
    pub fn name(&self) -> String {
        match self {
            ValueKind::String => "string".into(),
            ValueKind::EntityType => "entity type".into(),
            ValueKind::Boolean => "boolean".into(),
            ValueKind::Disguise => "disguise".into(),
            ValueKind::Loot => "loot table".into(),
            ValueKind::LootOrItem => "loot table or item".into(),
            ValueKind::LootOrMob => "loot table or mob type".into(),
            ValueKind::Percent => "percentage".into(),
            ValueKind::NonNegativeInteger => "non-negative integer".into(),
            ValueKind::NonNegativeDouble => "non-negative number".into(),
            ValueKind::ClampedInteger { min, max } => format!("integer [{min},{max}]"),
            ValueKind::ClampedDouble { min, max } => format!("number [{min},{max}]"),
            ValueKind::SoundEffect => "sound effect".into(),
            ValueKind::PotionSet => "potion set".into(),
            ValueKind::TagSet => "tag set".into(),
        }
    }

    /// True if values of this kind may name a drop table.
    pub fn references_drop_table(&self) -> bool {
        matches!(
            self,
            ValueKind::Loot | ValueKind::LootOrItem | ValueKind::LootOrMob
        )
    }

    /// Parse a value from admin command text.
    pub fn parse(&self, text: &str) -> Result<PropertyValue, String> {
        let text = text.trim();
        let value = match self {
            ValueKind::String
            | ValueKind::EntityType
            | ValueKind::Disguise
            | ValueKind::Loot
            | ValueKind::LootOrItem
            | ValueKind::LootOrMob
            | ValueKind::PotionSet => PropertyValue::Text(text.to_string()),
            ValueKind::Boolean => match text.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" => PropertyValue::Bool(true),
                "false" | "no" | "off" => PropertyValue::Bool(false),
                _ => return Err(format!("expected true or false, got '{text}'")),
            },
            ValueKind::Percent | ValueKind::NonNegativeDouble | ValueKind::ClampedDouble { .. } => {
                let d: f64 = text
                    .parse()
                    .map_err(|_| format!("expected a number, got '{text}'"))?;
                PropertyValue::Double(d)
            }
            ValueKind::NonNegativeInteger | ValueKind::ClampedInteger { .. } => {
                let n: i64 = text
                    .parse()
                    .map_err(|_| format!("expected an integer, got '{text}'"))?;
                PropertyValue::Integer(n)
            }
            ValueKind::SoundEffect => {
                let mut parts = text.split_whitespace();
                let sound = parts.next().unwrap_or_default().to_string();
                let volume = parse_optional_f64(parts.next(), "volume")?;
                let pitch = parse_optional_f64(parts.next(), "pitch")?;
                if parts.next().is_some() {
                    return Err("expected: <sound> [volume [pitch]]".into());
                }
                PropertyValue::Sound(SoundEffect {
                    sound,
                    volume,
                    pitch,
                })
            }
            ValueKind::TagSet => PropertyValue::Tags(
                text.split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect(),
            ),
        };
        self.validate(value)
    }

    /// Decode a value from its catalog JSON form.
    pub fn from_json(&self, json: &Value) -> Result<PropertyValue, String> {
        let value = match self {
            ValueKind::String
            | ValueKind::EntityType
            | ValueKind::Disguise
            | ValueKind::Loot
            | ValueKind::LootOrItem
            | ValueKind::LootOrMob
            | ValueKind::PotionSet => PropertyValue::Text(
                json.as_str()
                    .ok_or_else(|| format!("expected a string, got {json}"))?
                    .to_string(),
            ),
            ValueKind::Boolean => PropertyValue::Bool(
                json.as_bool()
                    .ok_or_else(|| format!("expected a boolean, got {json}"))?,
            ),
            ValueKind::Percent | ValueKind::NonNegativeDouble | ValueKind::ClampedDouble { .. } => {
                PropertyValue::Double(
                    json.as_f64()
                        .ok_or_else(|| format!("expected a number, got {json}"))?,
                )
            }
            ValueKind::NonNegativeInteger | ValueKind::ClampedInteger { .. } => {
                PropertyValue::Integer(
                    json.as_i64()
                        .ok_or_else(|| format!("expected an integer, got {json}"))?,
                )
            }
            ValueKind::SoundEffect => {
                let sound: SoundEffect = serde_json::from_value(json.clone())
                    .map_err(|e| format!("invalid sound effect: {e}"))?;
                PropertyValue::Sound(sound)
            }
            ValueKind::TagSet => {
                let tags = json
                    .as_array()
                    .ok_or_else(|| format!("expected a list of tags, got {json}"))?;
                let mut set = BTreeSet::new();
                for tag in tags {
                    let tag = tag
                        .as_str()
                        .ok_or_else(|| format!("expected a string tag, got {tag}"))?;
                    set.insert(tag.to_string());
                }
                PropertyValue::Tags(set)
            }
        };
        self.validate(value)
    }

    /// Check a value against this kind, clamping where the kind clamps.
    pub fn validate(&self, value: PropertyValue) -> Result<PropertyValue, String> {
        match (self, value) {
            (ValueKind::EntityType, PropertyValue::Text(name)) => {
                if EntityKind::from_name(&name).is_some() {
                    Ok(PropertyValue::Text(name))
                } else {
                    Err(format!("unknown entity type '{name}'"))
                }
            }
            (
                ValueKind::String
                | ValueKind::Disguise
                | ValueKind::Loot
                | ValueKind::LootOrItem
                | ValueKind::LootOrMob
                | ValueKind::PotionSet,
                PropertyValue::Text(s),
            ) => {
                if s.is_empty() {
                    Err("value cannot be empty".into())
                } else {
                    Ok(PropertyValue::Text(s))
                }
            }
            (ValueKind::Boolean, v @ PropertyValue::Bool(_)) => Ok(v),
            (ValueKind::Percent, PropertyValue::Double(d)) => {
                if (0.0..=100.0).contains(&d) {
                    Ok(PropertyValue::Double(d))
                } else {
                    Err(format!("percentage {d} is outside [0,100]"))
                }
            }
            (ValueKind::NonNegativeDouble, PropertyValue::Double(d)) => {
                if d >= 0.0 && d.is_finite() {
                    Ok(PropertyValue::Double(d))
                } else {
                    Err(format!("{d} must be a non-negative number"))
                }
            }
            (ValueKind::NonNegativeInteger, PropertyValue::Integer(n)) => {
                if n >= 0 {
                    Ok(PropertyValue::Integer(n))
                } else {
                    Err(format!("{n} must be non-negative"))
                }
            }
            (ValueKind::ClampedInteger { min, max }, PropertyValue::Integer(n)) => {
                Ok(PropertyValue::Integer(n.clamp(*min, *max)))
            }
            (ValueKind::ClampedDouble { min, max }, PropertyValue::Double(d)) => {
                if d.is_nan() {
                    Err("value is not a number".into())
                } else {
                    Ok(PropertyValue::Double(d.clamp(*min, *max)))
                }
            }
            (ValueKind::SoundEffect, PropertyValue::Sound(sound)) => {
                if sound.sound.is_empty() {
                    Err("sound name cannot be empty".into())
                } else if sound.volume < 0.0 || sound.pitch < 0.0 {
                    Err("volume and pitch must be non-negative".into())
                } else {
                    Ok(PropertyValue::Sound(sound))
                }
            }
            (ValueKind::TagSet, PropertyValue::Tags(tags)) => {
                if tags.iter().any(|t| t.is_empty()) {
                    Err("tags cannot be empty".into())
                } else {
                    Ok(PropertyValue::Tags(tags))
                }
            }
            (kind, value) => Err(format!("expected a {}, got {value}", kind.name())),
        }
    }
}

fn parse_optional_f64(text: Option<&str>, what: &str) -> Result<f64, String> {
    match text {
        None => Ok(1.0),
        Some(t) => t
            .parse()
            .map_err(|_| format!("expected a number for {what}, got '{t}'")),
    }
}
