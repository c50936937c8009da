//! Sensor profiles: fixed condition-name to bit-field tables.
//!
//! A profile is pure data. The masker looks conditions up by name instead of
//! branching on them, so adding a sensor means adding a table.

use crate::confidence::{LandsatConfidence, ModisQuality};
use qa_common::{BitField, QaMaskError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::debug;

/// Landsat 8 QA band layout.
pub mod landsat8 {
    use qa_common::BitField;

    pub const FILL: BitField = BitField::fixed(0, 1);
    pub const WATER: BitField = BitField::fixed(4, 2);
    pub const VEGETATION: BitField = BitField::fixed(8, 2);
    pub const SNOW: BitField = BitField::fixed(10, 2);
    pub const CIRRUS: BitField = BitField::fixed(12, 2);
    pub const CLOUD: BitField = BitField::fixed(14, 2);

    pub const FIELDS: [(&str, BitField); 6] = [
        ("fill", FILL),
        ("water", WATER),
        ("vegetation", VEGETATION),
        ("snow", SNOW),
        ("cirrus", CIRRUS),
        ("cloud", CLOUD),
    ];
}

/// MODIS land-product QA layout.
pub mod modis {
    use qa_common::BitField;

    pub const QUALITY: BitField = BitField::fixed(0, 2);

    pub const FIELDS: [(&str, BitField); 1] = [("quality", QUALITY)];
}

/// How symbolic condition values (e.g. "high") are resolved for a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueDomain {
    /// Only numeric values are accepted.
    #[default]
    Numeric,
    /// `undefined`, `low`, `medium`, `high`.
    LandsatConfidence,
    /// `high`, `medium`, `low`, `low_cloud`.
    ModisQuality,
}

impl ValueDomain {
    /// Resolve a numeric or symbolic value.
    ///
    /// Numbers are returned as-is, including ones too large for the field.
    pub fn resolve(&self, condition: &str, value: &str) -> Result<u32> {
        if let Ok(n) = value.trim().parse::<u32>() {
            return Ok(n);
        }
        match self {
            Self::Numeric => Err(QaMaskError::invalid_value(condition, value)),
            Self::LandsatConfidence => LandsatConfidence::from_str(value)
                .map(u32::from)
                .map_err(|_| QaMaskError::invalid_value(condition, value)),
            Self::ModisQuality => ModisQuality::from_str(value)
                .map(u32::from)
                .map_err(|_| QaMaskError::invalid_value(condition, value)),
        }
    }
}

/// Immutable mapping from condition names to bit fields for one sensor.
///
/// Fields of a profile never overlap; this is checked when the profile is
/// built and is what makes aggregated composite masks exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorProfile {
    name: String,
    fields: BTreeMap<String, BitField>,
    aliases: BTreeMap<String, String>,
    values: ValueDomain,
}

impl SensorProfile {
    /// Start building a custom profile.
    pub fn builder(name: impl Into<String>) -> SensorProfileBuilder {
        SensorProfileBuilder {
            name: name.into(),
            fields: Vec::new(),
            aliases: Vec::new(),
            values: ValueDomain::Numeric,
        }
    }

    /// Landsat 8 QA band profile.
    pub fn landsat8() -> Self {
        Self {
            name: "landsat8".to_string(),
            fields: landsat8::FIELDS
                .iter()
                .map(|(name, field)| (name.to_string(), *field))
                .collect(),
            aliases: BTreeMap::from([("veg".to_string(), "vegetation".to_string())]),
            values: ValueDomain::LandsatConfidence,
        }
    }

    /// MODIS land-product QA profile.
    pub fn modis() -> Self {
        Self {
            name: "modis".to_string(),
            fields: modis::FIELDS
                .iter()
                .map(|(name, field)| (name.to_string(), *field))
                .collect(),
            aliases: BTreeMap::new(),
            values: ValueDomain::ModisQuality,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value domain used to resolve symbolic values.
    pub fn values(&self) -> ValueDomain {
        self.values
    }

    /// Look up a condition (or alias) without failing.
    pub fn get(&self, condition: &str) -> Option<BitField> {
        let key = self
            .aliases
            .get(condition)
            .map(String::as_str)
            .unwrap_or(condition);
        self.fields.get(key).copied()
    }

    /// Look up a condition, failing with `UnknownCondition`.
    pub fn field(&self, condition: &str) -> Result<BitField> {
        self.get(condition)
            .ok_or_else(|| QaMaskError::unknown_condition(condition, &self.name))
    }

    pub fn contains(&self, condition: &str) -> bool {
        self.get(condition).is_some()
    }

    /// Canonical conditions in name order (aliases excluded).
    pub fn conditions(&self) -> impl Iterator<Item = (&str, BitField)> + '_ {
        self.fields.iter().map(|(name, field)| (name.as_str(), *field))
    }

    /// Resolve a numeric or symbolic value for `condition`.
    pub fn resolve_value(&self, condition: &str, value: &str) -> Result<u32> {
        self.field(condition)?;
        self.values.resolve(condition, value)
    }

    /// Serializable form of this profile.
    pub fn to_definition(&self) -> ProfileDefinition {
        ProfileDefinition {
            name: self.name.clone(),
            fields: self.fields.clone(),
            aliases: self.aliases.clone(),
            values: self.values,
        }
    }
}

impl From<SensorProfile> for Cow<'_, SensorProfile> {
    fn from(profile: SensorProfile) -> Self {
        Cow::Owned(profile)
    }
}

impl<'a> From<&'a SensorProfile> for Cow<'a, SensorProfile> {
    fn from(profile: &'a SensorProfile) -> Self {
        Cow::Borrowed(profile)
    }
}

/// Builder that validates a profile before it can be used.
#[derive(Debug, Clone)]
pub struct SensorProfileBuilder {
    name: String,
    fields: Vec<(String, BitField)>,
    aliases: Vec<(String, String)>,
    values: ValueDomain,
}

impl SensorProfileBuilder {
    /// Declare a condition.
    pub fn field(mut self, condition: impl Into<String>, field: BitField) -> Self {
        self.fields.push((condition.into(), field));
        self
    }

    /// Declare several conditions.
    pub fn fields<'a>(mut self, fields: impl IntoIterator<Item = (&'a str, BitField)>) -> Self {
        self.fields
            .extend(fields.into_iter().map(|(name, field)| (name.to_string(), field)));
        self
    }

    /// Declare an alternative name for an existing condition.
    pub fn alias(mut self, alias: impl Into<String>, condition: impl Into<String>) -> Self {
        self.aliases.push((alias.into(), condition.into()));
        self
    }

    pub fn values(mut self, values: ValueDomain) -> Self {
        self.values = values;
        self
    }

    /// Validate and build.
    ///
    /// Fails on duplicate names, overlapping bit ranges, and aliases that
    /// shadow a condition or point at a missing one.
    pub fn build(self) -> Result<SensorProfile> {
        let mut fields: BTreeMap<String, BitField> = BTreeMap::new();

        for (name, field) in &self.fields {
            if fields.contains_key(name) {
                return Err(QaMaskError::DuplicateCondition(name.clone()));
            }
            if let Some((other, _)) = fields.iter().find(|(_, f)| f.overlaps(field)) {
                return Err(QaMaskError::overlapping(other.as_str(), name.as_str()));
            }
            fields.insert(name.clone(), *field);
        }

        let mut aliases = BTreeMap::new();
        for (alias, target) in self.aliases {
            if fields.contains_key(&alias) || aliases.contains_key(&alias) {
                return Err(QaMaskError::DuplicateCondition(alias));
            }
            if !fields.contains_key(&target) {
                return Err(QaMaskError::unknown_condition(target, &self.name));
            }
            aliases.insert(alias, target);
        }

        debug!(profile = %self.name, fields = fields.len(), "Built sensor profile");

        Ok(SensorProfile {
            name: self.name,
            fields,
            aliases,
            values: self.values,
        })
    }
}

/// Serializable profile description, e.g. from a YAML mask recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDefinition {
    pub name: String,
    pub fields: BTreeMap<String, BitField>,
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
    #[serde(default)]
    pub values: ValueDomain,
}

impl ProfileDefinition {
    /// Validate into a usable profile.
    pub fn into_profile(self) -> Result<SensorProfile> {
        let mut builder = SensorProfile::builder(self.name).values(self.values);
        for (name, field) in self.fields {
            builder = builder.field(name, field);
        }
        for (alias, target) in self.aliases {
            builder = builder.alias(alias, target);
        }
        builder.build()
    }
}

/// Built-in sensor families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensor {
    Landsat8,
    Modis,
}

impl Sensor {
    pub fn profile(&self) -> SensorProfile {
        match self {
            Self::Landsat8 => SensorProfile::landsat8(),
            Self::Modis => SensorProfile::modis(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Landsat8 => "landsat8",
            Self::Modis => "modis",
        }
    }
}

impl FromStr for Sensor {
    type Err = QaMaskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "landsat8" | "landsat" | "l8" => Ok(Self::Landsat8),
            "modis" => Ok(Self::Modis),
            _ => Err(QaMaskError::UnknownSensor(s.to_string())),
        }
    }
}

impl std::fmt::Display for Sensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
