//! YAML mask recipes.
//!
//! A recipe names the input band, the output mask, the sensor (or a custom
//! bit table) and the conditions to AND together:
//!
//! ```yaml
//! input: LC08_L1TP_QA.tif
//! output: clear_water.tif
//! sensor: landsat8
//! conditions:
//!   - type: cloud
//!     confidence: 1
//!   - type: water
//!     confidence: 3
//! masker:
//!   multi_strategy: aggregate
//! ```

use anyhow::{bail, Context, Result};
use qa_masker::{Condition, MaskerConfig, ProfileDefinition, Sensor, SensorProfile};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskRecipe {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(default)]
    pub sensor: Option<Sensor>,
    /// Custom bit table; takes precedence over `sensor`.
    #[serde(default)]
    pub profile: Option<ProfileDefinition>,
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub masker: Option<MaskerConfig>,
}

impl MaskRecipe {
    /// Load a recipe. Relative `input`/`output` paths resolve against the
    /// recipe's directory.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read recipe {}", path.display()))?;
        let mut recipe: MaskRecipe = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse recipe {}", path.display()))?;

        if let Some(base) = path.parent() {
            if recipe.input.is_relative() {
                recipe.input = base.join(&recipe.input);
            }
            if recipe.output.is_relative() {
                recipe.output = base.join(&recipe.output);
            }
        }
        Ok(recipe)
    }

    /// The profile conditions are looked up in.
    pub fn profile(&self) -> Result<SensorProfile> {
        match (&self.profile, self.sensor) {
            (Some(def), _) => def
                .clone()
                .into_profile()
                .with_context(|| format!("invalid profile '{}'", def.name)),
            (None, Some(sensor)) => Ok(sensor.profile()),
            (None, None) => bail!("recipe must name a sensor or define a profile"),
        }
    }

    /// Recipe masker settings, or the environment defaults.
    pub fn masker_config(&self) -> Result<MaskerConfig> {
        let config = self.masker.unwrap_or_else(MaskerConfig::from_env);
        config.validate()?;
        Ok(config)
    }
}
