use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
pub struct AdminConfig {
    #[serde(default)]
    pub catalog: CatalogSection,
    #[serde(default)]
    pub logging: LoggingSection,
    #[serde(default)]
    pub random: RandomSection,
}

#[derive(Debug, Deserialize)]
pub struct CatalogSection {
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
    /// Write the catalog back when the console stops.
    #[serde(default = "default_save_on_stop")]
    pub save_on_stop: bool,
}

fn default_catalog_path() -> PathBuf {
    "catalog.json".into()
}

fn default_save_on_stop() -> bool {
    true
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            save_on_stop: default_save_on_stop(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RandomSection {
    /// Fixed seed for reproducible rolls. Entropy when absent.
    pub seed: Option<u64>,
}

impl AdminConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load `path`, or fall back to defaults when it does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
