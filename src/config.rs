//! TOML configuration with defaults for every field.

use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::error::{FlightMapError, Result};
use crate::plot::MapSettings;
use crate::resolver::ResolverKind;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sheet: SheetConfig,
    pub airports: AirportsConfig,
    pub resolver: ResolverConfig,
    pub map: MapConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    pub spreadsheet_id: Option<String>,
    pub sheet_name: String,
    pub credentials: PathBuf,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            sheet_name: "Sheet1".to_string(),
            credentials: PathBuf::from("keys.json"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AirportsConfig {
    pub path: PathBuf,
}

impl Default for AirportsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("airports.csv"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub kind: ResolverKind,
    /// Remember resolved distances between runs
    pub cache: bool,
    pub cache_path: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            kind: ResolverKind::default(),
            cache: true,
            cache_path: None,
            timeout_secs: 30,
        }
    }
}

impl ResolverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub title: String,
    pub output_dir: PathBuf,
    pub rotation_lon: f64,
    pub rotation_lat: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        let settings = MapSettings::default();
        Self {
            title: settings.title,
            output_dir: PathBuf::from("."),
            rotation_lon: settings.rotation_lon,
            rotation_lat: settings.rotation_lat,
        }
    }
}

impl MapConfig {
    pub fn settings(&self) -> MapSettings {
        MapSettings {
            title: self.title.clone(),
            rotation_lon: self.rotation_lon,
            rotation_lat: self.rotation_lat,
        }
    }
}

/// Platform config location, e.g. `~/.config/flight-mileage-map/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "flight-mileage-map").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

impl Config {
    /// Load an explicit file, or the platform default if it exists, or defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_path(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            FlightMapError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        let config = Self::from_toml(&text)?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.sheet.sheet_name, "Sheet1");
        assert_eq!(config.resolver.kind, ResolverKind::Webflyer);
        assert!(config.resolver.cache);
        assert_eq!(config.map.rotation_lon, -45.0);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_toml(
            r#"
[sheet]
spreadsheet_id = "abc123"

[resolver]
kind = "great-circle"
cache = false

[map]
title = "My 2017-2021 flights"
"#,
        )
        .unwrap();

        assert_eq!(config.sheet.spreadsheet_id.as_deref(), Some("abc123"));
        assert_eq!(config.sheet.credentials, PathBuf::from("keys.json"));
        assert_eq!(config.resolver.kind, ResolverKind::GreatCircle);
        assert!(!config.resolver.cache);
        assert_eq!(config.map.settings().title, "My 2017-2021 flights");
    }

    #[test]
    fn test_unknown_resolver_is_rejected() {
        assert!(matches!(
            Config::from_toml("[resolver]\nkind = \"guess\"\n"),
            Err(FlightMapError::Toml(_))
        ));
    }

    #[test]
    fn test_missing_explicit_file() {
        assert!(matches!(
            Config::load(Some(Path::new("/nonexistent/config.toml"))),
            Err(FlightMapError::Config(_))
        ));
    }
}
