use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::print::PageGeometry;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub print: PrintConfig,
}

/// General configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: error, warn, info, debug, trace
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// How long the tray marker stays lit after a clipboard change
    #[serde(default = "default_pulse_duration_ms")]
    pub pulse_duration_ms: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            log_level: default_log_level(),
            pulse_duration_ms: default_pulse_duration_ms(),
        }
    }
}

/// Screenshot tool settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Argv of the capture tool; the output path is appended as the
    /// last argument
    #[serde(default = "default_capture_command")]
    pub command: Vec<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        CaptureConfig {
            command: default_capture_command(),
        }
    }
}

/// Printing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintConfig {
    /// Page canvas width in pixels
    #[serde(default = "default_page_width")]
    pub page_width_px: u32,

    /// Page canvas height in pixels
    #[serde(default = "default_page_height")]
    pub page_height_px: u32,

    /// Command that lists print destinations, one per line
    #[serde(default = "default_list_command")]
    pub list_command: Vec<String>,

    /// Command that spools a PNG page from stdin; "{target}" is replaced
    /// by the chosen destination
    #[serde(default = "default_spool_command")]
    pub spool_command: Vec<String>,
}

impl Default for PrintConfig {
    fn default() -> Self {
        PrintConfig {
            page_width_px: default_page_width(),
            page_height_px: default_page_height(),
            list_command: default_list_command(),
            spool_command: default_spool_command(),
        }
    }
}

impl PrintConfig {
    pub fn page_geometry(&self) -> PageGeometry {
        PageGeometry {
            width: self.page_width_px,
            height: self.page_height_px,
        }
    }
}

// Default value functions for serde
fn default_log_level() -> String {
    "info".to_string()
}

fn default_pulse_duration_ms() -> u64 {
    600
}

fn default_capture_command() -> Vec<String> {
    vec![
        "grimshot".to_string(),
        "save".to_string(),
        "area".to_string(),
    ]
}

fn default_page_width() -> u32 {
    2480 // A4 at 300 dpi
}

fn default_page_height() -> u32 {
    3508
}

fn default_list_command() -> Vec<String> {
    vec!["lpstat".to_string(), "-e".to_string()]
}

fn default_spool_command() -> Vec<String> {
    vec!["lpr".to_string(), "-P".to_string(), "{target}".to_string()]
}

/// Trait for configuration storage
pub trait ConfigStorage: Send + Sync {
    /// Load configuration from file
    fn load(&self) -> Result<Config>;

    /// Save configuration to file
    fn save(&self, config: &Config) -> Result<()>;

    /// Get the config file path
    fn path(&self) -> &PathBuf;

    /// Create default configuration file if it doesn't exist
    fn create_default(&self) -> Result<()>;
}

/// TOML-based implementation of ConfigStorage
pub struct TomlConfigStorage {
    path: PathBuf,
}

impl TomlConfigStorage {
    /// Create a new TomlConfigStorage with the given path
    pub fn new(path: PathBuf) -> Self {
        TomlConfigStorage { path }
    }
}

impl ConfigStorage for TomlConfigStorage {
    fn load(&self) -> Result<Config> {
        // If file doesn't exist, create default and return it
        if !self.path.exists() {
            log::info!(
                "Config file not found at {:?}, creating default configuration",
                self.path
            );
            self.create_default()?;
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config from {:?}", self.path))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {:?}", self.path))?;

        log::info!("Loaded configuration from {:?}", self.path);
        log::debug!(
            "Config: capture command {:?}, page {}x{}",
            config.capture.command,
            config.print.page_width_px,
            config.print.page_height_px
        );

        Ok(config)
    }

    fn save(&self, config: &Config) -> Result<()> {
        let toml_str = toml::to_string_pretty(config)
            .with_context(|| "Failed to serialize configuration")?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        fs::write(&self.path, toml_str)
            .with_context(|| format!("Failed to write config to {:?}", self.path))?;

        log::debug!("Saved configuration to {:?}", self.path);

        Ok(())
    }

    fn path(&self) -> &PathBuf {
        &self.path
    }

    fn create_default(&self) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        // Use the example config compiled into the binary
        let example_config = include_str!("../clipsight.toml.example");

        fs::write(&self.path, example_config)
            .with_context(|| format!("Failed to create default config at {:?}", self.path))?;

        log::info!("Created default configuration at {:?}", self.path);

        Ok(())
    }
}

/// Ensure XDG data and config directories exist
/// Returns (data_dir, config_dir)
///
/// XDG Base Directory Specification:
/// - Data: $XDG_DATA_HOME/clipsight (default: ~/.local/share/clipsight)
/// - Config: $XDG_CONFIG_HOME/clipsight (default: ~/.config/clipsight)
pub fn ensure_directories() -> Result<(PathBuf, PathBuf)> {
    let home = env::var("HOME").context("HOME environment variable not set")?;
    let home_path = PathBuf::from(home);

    let data_dir = if let Ok(xdg_data) = env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg_data).join("clipsight")
    } else {
        home_path.join(".local/share/clipsight")
    };

    let config_dir = if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join("clipsight")
    } else {
        home_path.join(".config/clipsight")
    };

    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;
    fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create config directory {:?}", config_dir))?;

    log::debug!("Data directory: {:?}", data_dir);
    log::debug!("Config directory: {:?}", config_dir);

    Ok((data_dir, config_dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.pulse_duration_ms, 600);
        assert_eq!(config.capture.command, vec!["grimshot", "save", "area"]);
        assert_eq!(config.print.page_width_px, 2480);
        assert_eq!(config.print.page_height_px, 3508);
        assert_eq!(config.print.list_command, vec!["lpstat", "-e"]);
        assert_eq!(config.print.spool_command, vec!["lpr", "-P", "{target}"]);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let toml_str = r#"
        [general]
        log_level = "debug"

        [capture]
        command = ["flameshot", "gui", "-p"]
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.general.pulse_duration_ms, 600);
        assert_eq!(config.capture.command, vec!["flameshot", "gui", "-p"]);
        assert_eq!(config.print.page_geometry(), PageGeometry::default());
    }

    #[test]
    fn test_example_config_parses() {
        let example = include_str!("../clipsight.toml.example");
        let config: Config = toml::from_str(example).unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.capture.command, vec!["grimshot", "save", "area"]);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clipsight.toml");
        let storage = TomlConfigStorage::new(path.clone());

        let config = storage.load().unwrap();
        assert!(path.exists());
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = TomlConfigStorage::new(dir.path().join("clipsight.toml"));

        let mut config = Config::default();
        config.general.pulse_duration_ms = 250;
        config.print.page_width_px = 1240;
        storage.save(&config).unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded.general.pulse_duration_ms, 250);
        assert_eq!(loaded.print.page_width_px, 1240);
    }
}
