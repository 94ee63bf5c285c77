use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::frame::DEFAULT_PLACEHOLDER;

/// Top-level configuration for exif-frame.
///
/// Controls footer text defaults, where logo and font assets live, and where
/// framed images are written.
///
/// # Loading
///
/// ```rust,no_run
/// use exif_frame::config::Config;
///
/// // From a JSON file
/// let config = Config::load(Some("config.json".as_ref())).unwrap();
///
/// // Or use defaults and customize
/// let mut config = Config::default();
/// config.assets.logo_dir = "./logos".into();
/// config.frame.jpeg_quality = 0.9;
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Footer rendering options.
    pub frame: FrameConfig,
    /// Logo and font locations.
    pub assets: AssetConfig,
    /// Output naming.
    pub output: OutputConfig,
}

/// What happens when a manufacturer logo resolves but cannot be loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoFailure {
    /// Fail the whole composition.
    #[default]
    Abort,
    /// Log a warning and frame the photo without a logo.
    Omit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Printed in place of missing exposure values.
    pub placeholder: String,
    /// JPEG quality of the composite, `0.0..=1.0`.
    pub jpeg_quality: f32,
    pub logo_failure: LogoFailure,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory holding `canon.png`, `nikon.png`, ...
    pub logo_dir: PathBuf,
    /// Font file for footer text. A system sans-serif face is used when unset.
    pub font_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Appended to the input file stem: `IMG_0001.jpg` -> `IMG_0001_frame.jpg`.
    pub suffix: String,
    /// Output directory. Defaults to the input file's directory.
    pub dir: Option<PathBuf>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            jpeg_quality: 0.5,
            logo_failure: LogoFailure::Abort,
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            logo_dir: PathBuf::from("logo"),
            font_path: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: "_frame".to_string(),
            dir: None,
        }
    }
}

impl Config {
    /// Resolve the config file path: `config.json` next to the executable.
    pub fn config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe().context("Failed to get executable path")?;
        let exe_dir = exe_path
            .parent()
            .context("Failed to get executable directory")?;
        Ok(exe_dir.join("config.json"))
    }

    /// Load config from the given path, or from the default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            log::warn!(
                "Config file not found at {}. Using defaults.",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;
        let config: Config =
            serde_json::from_str(&contents).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save config to the given path, or to the default location.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, contents).context("Failed to write config file")?;
        log::info!("Config saved to {}", config_path.display());
        Ok(())
    }
}
