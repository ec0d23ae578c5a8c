// cloud-tts configuration management

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tts_client::Engine;

pub const DEFAULT_ENGINE: &str = "google";
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_GENDER: &str = "m";
pub const UNSPECIFIED_VOICE: &str = "unspecified";
pub const DEFAULT_FORMAT: &str = "mp3";
pub const DEFAULT_SAMPLE_RATE: u32 = 24000;
pub const DEFAULT_SPEED: f64 = 1.0;
pub const DEFAULT_PITCH: f64 = 1.0;
pub const DEFAULT_VOLUME_GAIN_DB: f64 = 0.0;

/// Persisted defaults, used for any flag not given on the command line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudTtsConfig {
    /// TTS engine: "google" or "azure"
    #[serde(default = "default_engine")]
    pub engine: String,

    #[serde(default = "default_language")]
    pub language: String,

    /// Gender code: m, f or n
    #[serde(default = "default_gender")]
    pub gender: String,

    /// Voice name, or "unspecified" to pick by language and gender
    #[serde(default = "default_voice")]
    pub voice: String,

    #[serde(default = "default_format")]
    pub format: String,

    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    #[serde(default = "default_speed")]
    pub speed: f64,

    #[serde(default = "default_pitch")]
    pub pitch: f64,

    #[serde(default = "default_volume_gain_db")]
    pub volume_gain_db: f64,
}

fn default_engine() -> String {
    DEFAULT_ENGINE.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_gender() -> String {
    DEFAULT_GENDER.to_string()
}

fn default_voice() -> String {
    UNSPECIFIED_VOICE.to_string()
}

fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

fn default_speed() -> f64 {
    DEFAULT_SPEED
}

fn default_pitch() -> f64 {
    DEFAULT_PITCH
}

fn default_volume_gain_db() -> f64 {
    DEFAULT_VOLUME_GAIN_DB
}

impl Default for CloudTtsConfig {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            language: default_language(),
            gender: default_gender(),
            voice: default_voice(),
            format: default_format(),
            sample_rate: default_sample_rate(),
            speed: default_speed(),
            pitch: default_pitch(),
            volume_gain_db: default_volume_gain_db(),
        }
    }
}

impl CloudTtsConfig {
    /// Get the config file path: ~/.config/cli-programs/cloud-tts.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory (HOME or USERPROFILE)")?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("cli-programs")
            .join("cloud-tts.toml"))
    }

    /// Load config from file, returning default if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Like `load`, but a missing home directory means built-in defaults.
    /// A config file that exists and fails to parse is still an error.
    pub fn load_or_default() -> Result<Self> {
        match Self::config_path() {
            Ok(path) => Self::load_from(&path),
            Err(e) => {
                log::debug!("{:#}; using built-in defaults", e);
                Ok(Self::default())
            }
        }
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: CloudTtsConfig =
            toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Engine named in the config file; unknown names select azure
    pub fn engine(&self) -> Engine {
        Engine::from_code(&self.engine)
    }

    /// Set one key from its string form
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "engine" => {
                value
                    .parse::<Engine>()
                    .map_err(|e| anyhow::anyhow!(e))?;
                self.engine = value.to_string();
            }
            "language" => self.language = value.to_string(),
            "gender" => self.gender = value.to_string(),
            "voice" => self.voice = value.to_string(),
            "format" => self.format = value.to_string(),
            "sample_rate" => {
                self.sample_rate = value
                    .parse()
                    .with_context(|| format!("Invalid sample rate: {}", value))?;
            }
            "speed" => {
                self.speed = value
                    .parse()
                    .with_context(|| format!("Invalid speed: {}", value))?;
            }
            "pitch" => {
                self.pitch = value
                    .parse()
                    .with_context(|| format!("Invalid pitch: {}", value))?;
            }
            "volume_gain_db" => {
                self.volume_gain_db = value
                    .parse()
                    .with_context(|| format!("Invalid volume gain: {}", value))?;
            }
            _ => bail!(
                "Unknown config key: {}. Valid keys: engine, language, gender, voice, format, sample_rate, speed, pitch, volume_gain_db",
                key
            ),
        }
        Ok(())
    }
}
