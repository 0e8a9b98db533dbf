// src/config/mod.rs
//! Configuration module for meter settings, themes and the on-disk config file.
//!
//! [`MeterConfig`] is the live, copyable configuration shared with the audio
//! path. Every way of changing it (setters, file load, CLI overrides) goes
//! through the same clamps, so the smoother never sees an out-of-range value.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SENSITIVITY_RANGE: (f64, f64) = (0.1, 10.0);
pub const SENSITIVITY_STEP: f64 = 0.1;
pub const NOISE_REDUCTION_RANGE: (f64, f64) = (0.05, 0.95);
pub const NOISE_REDUCTION_STEP: f64 = 0.05;
pub const FRAME_RATE_RANGE: (u32, u32) = (1, 240);
pub const BAR_WIDTH_RANGE: (u16, u16) = (1, 16);

/// Errors from reading or writing the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Bar palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    /// Green / yellow / red zones by level.
    #[default]
    Classic,
    Mono,
    Cyan,
    Magenta,
    Blue,
}

impl ColorTheme {
    const ORDER: [ColorTheme; 5] = [
        ColorTheme::Classic,
        ColorTheme::Mono,
        ColorTheme::Cyan,
        ColorTheme::Magenta,
        ColorTheme::Blue,
    ];

    /// Next theme, wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|&t| t == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    /// True when rows are colored by level zone instead of one fixed color.
    pub fn is_zoned(self) -> bool {
        self == ColorTheme::Classic
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorTheme::Classic => "classic",
            ColorTheme::Mono => "mono",
            ColorTheme::Cyan => "cyan",
            ColorTheme::Magenta => "magenta",
            ColorTheme::Blue => "blue",
        }
    }
}

impl std::str::FromStr for ColorTheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ORDER
            .into_iter()
            .find(|theme| theme.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ORDER.iter().map(|t| t.name()).collect();
                format!("unknown theme '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

/// Live meter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterConfig {
    /// EMA weight of the previous output, also divides the gravity constant.
    /// Higher means a more sluggish meter.
    pub noise_reduction: f64,
    /// Linear gain applied to peaks before the dB conversion.
    pub sensitivity: f64,
    /// Render rate in frames per second.
    pub frame_rate: u32,
    pub color_theme: ColorTheme,
    /// Columns per channel bar.
    pub bar_width: u16,
    /// Rows below this level are green.
    pub green_threshold_db: f64,
    /// Rows below this level (and above green) are yellow, the rest red.
    pub yellow_threshold_db: f64,
    #[serde(skip)]
    pub show_debug: bool,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            noise_reduction: 0.77,
            sensitivity: 1.0,
            frame_rate: 60,
            color_theme: ColorTheme::Classic,
            bar_width: 4,
            green_threshold_db: -20.0,
            yellow_threshold_db: -6.0,
            show_debug: false,
        }
    }
}

impl MeterConfig {
    /// Bring every field into its documented range.
    pub fn clamped(mut self) -> Self {
        self.set_noise_reduction(self.noise_reduction);
        self.set_sensitivity(self.sensitivity);
        self.set_frame_rate(self.frame_rate);
        self.set_bar_width(self.bar_width);
        self.set_thresholds(self.green_threshold_db, self.yellow_threshold_db);
        self
    }

    pub fn set_sensitivity(&mut self, value: f64) {
        self.sensitivity = clamp_or(value, SENSITIVITY_RANGE, 1.0);
    }

    pub fn set_noise_reduction(&mut self, value: f64) {
        self.noise_reduction = clamp_or(value, NOISE_REDUCTION_RANGE, 0.77);
    }

    pub fn set_frame_rate(&mut self, value: u32) {
        self.frame_rate = value.clamp(FRAME_RATE_RANGE.0, FRAME_RATE_RANGE.1);
    }

    pub fn set_bar_width(&mut self, value: u16) {
        self.bar_width = value.clamp(BAR_WIDTH_RANGE.0, BAR_WIDTH_RANGE.1);
    }

    /// Set both zone thresholds; yellow never starts below green.
    pub fn set_thresholds(&mut self, green_db: f64, yellow_db: f64) {
        let green = clamp_or(green_db, (-60.0, 0.0), -20.0);
        let yellow = clamp_or(yellow_db, (-60.0, 0.0), -6.0);
        self.green_threshold_db = green;
        self.yellow_threshold_db = yellow.max(green);
    }

    pub fn adjust_sensitivity(&mut self, steps: i32) {
        self.set_sensitivity(self.sensitivity + SENSITIVITY_STEP * steps as f64);
    }

    pub fn adjust_noise_reduction(&mut self, steps: i32) {
        self.set_noise_reduction(self.noise_reduction + NOISE_REDUCTION_STEP * steps as f64);
    }

    pub fn cycle_theme(&mut self) {
        self.color_theme = self.color_theme.next();
    }

    pub fn toggle_debug(&mut self) {
        self.show_debug = !self.show_debug;
    }
}

fn clamp_or(value: f64, (lo, hi): (f64, f64), fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(lo, hi)
    } else {
        fallback
    }
}

/// Capture-side settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Substring of the input device name to capture from.
    pub device: Option<String>,
    /// Frames per block delivered to the meter during file playback.
    pub playback_block_frames: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: None,
            playback_block_frames: 1024,
        }
    }
}

/// Contents of `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub meter: MeterConfig,
    #[serde(default)]
    pub audio: AudioConfig,
}

impl Config {
    /// Load from the default location, writing defaults there on first run.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.meter = config.meter.clamped();
        config.audio.playback_block_frames = config.audio.playback_block_frames.clamp(64, 16384);
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(io_err)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("vumz")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.meter.frame_rate, 60);
        assert_eq!(config.meter.color_theme, ColorTheme::Classic);
        assert_eq!(config.meter.sensitivity, 1.0);
        assert_eq!(config.audio.playback_block_frames, 1024);
        assert!(Config::config_path().ends_with("vumz/config.toml"));
    }

    #[test]
    fn setters_clamp() {
        let mut cfg = MeterConfig::default();
        cfg.set_noise_reduction(0.0);
        assert_eq!(cfg.noise_reduction, 0.05);
        cfg.set_noise_reduction(1.5);
        assert_eq!(cfg.noise_reduction, 0.95);
        cfg.set_sensitivity(-3.0);
        assert_eq!(cfg.sensitivity, 0.1);
        cfg.set_sensitivity(f64::NAN);
        assert_eq!(cfg.sensitivity, 1.0);
        cfg.set_frame_rate(0);
        assert_eq!(cfg.frame_rate, 1);
        cfg.set_bar_width(100);
        assert_eq!(cfg.bar_width, 16);
        cfg.set_thresholds(-10.0, -30.0);
        assert_eq!(cfg.green_threshold_db, -10.0);
        assert_eq!(cfg.yellow_threshold_db, -10.0);
    }

    #[test]
    fn stepping_stops_at_the_edges() {
        let mut cfg = MeterConfig::default();
        for _ in 0..200 {
            cfg.adjust_sensitivity(1);
            cfg.adjust_noise_reduction(1);
        }
        assert_eq!(cfg.sensitivity, SENSITIVITY_RANGE.1);
        assert_eq!(cfg.noise_reduction, NOISE_REDUCTION_RANGE.1);
    }

    #[test]
    fn theme_cycle_wraps() {
        let mut theme = ColorTheme::Classic;
        for _ in 0..5 {
            theme = theme.next();
        }
        assert_eq!(theme, ColorTheme::Classic);
        assert!(ColorTheme::Classic.is_zoned());
        assert!(!ColorTheme::Cyan.is_zoned());
    }

    #[test]
    fn theme_from_str() {
        assert_eq!("Cyan".parse::<ColorTheme>(), Ok(ColorTheme::Cyan));
        assert_eq!(" mono ".parse::<ColorTheme>(), Ok(ColorTheme::Mono));
        assert!("plaid".parse::<ColorTheme>().unwrap_err().contains("classic"));
    }

    #[test]
    fn missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn loaded_values_are_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[meter]\nnoise_reduction = 4.0\ncolor_theme = \"magenta\"\n\n[audio]\ndevice = \"monitor\"\n",
        )
        .unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.meter.noise_reduction, 0.95);
        assert_eq!(config.meter.color_theme, ColorTheme::Magenta);
        assert_eq!(config.meter.frame_rate, 60);
        assert_eq!(config.audio.device.as_deref(), Some("monitor"));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[meter\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
