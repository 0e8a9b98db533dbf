// src/cli.rs
//! Command-line arguments. Anything given here overrides `config.toml`.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{ColorTheme, Config};

#[derive(Debug, Parser)]
#[command(name = "vumz")]
#[command(about = "Terminal VU meter for live audio input or a played file")]
#[command(version)]
pub struct Cli {
    /// Input device to capture from (substring of the device name)
    #[arg(short, long)]
    pub device: Option<String>,

    /// Play an audio file and meter it instead of capturing input
    #[arg(short, long, value_name = "FILE", conflicts_with = "device")]
    pub play: Option<PathBuf>,

    /// Linear gain applied before the dB conversion
    #[arg(short, long)]
    pub sensitivity: Option<f64>,

    /// Smoothing weight, higher is slower
    #[arg(short, long)]
    pub noise_reduction: Option<f64>,

    /// Render rate in frames per second
    #[arg(short, long)]
    pub fps: Option<u32>,

    /// Bar colors: classic, mono, cyan, magenta or blue
    #[arg(short, long, value_parser = clap::value_parser!(ColorTheme))]
    pub theme: Option<ColorTheme>,

    /// Columns per channel bar
    #[arg(short, long)]
    pub bar_width: Option<u16>,

    /// Config file to use instead of the default location
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log file to use instead of the default location
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Print the available input devices and exit
    #[arg(long)]
    pub list_devices: bool,
}

impl Cli {
    /// Apply the given overrides. Values are clamped like any other edit.
    pub fn apply(&self, config: &mut Config) {
        let meter = &mut config.meter;
        if let Some(v) = self.sensitivity {
            meter.set_sensitivity(v);
        }
        if let Some(v) = self.noise_reduction {
            meter.set_noise_reduction(v);
        }
        if let Some(v) = self.fps {
            meter.set_frame_rate(v);
        }
        if let Some(v) = self.theme {
            meter.color_theme = v;
        }
        if let Some(v) = self.bar_width {
            meter.set_bar_width(v);
        }
        if let Some(device) = &self.device {
            config.audio.device = Some(device.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_are_applied_and_clamped() {
        let cli = Cli::try_parse_from([
            "vumz", "--sensitivity", "50", "--fps", "30", "--theme", "cyan", "-d", "monitor",
        ])
        .unwrap();

        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config.meter.sensitivity, 10.0);
        assert_eq!(config.meter.frame_rate, 30);
        assert_eq!(config.meter.color_theme, ColorTheme::Cyan);
        assert_eq!(config.audio.device.as_deref(), Some("monitor"));
        assert!((config.meter.noise_reduction - 0.77).abs() < 1e-9);
    }

    #[test]
    fn unknown_theme_is_rejected() {
        assert!(Cli::try_parse_from(["vumz", "--theme", "plaid"]).is_err());
    }

    #[test]
    fn play_conflicts_with_device() {
        assert!(Cli::try_parse_from(["vumz", "--play", "a.wav", "--device", "x"]).is_err());
        let cli = Cli::try_parse_from(["vumz", "-p", "a.wav"]).unwrap();
        assert_eq!(cli.play, Some(PathBuf::from("a.wav")));
    }
}
