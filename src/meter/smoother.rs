// src/meter/smoother.rs
//! Per-channel level smoothing: a gravity curve followed by an EMA stage.
//!
//! A rising reading is taken immediately and becomes the new peak. While the
//! reading stays below the previous candidate, the level falls from that peak
//! along `1 - fall² · K`, applied to the headroom above the silence floor, so
//! the fall accelerates like a needle dropping under gravity. The result is
//! then blended into an exponential moving average.

use crate::config::MeterConfig;

use super::loudness::{DB_CEIL, DB_FLOOR};

/// Fall counter increment per falling update.
pub const FALL_STEP: f64 = 0.028;

/// Base gravity at 60 fps, scaled by frame rate and noise reduction.
const GRAVITY_BASE: f64 = 1.54;

/// Constants for one smoother update, derived from the live config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmootherParams {
    /// Gravity constant `K`.
    pub gravity: f64,
    /// Fall counter step `F`.
    pub fall_step: f64,
    /// EMA weight of the accumulated memory, always below 1.
    pub ema_weight: f64,
}

impl SmootherParams {
    /// `K = (60 / frame_rate)^2.5 · 1.54 / noise_reduction`, `W = noise_reduction`.
    ///
    /// `config` is expected to be clamped already.
    pub fn from_config(config: &MeterConfig) -> Self {
        let frame_rate = f64::from(config.frame_rate.max(1));
        let noise_reduction = config.noise_reduction;
        Self {
            gravity: (60.0 / frame_rate).powf(2.5) * GRAVITY_BASE / noise_reduction,
            fall_step: FALL_STEP,
            ema_weight: noise_reduction,
        }
    }
}

impl Default for SmootherParams {
    fn default() -> Self {
        Self::from_config(&MeterConfig::default())
    }
}

/// Smoothing state of one audio channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelState {
    /// Published level in dB, always within `[DB_FLOOR, DB_CEIL]`.
    pub output_level: f64,
    /// Pre-EMA candidate of the previous update.
    pub previous_output_level: f64,
    /// Level captured at the last rising edge.
    pub peak_hold: f64,
    /// Grows while falling, zero right after a rising edge.
    pub fall_counter: f64,
    /// EMA accumulator.
    pub memory: f64,
}

impl Default for ChannelState {
    fn default() -> Self {
        Self {
            output_level: DB_FLOOR,
            previous_output_level: DB_FLOOR,
            peak_hold: DB_FLOOR,
            fall_counter: 0.0,
            memory: DB_FLOOR,
        }
    }
}

impl ChannelState {
    /// Feed one raw reading and return the new published level.
    pub fn update(&mut self, raw_db: f64, params: &SmootherParams) -> f64 {
        let raw_db = if raw_db.is_nan() {
            DB_FLOOR
        } else {
            raw_db.clamp(DB_FLOOR, DB_CEIL)
        };

        let candidate = if raw_db >= self.previous_output_level {
            self.peak_hold = raw_db;
            self.fall_counter = 0.0;
            raw_db
        } else {
            let headroom = self.peak_hold - DB_FLOOR;
            let fallen =
                DB_FLOOR + headroom * (1.0 - self.fall_counter.powi(2) * params.gravity);
            self.fall_counter += params.fall_step;
            fallen.max(DB_FLOOR)
        };
        self.previous_output_level = candidate;

        let w = params.ema_weight;
        self.memory = self.memory * w + candidate * (1.0 - w);
        self.output_level = self.memory.clamp(DB_FLOOR, DB_CEIL);
        self.output_level
    }

    /// True if the last update was a rising edge.
    pub fn is_rising(&self) -> bool {
        self.fall_counter == 0.0
    }
}
