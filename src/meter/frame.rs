// src/meter/frame.rs
//! Per-frame bar geometry derived from a meter snapshot.

use super::height::{db_to_height, fill_percentage, fractional_fill_index};
use super::shared::MeterSnapshot;

/// Geometry of one channel bar for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarLevel {
    /// Smoothed level the bar shows, in dB.
    pub level_db: f64,
    /// Fractional height in rows.
    pub height: f64,
    /// Completely filled rows.
    pub filled_rows: u16,
    /// How full the row above the filled ones is, in percent.
    pub fill_percent: f64,
    /// Glyph index for that partial row.
    pub fill_index: usize,
    /// Level is moving up (or holding) rather than falling.
    pub rising: bool,
}

impl BarLevel {
    pub fn new(level_db: f64, total_rows: u16, rising: bool) -> Self {
        let height = db_to_height(level_db, total_rows);
        Self {
            level_db,
            height,
            filled_rows: height.floor() as u16,
            fill_percent: fill_percentage(height),
            fill_index: fractional_fill_index(height),
            rising,
        }
    }
}

/// Everything the bar renderer needs for one draw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderFrame {
    pub total_rows: u16,
    /// Height where the yellow zone starts.
    pub green_rows: f64,
    /// Height where the red zone starts.
    pub yellow_rows: f64,
    pub bars: Vec<BarLevel>,
}

impl RenderFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the frame for `total_rows` rows, keeping the bar storage.
    pub fn rebuild(&mut self, snapshot: &MeterSnapshot, total_rows: u16) {
        let config = &snapshot.config;
        self.total_rows = total_rows;
        self.green_rows = db_to_height(config.green_threshold_db, total_rows);
        self.yellow_rows = db_to_height(config.yellow_threshold_db, total_rows);
        self.bars.clear();
        self.bars.extend(snapshot.channels.iter().map(|ch| {
            BarLevel::new(ch.output_level, total_rows, ch.is_rising())
        }));
    }

    pub fn from_snapshot(snapshot: &MeterSnapshot, total_rows: u16) -> Self {
        let mut frame = Self::new();
        frame.rebuild(snapshot, total_rows);
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MeterConfig;
    use crate::meter::SharedMeter;

    #[test]
    fn bar_level_splits_height() {
        let bar = BarLevel::new(-15.0, 40, true);
        assert_eq!(bar.height, 30.0);
        assert_eq!(bar.filled_rows, 30);
        assert_eq!(bar.fill_index, 7);

        let bar = BarLevel::new(-59.0, 60, false);
        assert!((bar.height - 1.0).abs() < 1e-9);
    }

    #[test]
    fn thresholds_share_the_bar_scale() {
        let meter = SharedMeter::new(2, MeterConfig::default());
        let frame = RenderFrame::from_snapshot(&meter.snapshot(), 60);
        assert!((frame.green_rows - 40.0).abs() < 1e-9);
        assert!((frame.yellow_rows - 54.0).abs() < 1e-9);
        assert_eq!(frame.bars.len(), 2);
        assert!(frame.bars.iter().all(|b| b.filled_rows == 0));
    }

    #[test]
    fn rebuild_tracks_resizes() {
        let meter = SharedMeter::new(1, MeterConfig::default());
        meter.try_apply_peaks(&[1.0]);
        let snap = meter.snapshot();
        let mut frame = RenderFrame::from_snapshot(&snap, 10);
        let small = frame.bars[0].height;
        frame.rebuild(&snap, 20);
        assert!((frame.bars[0].height - small * 2.0).abs() < 1e-9);
        assert_eq!(frame.total_rows, 20);
    }
}
