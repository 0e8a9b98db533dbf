// src/meter/height.rs
//! Mapping from decibels to terminal rows and sub-row fill glyphs.

use super::loudness::{DB_CEIL, DB_FLOOR};

/// Partial-row glyphs from almost full to almost empty.
pub const FILL_GLYPHS: [&str; 8] = ["█", "▇", "▆", "▅", "▄", "▃", "▂", "▁"];

/// Glyph for a completely filled row.
pub const FULL_GLYPH: &str = "█";

/// Glyph for an empty row.
pub const EMPTY_GLYPH: &str = " ";

/// Fractional bar height, in rows, for a level in dB.
///
/// Linear over `[DB_FLOOR, DB_CEIL]`, saturating at `0` and `total_rows`.
/// Zone thresholds go through the same function so they share the bar's
/// coordinate space.
pub fn db_to_height(db: f64, total_rows: u16) -> f64 {
    let db = if db.is_nan() {
        DB_FLOOR
    } else {
        db.clamp(DB_FLOOR, DB_CEIL)
    };
    ((db - DB_FLOOR) / (DB_CEIL - DB_FLOOR)) * f64::from(total_rows)
}

/// Fractional part of `height` as a percentage in `[0, 100)`.
pub fn fill_percentage(height: f64) -> f64 {
    height.fract().abs() * 100.0
}

/// Index into [`FILL_GLYPHS`] for the fractional part of `height`.
///
/// The percentage is bucketed into eight 12.5% bands: `[87.5, 100)` maps to
/// 0 (almost full), `[0, 12.5)` to 7 (almost empty).
pub fn fractional_fill_index(height: f64) -> usize {
    let percentage = fill_percentage(height);
    let band = (percentage / 12.5).floor() as usize;
    7 - band.min(7)
}
