// src/meter/loudness.rs
//! Linear amplitude to decibel conversion.

/// Silence floor. Every level in the meter lives in `[DB_FLOOR, DB_CEIL]`.
pub const DB_FLOOR: f64 = -60.0;

/// Full scale.
pub const DB_CEIL: f64 = 0.0;

/// Convert a linear peak amplitude to decibels.
///
/// Non-positive amplitudes (and NaN) map to [`DB_FLOOR`]. Amplitudes above 1.0
/// come out as positive dB and are left for the smoother to clamp.
pub fn amplitude_to_db(amplitude: f64) -> f64 {
    if amplitude.is_nan() || amplitude <= 0.0 {
        return DB_FLOOR;
    }

    (20.0 * amplitude.log10()).max(DB_FLOOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_maps_to_floor() {
        for amplitude in [0.0, -0.0, -0.5, -1.0, f64::NEG_INFINITY, f64::NAN] {
            assert_eq!(amplitude_to_db(amplitude), DB_FLOOR);
        }
    }

    #[test]
    fn full_scale_is_zero_db() {
        assert_eq!(amplitude_to_db(1.0), 0.0);
    }

    #[test]
    fn tenth_is_minus_twenty() {
        assert!((amplitude_to_db(0.1) - -20.0).abs() < 1e-4);
    }

    #[test]
    fn tiny_amplitudes_never_pass_the_floor() {
        assert_eq!(amplitude_to_db(1e-9), DB_FLOOR);
    }

    #[test]
    fn clipping_is_positive() {
        assert!(amplitude_to_db(2.0) > 6.0);
    }
}
