// src/meter/shared.rs
//! Meter state shared between the audio-delivery and render contexts.
//!
//! Both sides go through one mutex. The delivery side only ever uses
//! `try_lock` and drops the update when the lock is busy; the render side
//! blocks, but only long enough to copy a [`MeterSnapshot`] or edit the config.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};

use crate::config::MeterConfig;

use super::loudness::amplitude_to_db;
use super::smoother::{ChannelState, SmootherParams};

/// Everything behind the lock.
#[derive(Debug, Clone)]
pub struct MeterState {
    pub channels: Vec<ChannelState>,
    /// Raw peak amplitudes from the last accepted buffer.
    pub peaks: Vec<f32>,
    /// Raw dB readings from the last accepted buffer, after sensitivity.
    pub raw_db: Vec<f64>,
    pub config: MeterConfig,
    /// Number of accepted updates.
    pub updates: u64,
}

impl MeterState {
    fn new(channel_count: usize, config: MeterConfig) -> Self {
        Self {
            channels: vec![ChannelState::default(); channel_count],
            peaks: vec![0.0; channel_count],
            raw_db: vec![super::loudness::DB_FLOOR; channel_count],
            config: config.clamped(),
            updates: 0,
        }
    }

    /// Run one set of channel peaks through loudness conversion and smoothing.
    pub fn apply_peaks(&mut self, peaks: &[f32]) {
        let params = SmootherParams::from_config(&self.config);
        let gain = self.config.sensitivity;
        for (idx, (state, &peak)) in self.channels.iter_mut().zip(peaks).enumerate() {
            let db = amplitude_to_db(f64::from(peak) * gain);
            state.update(db, &params);
            self.peaks[idx] = peak;
            self.raw_db[idx] = db;
        }
        self.updates = self.updates.wrapping_add(1);
    }
}

/// Copy of [`MeterState`] owned by the render loop.
pub type MeterSnapshot = MeterState;

/// Outcome of a non-blocking update attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    /// Another context held the lock; nothing changed.
    Contended,
}

/// Cloneable handle to the shared meter state.
#[derive(Debug, Clone)]
pub struct SharedMeter {
    inner: Arc<Mutex<MeterState>>,
}

impl SharedMeter {
    /// Create state for `channel_count` channels. This is the only allocation
    /// of channel storage for the life of the meter.
    pub fn new(channel_count: usize, config: MeterConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MeterState::new(channel_count, config))),
        }
    }

    /// Apply a set of peaks without ever blocking.
    pub fn try_apply_peaks(&self, peaks: &[f32]) -> UpdateOutcome {
        let mut state = match self.inner.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return UpdateOutcome::Contended,
        };
        state.apply_peaks(peaks);
        UpdateOutcome::Applied
    }

    /// Copy the current state into `snapshot`, reusing its storage.
    pub fn snapshot_into(&self, snapshot: &mut MeterSnapshot) {
        let state = self.lock();
        snapshot.channels.clone_from(&state.channels);
        snapshot.peaks.clone_from(&state.peaks);
        snapshot.raw_db.clone_from(&state.raw_db);
        snapshot.config = state.config;
        snapshot.updates = state.updates;
    }

    pub fn snapshot(&self) -> MeterSnapshot {
        self.lock().clone()
    }

    /// Edit the config under the lock; the result is clamped before release.
    pub fn update_config<F>(&self, edit: F) -> MeterConfig
    where
        F: FnOnce(&mut MeterConfig),
    {
        let mut state = self.lock();
        edit(&mut state.config);
        state.config = state.config.clamped();
        state.config
    }

    pub fn config(&self) -> MeterConfig {
        self.lock().config
    }

    pub fn channel_count(&self) -> usize {
        self.lock().channels.len()
    }

    fn lock(&self) -> MutexGuard<'_, MeterState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applied_peaks_reach_the_snapshot() {
        let meter = SharedMeter::new(2, MeterConfig::default());
        assert_eq!(meter.try_apply_peaks(&[1.0, 0.0]), UpdateOutcome::Applied);

        let snap = meter.snapshot();
        assert_eq!(snap.updates, 1);
        assert_eq!(snap.peaks, vec![1.0, 0.0]);
        assert_eq!(snap.raw_db, vec![0.0, -60.0]);
        assert_eq!(snap.channels[0].previous_output_level, 0.0);
        assert_eq!(snap.channels[1].output_level, -60.0);
    }

    #[test]
    fn contended_update_is_skipped() {
        let meter = SharedMeter::new(1, MeterConfig::default());
        let guard = meter.inner.lock().unwrap();
        assert_eq!(meter.try_apply_peaks(&[0.5]), UpdateOutcome::Contended);
        drop(guard);
        assert_eq!(meter.snapshot().updates, 0);
    }

    #[test]
    fn sensitivity_is_applied_before_conversion() {
        let meter = SharedMeter::new(1, MeterConfig::default());
        meter.update_config(|cfg| cfg.set_sensitivity(10.0));
        meter.try_apply_peaks(&[0.01]);
        assert!((meter.snapshot().raw_db[0] - -20.0).abs() < 1e-4);
    }

    #[test]
    fn config_edits_are_clamped() {
        let meter = SharedMeter::new(2, MeterConfig::default());
        let cfg = meter.update_config(|cfg| cfg.noise_reduction = 3.0);
        assert_eq!(cfg.noise_reduction, 0.95);
        assert_eq!(meter.config().noise_reduction, 0.95);
    }

    #[test]
    fn snapshot_into_reuses_storage() {
        let meter = SharedMeter::new(2, MeterConfig::default());
        let mut snap = meter.snapshot();
        meter.try_apply_peaks(&[0.5, 0.25]);
        meter.snapshot_into(&mut snap);
        assert_eq!(snap.peaks, vec![0.5, 0.25]);
        assert_eq!(snap.channels.len(), 2);
    }
}
