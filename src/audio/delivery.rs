// src/audio/delivery.rs
//! The audio-delivery side of the meter: what runs once per captured buffer.
//!
//! Nothing in here blocks, allocates or logs. Peaks are reduced into scratch
//! space sized at construction, outside the lock, and the shared state is
//! only touched through [`SharedMeter::try_apply_peaks`].

use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

use crate::meter::{reduce_peaks, BufferError, SharedMeter, UpdateOutcome};

/// What happened to one delivered buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Updated,
    Malformed(BufferError),
    Contended,
    /// Shutdown was requested; the buffer was ignored.
    Stopped,
}

/// Counters shared with the UI for the debug overlay.
#[derive(Debug, Default)]
pub struct DeliveryStats {
    pub delivered: AtomicU64,
    pub malformed: AtomicU64,
    pub contended: AtomicU64,
    /// Polls that found no full buffer waiting.
    pub starved: AtomicU64,
}

/// Plain copy of [`DeliveryStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub delivered: u64,
    pub malformed: u64,
    pub contended: u64,
    pub starved: u64,
}

impl DeliveryStats {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            delivered: self.delivered.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
            contended: self.contended.load(Ordering::Relaxed),
            starved: self.starved.load(Ordering::Relaxed),
        }
    }
}

/// Turns delivered buffers into meter updates.
pub struct BufferProcessor {
    meter: SharedMeter,
    peaks: Vec<f32>,
    stats: Arc<DeliveryStats>,
    shutdown: Arc<AtomicBool>,
}

impl BufferProcessor {
    pub fn new(meter: SharedMeter, stats: Arc<DeliveryStats>, shutdown: Arc<AtomicBool>) -> Self {
        let channels = meter.channel_count();
        Self {
            meter,
            peaks: vec![0.0; channels],
            stats,
            shutdown,
        }
    }

    /// Process one interleaved buffer.
    pub fn deliver(&mut self, samples: &[f32], channel_count: usize) -> Delivery {
        if self.is_shutdown() {
            return Delivery::Stopped;
        }

        if let Err(err) = reduce_peaks(samples, channel_count, &mut self.peaks) {
            self.stats.malformed.fetch_add(1, Ordering::Relaxed);
            return Delivery::Malformed(err);
        }

        match self.meter.try_apply_peaks(&self.peaks) {
            UpdateOutcome::Applied => {
                self.stats.delivered.fetch_add(1, Ordering::Relaxed);
                Delivery::Updated
            }
            UpdateOutcome::Contended => {
                self.stats.contended.fetch_add(1, Ordering::Relaxed);
                Delivery::Contended
            }
        }
    }

    /// Record a poll that had no buffer ready. The meter keeps its last state.
    pub fn note_starved(&self) {
        self.stats.starved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// The flag this processor checks; capture threads poll the same one.
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    pub fn channel_count(&self) -> usize {
        self.peaks.len()
    }
}
