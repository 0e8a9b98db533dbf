// src/audio/mod.rs
//! Audio module - capture backends and the per-buffer delivery path.

pub mod capture;
pub mod delivery;
pub mod player;
pub mod sample_capture;

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::JoinHandle,
};

use anyhow::{anyhow, Result};

// Re-export commonly used types
pub use capture::{list_input_devices, LiveInput};
pub use delivery::{BufferProcessor, Delivery, DeliveryStats, StatsSnapshot};
pub use player::FilePlayback;
pub use sample_capture::SampleTap;

/// Negotiated stream format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamFormat {
    pub channels: u16,
    pub sample_rate: u32,
}

/// A source of interleaved f32 buffers.
///
/// The format is known before `start`, so the meter can be sized once.
/// `start` returns after the capture thread is running, or with the error
/// that kept it from starting.
pub trait CaptureBackend {
    fn format(&self) -> StreamFormat;

    /// Short human-readable description for the UI and logs.
    fn describe(&self) -> String;

    fn start(self: Box<Self>, processor: BufferProcessor) -> Result<CaptureHandle>;
}

/// Owns the capture thread. Stopping sets the shared shutdown flag and joins.
pub struct CaptureHandle {
    thread: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl CaptureHandle {
    pub fn new(thread: JoinHandle<()>, shutdown: Arc<AtomicBool>) -> Self {
        Self {
            thread: Some(thread),
            shutdown,
        }
    }

    /// True once the capture thread has exited on its own (e.g. playback ended).
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, |t| t.is_finished())
    }

    pub fn stop(mut self) -> Result<()> {
        self.shutdown.store(true, Ordering::Release);
        self.join()
    }

    fn join(&mut self) -> Result<()> {
        match self.thread.take() {
            Some(thread) => {
                thread.thread().unpark();
                thread
                    .join()
                    .map_err(|_| anyhow!("capture thread panicked"))
            }
            None => Ok(()),
        }
    }
}

impl Drop for CaptureHandle {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        let _ = self.join();
    }
}
