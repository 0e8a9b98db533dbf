// src/meter/reducer.rs
//! Reduces one interleaved sample buffer to a peak amplitude per channel.

use thiserror::Error;

/// Reasons a delivered buffer is rejected before it reaches the smoother.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("empty buffer")]
    Empty,
    #[error("channel count is zero")]
    NoChannels,
    #[error("{len} samples is not a multiple of {channels} channels")]
    Misaligned { len: usize, channels: usize },
    #[error("expected {expected} channels, buffer has {actual}")]
    ChannelMismatch { expected: usize, actual: usize },
}

/// Write `max(|sample|)` of every channel into `peaks`.
///
/// `samples` is interleaved; channel `c` is read from offset `c` with stride
/// `channel_count`. `peaks` must hold exactly `channel_count` slots. Nothing
/// is written when the buffer is rejected.
pub fn reduce_peaks(
    samples: &[f32],
    channel_count: usize,
    peaks: &mut [f32],
) -> Result<(), BufferError> {
    if channel_count == 0 {
        return Err(BufferError::NoChannels);
    }
    if samples.is_empty() {
        return Err(BufferError::Empty);
    }
    if samples.len() % channel_count != 0 {
        return Err(BufferError::Misaligned {
            len: samples.len(),
            channels: channel_count,
        });
    }
    if peaks.len() != channel_count {
        return Err(BufferError::ChannelMismatch {
            expected: peaks.len(),
            actual: channel_count,
        });
    }

    for (channel, peak) in peaks.iter_mut().enumerate() {
        *peak = samples
            .iter()
            .skip(channel)
            .step_by(channel_count)
            .fold(0.0f32, |max, &s| max.max(s.abs()));
    }

    Ok(())
}
