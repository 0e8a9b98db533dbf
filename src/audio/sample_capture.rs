// src/audio/sample_capture.rs
//! A pass-through source that copies played samples into a lock-free ring buffer.

use std::time::Duration;

use ringbuf::{traits::*, HeapProd};
use rodio::Source;

/// Wraps a rodio source and tees every sample into the producer half of a
/// ring buffer. Runs on the output stream's thread, so it never blocks.
///
/// Samples are pushed a whole frame at a time. When the ring can't take the
/// frame, all of it is dropped from the meter (playback is unaffected), so
/// the consumer always reads channel-aligned data.
pub struct SampleTap<S> {
    source: S,
    producer: HeapProd<f32>,
    frame: Vec<f32>,
    channels: usize,
}

impl<S> SampleTap<S>
where
    S: Source<Item = f32>,
{
    pub fn new(source: S, producer: HeapProd<f32>) -> Self {
        let channels = usize::from(source.channels()).max(1);
        Self {
            source,
            producer,
            frame: Vec::with_capacity(channels),
            channels,
        }
    }
}

impl<S> Iterator for SampleTap<S>
where
    S: Source<Item = f32>,
{
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = self.source.next()?;
        self.frame.push(sample);
        if self.frame.len() == self.channels {
            if self.producer.vacant_len() >= self.channels {
                self.producer.push_slice(&self.frame);
            }
            self.frame.clear();
        }
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.source.size_hint()
    }
}

impl<S> Source for SampleTap<S>
where
    S: Source<Item = f32>,
{
    fn current_frame_len(&self) -> Option<usize> {
        self.source.current_frame_len()
    }

    fn channels(&self) -> u16 {
        self.source.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.source.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.source.total_duration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meter::reduce_peaks;
    use ringbuf::HeapRb;
    use rodio::buffer::SamplesBuffer;

    #[test]
    fn samples_pass_through_and_are_copied() {
        let (producer, mut consumer) = HeapRb::<f32>::new(8).split();
        let source = SamplesBuffer::new(2, 48_000, vec![0.1f32, -0.2, 0.3, -0.4]);
        let tap = SampleTap::new(source, producer);
        assert_eq!(tap.channels(), 2);
        assert_eq!(tap.sample_rate(), 48_000);

        let played: Vec<f32> = tap.collect();
        assert_eq!(played, vec![0.1, -0.2, 0.3, -0.4]);

        let mut copied = [0.0f32; 4];
        assert_eq!(consumer.pop_slice(&mut copied), 4);
        assert_eq!(copied, [0.1, -0.2, 0.3, -0.4]);
    }

    #[test]
    fn full_ring_drops_meter_copy_only() {
        let (producer, consumer) = HeapRb::<f32>::new(2).split();
        let source = SamplesBuffer::new(1, 8_000, vec![1.0f32, 2.0, 3.0]);
        let played: Vec<f32> = SampleTap::new(source, producer).collect();
        assert_eq!(played.len(), 3);
        assert_eq!(consumer.occupied_len(), 2);
    }

    #[test]
    fn overflow_drops_whole_frames_and_keeps_channels_aligned() {
        let (producer, mut consumer) = HeapRb::<f32>::new(4).split();
        let samples: Vec<f32> = [0.1f32, 0.9].repeat(8);
        let mut tap = SampleTap::new(SamplesBuffer::new(2, 48_000, samples), producer);

        // Fill the ring with two frames, then overflow by one sample
        for _ in 0..5 {
            tap.next();
        }
        assert_eq!(consumer.occupied_len(), 4);

        // Free one frame; the half-taken frame must not land in it
        let mut frame = [0.0f32; 2];
        assert_eq!(consumer.pop_slice(&mut frame), 2);
        assert_eq!(frame, [0.1, 0.9]);
        for _ in 0..5 {
            tap.next();
        }

        let mut rest = [0.0f32; 4];
        assert_eq!(consumer.pop_slice(&mut rest), 4);
        assert_eq!(rest, [0.1, 0.9, 0.1, 0.9]);

        let mut peaks = [0.0f32; 2];
        reduce_peaks(&rest, 2, &mut peaks).unwrap();
        assert_eq!(peaks, [0.1, 0.9]);
    }
}
