// src/audio/player.rs
//! Meter a file while playing it through rodio.
//!
//! The decoded stream is wrapped in a [`SampleTap`] that feeds a ring buffer;
//! the playback thread drains that ring in fixed-size blocks and hands each
//! block to the meter, which makes it the delivery context for this backend.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::mpsc,
    thread,
    time::Duration,
};

use anyhow::{anyhow, bail, Context, Result};
use ringbuf::{traits::*, HeapCons, HeapRb};
use rodio::{Decoder, OutputStream, Sink, Source};

use super::{BufferProcessor, CaptureBackend, CaptureHandle, SampleTap, StreamFormat};

/// Ring size in samples (~370 ms of stereo at 44.1 kHz).
const RING_CAPACITY: usize = 16384;

/// How long the pump waits when less than one block is buffered.
const POLL_INTERVAL: Duration = Duration::from_millis(2);

/// Plays a file and meters what is played.
pub struct FilePlayback {
    path: PathBuf,
    decoder: Decoder<BufReader<File>>,
    format: StreamFormat,
    block_frames: usize,
}

impl FilePlayback {
    /// Open `path` and read its format. Fails if the file can't be read or decoded.
    pub fn open(path: &Path, block_frames: usize) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("could not open {}", path.display()))?;
        let decoder = Decoder::new(BufReader::new(file))
            .with_context(|| format!("could not decode {}", path.display()))?;
        let format = StreamFormat {
            channels: decoder.channels(),
            sample_rate: decoder.sample_rate(),
        };
        if format.channels == 0 {
            bail!("{} reports zero channels", path.display());
        }

        Ok(Self {
            path: path.to_path_buf(),
            decoder,
            format,
            block_frames: block_frames.max(1),
        })
    }
}

impl CaptureBackend for FilePlayback {
    fn format(&self) -> StreamFormat {
        self.format
    }

    fn describe(&self) -> String {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string());
        format!("playing: {name}")
    }

    fn start(self: Box<Self>, mut processor: BufferProcessor) -> Result<CaptureHandle> {
        let shutdown = processor.shutdown_flag();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<()>>();

        // Spawn the playback thread, which owns the OutputStream and the pump
        let thread = thread::Builder::new()
            .name("vumz-playback".to_string())
            .spawn(move || {
                let FilePlayback {
                    path,
                    decoder,
                    format,
                    block_frames,
                } = *self;

                let channels = usize::from(format.channels);
                let block_len = block_frames * channels;
                let (producer, mut consumer) =
                    HeapRb::<f32>::new(RING_CAPACITY.max(block_len * 4)).split();

                let (stream, handle) = match OutputStream::try_default() {
                    Ok(pair) => pair,
                    Err(e) => {
                        let _ = ready_tx.send(Err(anyhow!("no audio output: {e}")));
                        return;
                    }
                };
                let sink = match Sink::try_new(&handle) {
                    Ok(sink) => sink,
                    Err(e) => {
                        let _ = ready_tx.send(Err(anyhow!("could not create sink: {e}")));
                        return;
                    }
                };

                sink.append(SampleTap::new(decoder.convert_samples::<f32>(), producer));
                sink.play();
                let _ = ready_tx.send(Ok(()));
                tracing::info!(path = %path.display(), "playback started");

                // Pre-sized once; every delivered block is popped into it.
                let mut block = vec![0.0f32; block_len];
                pump(&mut consumer, &mut processor, || sink.empty(), &mut block, channels);

                sink.stop();
                // Keep stream alive until the sink is done with it
                drop(stream);
                tracing::info!(path = %path.display(), "playback stopped");
            })
            .context("failed to spawn playback thread")?;

        let handle = CaptureHandle::new(thread, shutdown);
        match ready_rx.recv() {
            Ok(Ok(())) => Ok(handle),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(anyhow!("playback thread exited during startup")),
        }
    }
}

/// Deliver whole blocks until shutdown, or until `drained` reports that
/// playback has ended and the ring holds less than a block.
fn pump<D>(
    consumer: &mut HeapCons<f32>,
    processor: &mut BufferProcessor,
    drained: D,
    block: &mut [f32],
    channels: usize,
) where
    D: Fn() -> bool,
{
    loop {
        if processor.is_shutdown() {
            break;
        }

        if consumer.occupied_len() >= block.len() {
            // Popping is the acknowledgement: the slots are free for the tap again.
            consumer.pop_slice(block);
            let _ = processor.deliver(block, channels);
        } else if drained() {
            break;
        } else {
            processor.note_starved();
            thread::park_timeout(POLL_INTERVAL);
        }
    }
}
