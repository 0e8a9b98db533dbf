// src/audio/capture.rs
//! Live input capture through cpal.

use std::{
    sync::mpsc,
    thread,
    time::Duration,
};

use anyhow::{anyhow, bail, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SampleFormat, SizedSample, StreamConfig};

use super::{BufferProcessor, CaptureBackend, CaptureHandle, Delivery, StreamFormat};

/// Initial room for converted samples; grows once if a backend delivers more.
const SCRATCH_CAPACITY: usize = 16384;

/// Names of all input devices on the default host.
pub fn list_input_devices() -> Result<Vec<String>> {
    let host = cpal::default_host();
    let names = host
        .input_devices()
        .context("could not enumerate input devices")?
        .filter_map(|dev| dev.name().ok())
        .collect();
    Ok(names)
}

/// Pick the device whose name contains `want`, else a monitor of the
/// system output, else the default input.
pub fn pick_input_device(want: Option<&str>) -> Result<Device> {
    let host = cpal::default_host();

    if let Some(want) = want {
        let want = want.to_lowercase();
        for dev in host.input_devices()? {
            if let Ok(name) = dev.name() {
                if name.to_lowercase().contains(&want) {
                    return Ok(dev);
                }
            }
        }
        bail!("no input device matching '{}'", want);
    }

    if let Ok(devices) = host.input_devices() {
        for dev in devices {
            if let Ok(name) = dev.name() {
                if name.to_lowercase().contains("monitor") {
                    return Ok(dev);
                }
            }
        }
    }

    host.default_input_device()
        .context("no default input device")
}

/// Capture from an input device.
pub struct LiveInput {
    device: Device,
    name: String,
    config: StreamConfig,
    sample_format: SampleFormat,
}

impl LiveInput {
    /// Open a device and negotiate its default input config.
    pub fn open(device_hint: Option<&str>) -> Result<Self> {
        let device = pick_input_device(device_hint)?;
        let name = device.name().unwrap_or_else(|_| "unknown device".to_string());
        let supported = device
            .default_input_config()
            .with_context(|| format!("no usable input config for '{name}'"))?;

        Ok(Self {
            device,
            name,
            sample_format: supported.sample_format(),
            config: supported.config(),
        })
    }
}

impl CaptureBackend for LiveInput {
    fn format(&self) -> StreamFormat {
        StreamFormat {
            channels: self.config.channels,
            sample_rate: self.config.sample_rate.0,
        }
    }

    fn describe(&self) -> String {
        format!("input: {}", self.name)
    }

    fn start(self: Box<Self>, processor: BufferProcessor) -> Result<CaptureHandle> {
        let shutdown = processor.shutdown_flag();
        let thread_shutdown = shutdown.clone();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<()>>();

        // cpal streams are not Send, so the stream lives and dies on this thread.
        let thread = thread::Builder::new()
            .name("vumz-capture".to_string())
            .spawn(move || {
                let LiveInput {
                    device,
                    name,
                    config,
                    sample_format,
                } = *self;

                let stream = match build_stream_for(&device, &config, sample_format, processor) {
                    Ok(stream) => stream,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                if let Err(e) = stream.play() {
                    let _ = ready_tx.send(Err(anyhow!("could not start '{name}': {e}")));
                    return;
                }
                let _ = ready_tx.send(Ok(()));
                tracing::info!(device = %name, "capture stream running");

                while !thread_shutdown.load(std::sync::atomic::Ordering::Acquire) {
                    thread::park_timeout(Duration::from_millis(100));
                }

                drop(stream);
                tracing::info!(device = %name, "capture stream closed");
            })
            .context("failed to spawn capture thread")?;

        let handle = CaptureHandle::new(thread, shutdown);
        match ready_rx.recv() {
            Ok(Ok(())) => Ok(handle),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(anyhow!("capture thread exited during startup")),
        }
    }
}

fn build_stream_for(
    device: &Device,
    config: &StreamConfig,
    sample_format: SampleFormat,
    processor: BufferProcessor,
) -> Result<cpal::Stream> {
    match sample_format {
        SampleFormat::F32 => build_f32_stream(device, config, processor),
        SampleFormat::I16 => build_stream::<i16>(device, config, processor),
        SampleFormat::U16 => build_stream::<u16>(device, config, processor),
        SampleFormat::I32 => build_stream::<i32>(device, config, processor),
        other => bail!("unsupported sample format {other:?}"),
    }
}

/// Native f32 input: cpal's buffer goes straight to the processor.
fn build_f32_stream(
    device: &Device,
    config: &StreamConfig,
    mut processor: BufferProcessor,
) -> Result<cpal::Stream> {
    let channels = usize::from(config.channels);
    let err_fn = |e: cpal::StreamError| tracing::warn!("capture stream error: {}", e);

    let stream = device.build_input_stream(
        config,
        move |data: &[f32], _: &cpal::InputCallbackInfo| {
            // Returning from the callback hands the buffer back to cpal,
            // whatever deliver() decided.
            let _ = processor.deliver(data, channels);
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}

/// Integer input: converted into a reused scratch buffer first.
fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    mut processor: BufferProcessor,
) -> Result<cpal::Stream>
where
    T: SizedSample,
    f32: FromSample<T>,
{
    let channels = usize::from(config.channels);
    let mut scratch: Vec<f32> = Vec::with_capacity(SCRATCH_CAPACITY);
    let err_fn = |e: cpal::StreamError| tracing::warn!("capture stream error: {}", e);

    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            let _ = deliver_converted(&mut processor, &mut scratch, data, channels);
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}

fn deliver_converted<T>(
    processor: &mut BufferProcessor,
    scratch: &mut Vec<f32>,
    data: &[T],
    channels: usize,
) -> Delivery
where
    T: Sample,
    f32: FromSample<T>,
{
    scratch.clear();
    scratch.extend(data.iter().map(|&s| s.to_sample::<f32>()));
    processor.deliver(scratch, channels)
}
