// src/main.rs
use std::sync::{atomic::AtomicBool, Arc};

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use vumz::{
    app::App,
    audio::{
        list_input_devices, BufferProcessor, CaptureBackend, DeliveryStats, FilePlayback,
        LiveInput,
    },
    cli::Cli,
    config::Config,
    logging,
    meter::SharedMeter,
    ui,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_devices {
        for name in list_input_devices()? {
            println!("{name}");
        }
        return Ok(());
    }

    let log_path = logging::init(cli.log_file.as_deref())?;
    eprintln!("vumz: logging to {}", log_path.display());

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let mut config = loaded.unwrap_or_else(|e| {
        warn!("{e}, using defaults");
        Config::default()
    });
    cli.apply(&mut config);
    info!(?config, "config loaded from {}", config_path.display());

    let backend: Box<dyn CaptureBackend> = match &cli.play {
        Some(path) => Box::new(FilePlayback::open(path, config.audio.playback_block_frames)?),
        None => Box::new(LiveInput::open(config.audio.device.as_deref())?),
    };
    let format = backend.format();
    let source = backend.describe();
    info!(%source, channels = format.channels, sample_rate = format.sample_rate, "opened");

    // One meter sized to the negotiated channel count for the whole session
    let shutdown = Arc::new(AtomicBool::new(false));
    let meter = SharedMeter::new(usize::from(format.channels), config.meter);
    let stats = Arc::new(DeliveryStats::default());
    let processor = BufferProcessor::new(meter.clone(), stats.clone(), shutdown.clone());
    let capture = backend.start(processor)?;

    let mut app = App::new(meter, stats.clone(), format, source, shutdown);
    let ui_result = ui::run(&mut app, &capture);
    let stop_result = capture.stop();

    info!(stats = ?stats.snapshot(), "exiting");
    ui_result?;
    stop_result
}
