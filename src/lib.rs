// src/lib.rs
//! Vumz - A terminal VU meter.
//!
//! This library provides the metering pipeline (peak reduction, dB conversion,
//! smoothing and bar geometry), the capture backends that feed it, and the
//! ratatui front end that draws it.

pub mod app;
pub mod audio;
pub mod cli;
pub mod config;
pub mod logging;
pub mod meter;
pub mod ui;
