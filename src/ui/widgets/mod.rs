// src/ui/widgets/mod.rs
//! Custom widgets for the vumz UI.

pub mod debug_overlay;
pub mod status_bar;
pub mod vu_meter;

// Re-export widget rendering functions
pub use debug_overlay::{debug_line_count, debug_lines, render_debug_overlay};
pub use status_bar::render_status_bar;
pub use vu_meter::{render_bars, VuMeter};
