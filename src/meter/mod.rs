// src/meter/mod.rs
//! Metering pipeline: peak reduction, dB conversion, smoothing and row mapping.

pub mod frame;
pub mod height;
pub mod loudness;
pub mod reducer;
pub mod shared;
pub mod smoother;

pub use frame::{BarLevel, RenderFrame};
pub use height::{db_to_height, fill_percentage, fractional_fill_index, FILL_GLYPHS};
pub use loudness::{amplitude_to_db, DB_CEIL, DB_FLOOR};
pub use reducer::{reduce_peaks, BufferError};
pub use shared::{MeterSnapshot, MeterState, SharedMeter, UpdateOutcome};
pub use smoother::{ChannelState, SmootherParams};
