// src/app/mod.rs
//! Application module - render-side state and key handling.

pub mod state;

pub use state::App;
