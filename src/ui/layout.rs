// src/ui/layout.rs
//! Layout computation for the meter, status line and debug overlay.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Narrowest and shortest overlay worth drawing.
const MIN_DEBUG_WIDTH: u16 = 25;
const MIN_DEBUG_HEIGHT: u16 = 3;

/// Computed layout areas for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputedLayout {
    /// Bordered meter panel
    pub meter_area: Rect,
    /// Footer line
    pub status_area: Rect,
    /// Overlay in the top-left of the meter panel, if enabled and it fits
    pub debug_area: Option<Rect>,
}

/// Compute the layout for the full frame `area`.
pub fn compute_layout(area: Rect, show_debug: bool, debug_lines: u16) -> ComputedLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let meter_area = chunks[0];
    let status_area = chunks[1];

    let debug_area = if show_debug {
        // Inset by one so the panel border stays visible
        let width = (meter_area.width / 2).min(64);
        let height = debug_lines
            .saturating_add(2)
            .min(meter_area.height.saturating_sub(2));
        (width >= MIN_DEBUG_WIDTH && height >= MIN_DEBUG_HEIGHT)
            .then(|| Rect::new(meter_area.x + 1, meter_area.y + 1, width, height))
    } else {
        None
    };

    ComputedLayout {
        meter_area,
        status_area,
        debug_area,
    }
}
