// src/ui/widgets/vu_meter.rs
//! VU bar rendering.

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::{
    config::ColorTheme,
    meter::{
        frame::{BarLevel, RenderFrame},
        height::{EMPTY_GLYPH, FILL_GLYPHS, FULL_GLYPH},
    },
    ui::canvas::{BufferCanvas, Canvas, ColorZone},
};

/// Columns between neighbouring bars.
pub const BAR_GAP: u16 = 2;

/// First column of bar `index`, or `None` if it doesn't fit in `cols`.
///
/// Bars are centered when they all fit; otherwise they are packed from the
/// left and the ones past the edge are dropped.
pub fn bar_start(cols: u16, bar_count: usize, bar_width: u16, index: usize) -> Option<u16> {
    if bar_width == 0 || index >= bar_count {
        return None;
    }
    let pitch = u32::from(bar_width) + u32::from(BAR_GAP);
    let total = pitch * bar_count as u32 - u32::from(BAR_GAP);
    let offset = u32::from(cols).saturating_sub(total) / 2;
    let start = offset + pitch * index as u32;
    if start + u32::from(bar_width) > u32::from(cols) {
        return None;
    }
    u16::try_from(start).ok()
}

/// Glyph for row `row` (0 at the top) of a bar.
pub fn row_glyph(bar: &BarLevel, total_rows: u16, row: u16) -> &'static str {
    let from_bottom = f64::from(total_rows.saturating_sub(row));
    if from_bottom <= f64::from(bar.filled_rows) {
        FULL_GLYPH
    } else if from_bottom > bar.height && from_bottom < bar.height + 1.0 {
        FILL_GLYPHS[bar.fill_index]
    } else {
        EMPTY_GLYPH
    }
}

/// Color zone of row `row`, independent of whether it is filled.
pub fn row_zone(frame: &RenderFrame, row: u16, theme: ColorTheme) -> ColorZone {
    if !theme.is_zoned() {
        return ColorZone::Solid;
    }
    let from_bottom = f64::from(frame.total_rows.saturating_sub(row));
    if from_bottom < frame.green_rows {
        ColorZone::Low
    } else if from_bottom < frame.yellow_rows {
        ColorZone::Mid
    } else {
        ColorZone::High
    }
}

/// Draw every bar of `frame` on `canvas` and flush.
///
/// Nothing is drawn when the frame is taller than the canvas; bars that don't
/// fit horizontally are skipped. Output depends only on the arguments, so
/// drawing the same frame twice issues the same calls.
pub fn render_bars<C>(canvas: &mut C, frame: &RenderFrame, bar_width: u16, theme: ColorTheme)
where
    C: Canvas + ?Sized,
{
    let (rows, cols) = canvas.size();
    let total_rows = frame.total_rows;
    if total_rows == 0 || total_rows > rows {
        return;
    }

    for (index, bar) in frame.bars.iter().enumerate() {
        let Some(start) = bar_start(cols, frame.bars.len(), bar_width, index) else {
            continue;
        };

        for row in 0..total_rows {
            let glyph = row_glyph(bar, total_rows, row);
            let zone = row_zone(frame, row, theme);
            for col in start..start + bar_width {
                canvas.set_cell(row, col, glyph, zone);
            }
        }
    }

    canvas.flush();
}

/// The meter bars as a ratatui widget.
pub struct VuMeter<'a> {
    frame: &'a RenderFrame,
    bar_width: u16,
    theme: ColorTheme,
}

impl<'a> VuMeter<'a> {
    pub fn new(frame: &'a RenderFrame, bar_width: u16, theme: ColorTheme) -> Self {
        Self {
            frame,
            bar_width,
            theme,
        }
    }
}

impl Widget for VuMeter<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut canvas = BufferCanvas::new(buf, area, self.theme);
        render_bars(&mut canvas, self.frame, self.bar_width, self.theme);
    }
}
