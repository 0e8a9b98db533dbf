// src/ui/canvas.rs
//! Draw targets for the bar renderer.
//!
//! The renderer only knows about rows, columns, glyphs and color zones; the
//! [`Canvas`] implementations decide what those become.

use ratatui::{buffer::Buffer, layout::Rect};

use crate::config::ColorTheme;

use super::theme::zone_color;

/// Color class of a cell, resolved to a concrete color by the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorZone {
    /// Below the green threshold.
    Low,
    /// Between the green and yellow thresholds.
    Mid,
    /// Above the yellow threshold.
    High,
    /// Single color of a non-zoned theme.
    Solid,
}

/// Something the bar renderer can draw on.
pub trait Canvas {
    /// `(rows, cols)` available.
    fn size(&self) -> (u16, u16);

    /// Draw one glyph. Out-of-range cells are ignored.
    fn set_cell(&mut self, row: u16, col: u16, glyph: &str, zone: ColorZone);

    fn flush(&mut self);
}

/// A region of a ratatui buffer.
pub struct BufferCanvas<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    theme: ColorTheme,
}

impl<'a> BufferCanvas<'a> {
    pub fn new(buf: &'a mut Buffer, area: Rect, theme: ColorTheme) -> Self {
        // Never address cells outside the buffer itself.
        let area = area.intersection(buf.area);
        Self { buf, area, theme }
    }
}

impl Canvas for BufferCanvas<'_> {
    fn size(&self) -> (u16, u16) {
        (self.area.height, self.area.width)
    }

    fn set_cell(&mut self, row: u16, col: u16, glyph: &str, zone: ColorZone) {
        if row >= self.area.height || col >= self.area.width {
            return;
        }
        let pos = (self.area.x + col, self.area.y + row);
        if let Some(cell) = self.buf.cell_mut(pos) {
            cell.set_symbol(glyph).set_fg(zone_color(self.theme, zone));
        }
    }

    // Terminal::draw flushes the whole buffer once the frame closure returns.
    fn flush(&mut self) {}
}

/// One recorded `set_cell` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCall {
    pub row: u16,
    pub col: u16,
    pub glyph: &'static str,
    pub zone: ColorZone,
}

/// Canvas that records draw calls instead of drawing. Used to compare frames.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    rows: u16,
    cols: u16,
    pub calls: Vec<DrawCall>,
    pub flushes: usize,
}

impl RecordingCanvas {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self {
            rows,
            cols,
            ..Self::default()
        }
    }

    /// Glyph last drawn at `(row, col)`, if any.
    pub fn glyph_at(&self, row: u16, col: u16) -> Option<&'static str> {
        self.calls
            .iter()
            .rev()
            .find(|c| c.row == row && c.col == col)
            .map(|c| c.glyph)
    }

    pub fn zone_at(&self, row: u16, col: u16) -> Option<ColorZone> {
        self.calls
            .iter()
            .rev()
            .find(|c| c.row == row && c.col == col)
            .map(|c| c.zone)
    }

    pub fn clear(&mut self) {
        self.calls.clear();
        self.flushes = 0;
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> (u16, u16) {
        (self.rows, self.cols)
    }

    fn set_cell(&mut self, row: u16, col: u16, glyph: &str, zone: ColorZone) {
        if row >= self.rows || col >= self.cols {
            return;
        }
        self.calls.push(DrawCall {
            row,
            col,
            glyph: intern_glyph(glyph),
            zone,
        });
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }
}

/// Map a glyph back to the renderer's static table so recordings stay allocation-free.
fn intern_glyph(glyph: &str) -> &'static str {
    use crate::meter::height::{EMPTY_GLYPH, FILL_GLYPHS, FULL_GLYPH};

    if glyph == FULL_GLYPH {
        FULL_GLYPH
    } else if glyph == EMPTY_GLYPH {
        EMPTY_GLYPH
    } else {
        FILL_GLYPHS
            .iter()
            .copied()
            .find(|g| *g == glyph)
            .unwrap_or("?")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn buffer_canvas_offsets_and_clips() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 10, 5));
        let area = Rect::new(2, 1, 4, 3);
        let mut canvas = BufferCanvas::new(&mut buf, area, ColorTheme::Classic);
        assert_eq!(canvas.size(), (3, 4));

        canvas.set_cell(0, 0, "█", ColorZone::High);
        canvas.set_cell(3, 0, "█", ColorZone::High);
        canvas.set_cell(0, 4, "█", ColorZone::High);

        let cell = &buf[(2, 1)];
        assert_eq!(cell.symbol(), "█");
        assert_eq!(cell.fg, Color::Red);
        assert_eq!(buf[(2, 4)].symbol(), " ");
        assert_eq!(buf[(6, 1)].symbol(), " ");
    }

    #[test]
    fn recording_canvas_keeps_order() {
        let mut canvas = RecordingCanvas::new(2, 2);
        canvas.set_cell(1, 1, "▄", ColorZone::Mid);
        canvas.set_cell(5, 0, "█", ColorZone::Low);
        canvas.flush();
        assert_eq!(canvas.calls.len(), 1);
        assert_eq!(canvas.glyph_at(1, 1), Some("▄"));
        assert_eq!(canvas.zone_at(1, 1), Some(ColorZone::Mid));
        assert_eq!(canvas.flushes, 1);
    }
}
