// src/ui/theme.rs
//! Color palette for bars, overlay and status line.

use ratatui::style::{Color, Modifier, Style};

use crate::config::ColorTheme;

use super::canvas::ColorZone;

/// Concrete color for a cell zone under `theme`.
pub fn zone_color(theme: ColorTheme, zone: ColorZone) -> Color {
    match zone {
        ColorZone::Low => Color::Green,
        ColorZone::Mid => Color::Yellow,
        ColorZone::High => Color::Red,
        ColorZone::Solid => solid_color(theme),
    }
}

fn solid_color(theme: ColorTheme) -> Color {
    match theme {
        ColorTheme::Classic => Color::Green,
        ColorTheme::Mono => Color::White,
        ColorTheme::Cyan => Color::Cyan,
        ColorTheme::Magenta => Color::Magenta,
        ColorTheme::Blue => Color::Blue,
    }
}

pub fn style_border() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn style_title() -> Style {
    Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)
}

pub fn style_debug_title() -> Style {
    Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
}

pub fn style_debug_text() -> Style {
    Style::default().fg(Color::Blue)
}

pub fn style_key_hint() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn style_muted() -> Style {
    Style::default().fg(Color::DarkGray)
}
