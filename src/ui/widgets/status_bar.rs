// src/ui/widgets/status_bar.rs
//! One-line footer with key hints and the live settings.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    config::MeterConfig,
    ui::theme::{style_key_hint, style_muted},
};

pub fn status_line(config: &MeterConfig, source: &str) -> Line<'static> {
    let hint = |key: &'static str, label: String| {
        [
            Span::styled(key, style_key_hint()),
            Span::styled(format!(" {label}  "), style_muted()),
        ]
    };

    let mut spans = Vec::with_capacity(12);
    spans.extend(hint("q", "quit".to_string()));
    spans.extend(hint("+/-", format!("sens {:.1}", config.sensitivity)));
    spans.extend(hint("[/]", format!("smooth {:.2}", config.noise_reduction)));
    spans.extend(hint("t", format!("theme {}", config.color_theme.name())));
    spans.extend(hint("d", "debug".to_string()));
    spans.push(Span::styled(source.to_string(), style_muted()));
    Line::from(spans)
}

pub fn render_status_bar(f: &mut Frame<'_>, area: Rect, config: &MeterConfig, source: &str) {
    f.render_widget(Paragraph::new(status_line(config, source)), area);
}
