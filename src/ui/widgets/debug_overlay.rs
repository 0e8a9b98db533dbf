// src/ui/widgets/debug_overlay.rs
//! Debug overlay with raw and smoothed levels per channel.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::{
    audio::{StatsSnapshot, StreamFormat},
    meter::{MeterSnapshot, RenderFrame},
    ui::theme::{style_debug_text, style_debug_title, style_muted},
};

/// Lines the overlay needs for `channels` channels, without borders.
pub fn debug_line_count(channels: usize) -> u16 {
    (channels as u16).saturating_add(4)
}

/// Short channel label: L/R for stereo pairs, numbers beyond.
pub fn channel_label(index: usize) -> String {
    match index {
        0 => "L".to_string(),
        1 => "R".to_string(),
        n => format!("{}", n + 1),
    }
}

/// Build the overlay text.
pub fn debug_lines(
    snapshot: &MeterSnapshot,
    frame: &RenderFrame,
    format: StreamFormat,
    stats: StatsSnapshot,
) -> Vec<Line<'static>> {
    let cfg = &snapshot.config;
    let mut lines = Vec::with_capacity(usize::from(debug_line_count(snapshot.channels.len())));

    lines.push(Line::from(vec![
        Span::styled("Channels: ", style_muted()),
        Span::styled(
            format!("{} @ {} Hz", format.channels, format.sample_rate),
            style_debug_text(),
        ),
    ]));

    for (idx, bar) in frame.bars.iter().enumerate() {
        let peak = snapshot.peaks.get(idx).copied().unwrap_or(0.0);
        let raw = snapshot.raw_db.get(idx).copied().unwrap_or(f64::NAN);
        let trend = if bar.rising { "rise" } else { "fall" };
        lines.push(Line::styled(
            format!(
                "|- {}: peak {:.3}  raw {:6.2} dB  out {:6.2} dB {}  h {:5.2}  {:3.0}%",
                channel_label(idx),
                peak,
                raw,
                bar.level_db,
                trend,
                bar.height,
                bar.fill_percent
            ),
            style_debug_text(),
        ));
    }

    lines.push(Line::styled(
        format!(
            "sens {:.1}  nr {:.2}  fps {}  theme {}",
            cfg.sensitivity,
            cfg.noise_reduction,
            cfg.frame_rate,
            cfg.color_theme.name()
        ),
        style_debug_text(),
    ));
    lines.push(Line::styled(
        format!(
            "buffers {}  malformed {}  busy {}  starved {}",
            stats.delivered, stats.malformed, stats.contended, stats.starved
        ),
        style_muted(),
    ));
    lines.push(Line::styled(
        format!("updates {}", snapshot.updates),
        style_muted(),
    ));

    lines
}

/// Render the overlay over whatever is already drawn in `area`.
pub fn render_debug_overlay(f: &mut Frame<'_>, area: Rect, lines: Vec<Line<'static>>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style_muted())
        .title(Span::styled(" Debug ", style_debug_title()));

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::MeterConfig, meter::SharedMeter};

    #[test]
    fn labels() {
        assert_eq!(channel_label(0), "L");
        assert_eq!(channel_label(1), "R");
        assert_eq!(channel_label(4), "5");
    }

    #[test]
    fn one_line_per_channel_plus_summary() {
        let meter = SharedMeter::new(2, MeterConfig::default());
        meter.try_apply_peaks(&[0.5, 0.25]);
        let snap = meter.snapshot();
        let frame = RenderFrame::from_snapshot(&snap, 20);
        let format = StreamFormat {
            channels: 2,
            sample_rate: 48_000,
        };
        let lines = debug_lines(&snap, &frame, format, StatsSnapshot::default());
        assert_eq!(lines.len(), usize::from(debug_line_count(2)));

        let text: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        assert!(text[0].contains("48000 Hz"));
        assert!(text[1].starts_with("|- L: peak 0.500"));
        assert!(text[1].contains("-6.02 dB"));
        assert!(text[1].contains("rise"));
        assert!(text[3].contains("theme classic"));
    }

    #[test]
    fn falling_channel_is_marked() {
        let meter = SharedMeter::new(1, MeterConfig::default());
        meter.try_apply_peaks(&[1.0]);
        meter.try_apply_peaks(&[0.0]);
        let snap = meter.snapshot();
        let frame = RenderFrame::from_snapshot(&snap, 20);
        let format = StreamFormat {
            channels: 1,
            sample_rate: 44_100,
        };
        let lines = debug_lines(&snap, &frame, format, StatsSnapshot::default());
        assert!(lines[1].to_string().contains("dB fall"));
    }
}
