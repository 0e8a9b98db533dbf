// src/app/state.rs
//! Application state management.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use crossterm::event::{KeyEvent, KeyEventKind};
use ratatui::{
    text::Span,
    widgets::{Block, Borders},
    Frame,
};
use tracing::debug;

use crate::{
    audio::{DeliveryStats, StreamFormat},
    meter::{MeterSnapshot, RenderFrame, SharedMeter},
    ui::{
        keybindings::{key_to_action, MeterAction},
        layout::compute_layout,
        theme::{style_border, style_title},
        widgets::{debug_line_count, debug_lines, render_debug_overlay, render_status_bar, VuMeter},
    },
};

/// Render-side state. Owns a private snapshot of the shared meter so drawing
/// never holds the lock.
pub struct App {
    /// Handle to the state the capture thread updates
    pub meter: SharedMeter,
    /// Last copy taken by [`App::refresh`]
    pub snapshot: MeterSnapshot,
    /// Bar geometry, rebuilt every draw
    pub frame: RenderFrame,
    /// Delivery counters for the debug overlay
    pub stats: Arc<DeliveryStats>,
    /// Format of the running capture
    pub format: StreamFormat,
    /// What is being metered, for the title and footer
    pub source: String,
    shutdown: Arc<AtomicBool>,
}

impl App {
    pub fn new(
        meter: SharedMeter,
        stats: Arc<DeliveryStats>,
        format: StreamFormat,
        source: String,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        let snapshot = meter.snapshot();
        Self {
            meter,
            snapshot,
            frame: RenderFrame::new(),
            stats,
            format,
            source,
            shutdown,
        }
    }

    /// Handle a key event and return true if the app should quit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        let action = key_to_action(&key);

        let config = match action {
            MeterAction::SensitivityUp => self.meter.update_config(|c| c.adjust_sensitivity(1)),
            MeterAction::SensitivityDown => self.meter.update_config(|c| c.adjust_sensitivity(-1)),
            MeterAction::NoiseReductionUp => {
                self.meter.update_config(|c| c.adjust_noise_reduction(1))
            }
            MeterAction::NoiseReductionDown => {
                self.meter.update_config(|c| c.adjust_noise_reduction(-1))
            }
            MeterAction::CycleTheme => self.meter.update_config(|c| c.cycle_theme()),
            MeterAction::ToggleDebug => self.meter.update_config(|c| c.toggle_debug()),
            MeterAction::Quit => {
                debug!("quit requested");
                self.shutdown.store(true, Ordering::Release);
                return true;
            }
            MeterAction::None => return false,
        };

        debug!(
            ?action,
            sensitivity = config.sensitivity,
            noise_reduction = config.noise_reduction,
            theme = config.color_theme.name(),
            "config changed"
        );
        self.snapshot.config = config;
        false
    }

    /// One render tick before drawing: apply the pending key, if any, then
    /// take the snapshot. Returns true if the app should quit.
    pub fn step(&mut self, key: Option<KeyEvent>) -> bool {
        if let Some(key) = key {
            if key.kind == KeyEventKind::Press && self.on_key(key) {
                return true;
            }
        }
        self.refresh();
        false
    }

    /// Pull the latest meter state into the private snapshot.
    pub fn refresh(&mut self) {
        self.meter.snapshot_into(&mut self.snapshot);
    }

    /// Draw the application UI.
    pub fn draw(&mut self, f: &mut Frame<'_>) {
        let config = self.snapshot.config;
        let debug_rows = debug_line_count(self.snapshot.channels.len());
        let layout = compute_layout(f.area(), config.show_debug, debug_rows);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(style_border())
            .title(Span::styled(format!(" vumz | {} ", self.source), style_title()));
        let inner = block.inner(layout.meter_area);
        f.render_widget(block, layout.meter_area);

        self.frame.rebuild(&self.snapshot, inner.height);
        f.render_widget(
            VuMeter::new(&self.frame, config.bar_width, config.color_theme),
            inner,
        );

        render_status_bar(f, layout.status_area, &config, &self.source);

        if let Some(area) = layout.debug_area {
            let lines = debug_lines(&self.snapshot, &self.frame, self.format, self.stats.snapshot());
            render_debug_overlay(f, area, lines);
        }
    }

    /// Time between redraws at the configured frame rate.
    pub fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.snapshot.config.frame_rate.max(1)))
    }

    pub fn should_quit(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColorTheme, MeterConfig};
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn app(channels: usize) -> App {
        let meter = SharedMeter::new(channels, MeterConfig::default());
        App::new(
            meter,
            Arc::new(DeliveryStats::default()),
            StreamFormat {
                channels: channels as u16,
                sample_rate: 44_100,
            },
            "test".to_string(),
            Arc::new(AtomicBool::new(false)),
        )
    }

    fn press(app: &mut App, c: char) -> bool {
        app.on_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn keys_edit_shared_config() {
        let mut app = app(2);
        assert!(!press(&mut app, '+'));
        assert!(!press(&mut app, ']'));
        assert!(!press(&mut app, 't'));

        let cfg = app.meter.config();
        assert!((cfg.sensitivity - 1.1).abs() < 1e-9);
        assert!((cfg.noise_reduction - 0.82).abs() < 1e-9);
        assert_eq!(cfg.color_theme, ColorTheme::Mono);
        assert_eq!(app.snapshot.config, cfg);
    }

    #[test]
    fn quit_sets_shutdown() {
        let mut app = app(1);
        assert!(!app.should_quit());
        assert!(press(&mut app, 'q'));
        assert!(app.should_quit());
    }

    #[test]
    fn key_edit_shows_in_the_same_frame() {
        let mut app = app(2);
        app.meter.try_apply_peaks(&[0.5, 0.5]);

        let key = KeyEvent::new(KeyCode::Char('+'), KeyModifiers::NONE);
        assert!(!app.step(Some(key)));
        assert_eq!(app.snapshot.updates, 1);

        let mut terminal = Terminal::new(TestBackend::new(80, 10)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        let footer: String = (0..80)
            .map(|x| terminal.backend().buffer()[(x, 9)].symbol().to_string())
            .collect();
        assert!(footer.contains("sens 1.1"), "footer: {footer}");
    }

    #[test]
    fn step_quits_on_q() {
        let mut app = app(1);
        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(app.step(Some(key)));
        assert!(app.should_quit());
    }

    #[test]
    fn frame_period_follows_frame_rate() {
        let mut app = app(1);
        app.meter.update_config(|c| c.set_frame_rate(50));
        app.refresh();
        assert_eq!(app.frame_period(), Duration::from_millis(20));
    }

    #[test]
    fn draws_bars_inside_the_panel() {
        let mut app = app(2);
        app.meter.try_apply_peaks(&[1.0, 1.0]);
        app.refresh();

        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();

        // 12 rows minus footer and borders
        assert_eq!(app.frame.total_rows, 9);
        let buf = terminal.backend().buffer();
        let drawn = buf.content().iter().filter(|c| c.symbol() == "█").count();
        assert!(drawn > 0);
    }

    #[test]
    fn debug_overlay_shows_when_toggled() {
        let mut app = app(2);
        press(&mut app, 'd');
        app.refresh();

        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Debug"));
        assert!(text.contains("44100 Hz"));
    }
}
