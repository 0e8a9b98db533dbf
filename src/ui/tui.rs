// src/ui/tui.rs
//! Terminal setup and the render loop.

use std::{
    io::{self, Stdout},
    thread,
    time::{Duration, Instant},
};

use anyhow::Result;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event as CEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};

use crate::{app::App, audio::CaptureHandle};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Raw mode plus alternate screen for as long as this lives.
struct TerminalSession {
    terminal: Tui,
}

impl TerminalSession {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide)?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!("failed to leave raw mode: {e}");
        }
        if let Err(e) = execute!(self.terminal.backend_mut(), LeaveAlternateScreen, Show) {
            warn!("failed to restore screen: {e}");
        }
    }
}

/// Draw the meter at the configured frame rate until quit, shutdown, or the
/// capture thread exits on its own.
pub fn run(app: &mut App, capture: &CaptureHandle) -> Result<()> {
    let mut session = TerminalSession::enter()?;
    info!(source = %app.source, "render loop started");

    loop {
        let frame_start = Instant::now();

        if app.should_quit() {
            break;
        }
        if capture.is_finished() {
            info!("capture finished");
            break;
        }

        // At most one event per frame
        let mut key = None;
        if event::poll(Duration::ZERO)? {
            if let CEvent::Key(ev) = event::read()? {
                key = Some(ev);
            }
        }
        if app.step(key) {
            break;
        }

        session.terminal.draw(|f| app.draw(f))?;

        if let Some(rest) = app.frame_period().checked_sub(frame_start.elapsed()) {
            thread::sleep(rest);
        }
    }

    info!("render loop stopped");
    Ok(())
}
