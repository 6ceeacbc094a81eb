//! Terminal setup and the interactive event loop.

use std::io::{self, stdout, Stdout};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use super::app::{App, UiOptions};
use crate::controller::{ControllerEvent, TranslationController};

const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Initialize terminal for TUI mode.
pub fn init_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore terminal from TUI mode.
pub fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

/// Run the interactive UI until the user quits.
///
/// The session is ended on the way out, so a request still in flight is
/// cancelled. The terminal is restored even when the loop fails.
pub async fn run_interactive(
    controller: TranslationController,
    events: mpsc::UnboundedReceiver<ControllerEvent>,
    options: UiOptions,
) -> io::Result<()> {
    let mut terminal = init_terminal()?;
    let mut app = App::new(controller.clone(), events, options);

    let result = event_loop(&mut terminal, &mut app).await;

    controller.end_session();
    let restored = restore_terminal(&mut terminal);
    result.and(restored)
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        app.sync();
        terminal.draw(|frame| app.render(frame))?;
        app.on_frame_committed(Instant::now());

        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
        if app.should_quit() {
            tracing::debug!("leaving interactive mode");
            return Ok(());
        }

        tokio::time::sleep(FRAME_INTERVAL).await;
    }
}
