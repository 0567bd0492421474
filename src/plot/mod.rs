//! Terminal chart of a solved horizon.
//!
//! Series computation is always available; drawing needs the `plot` feature.

#[cfg(feature = "plot")]
mod layout;
mod series;
#[cfg(feature = "plot")]
mod style;

pub use series::{PlotSeries, Points};

use crate::error::OutputError;

/// Shows the chart until `q` or `Esc` is pressed.
///
/// Sets up the terminal (raw mode, alternate screen) and restores it on exit,
/// including when drawing fails.
///
/// # Errors
///
/// Returns `OutputError::Terminal` if the terminal cannot be driven.
#[cfg(feature = "plot")]
pub fn show(series: &PlotSeries) -> Result<(), OutputError> {
    use std::io;

    use crossterm::execute;
    use crossterm::terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    };
    use ratatui::Terminal;
    use ratatui::backend::CrosstermBackend;

    enable_raw_mode().map_err(OutputError::Terminal)?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(OutputError::Terminal(e));
    }
    let mut terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(t) => t,
        Err(e) => {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            return Err(OutputError::Terminal(e));
        }
    };

    let result = event_loop(&mut terminal, series);

    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    result.map_err(OutputError::Terminal)
}

/// Plot mode is compiled out.
///
/// # Errors
///
/// Always returns `OutputError::PlotUnavailable`.
#[cfg(not(feature = "plot"))]
pub fn show(_series: &PlotSeries) -> Result<(), OutputError> {
    Err(OutputError::PlotUnavailable)
}

/// Redraws on every event; returns on a quit key.
#[cfg(feature = "plot")]
fn event_loop<B: ratatui::backend::Backend>(
    terminal: &mut ratatui::Terminal<B>,
    series: &PlotSeries,
) -> std::io::Result<()> {
    use crossterm::event::{self, Event};

    loop {
        terminal.draw(|frame| layout::render(frame, series))?;
        if let Event::Key(key) = event::read()? {
            if is_quit_key(key) {
                return Ok(());
            }
        }
    }
}

/// `q`, `Esc` and `Ctrl-C` close the chart.
///
/// Guards on [`KeyEventKind::Press`](crossterm::event::KeyEventKind::Press)
/// to avoid double-fire on some terminals.
#[cfg(feature = "plot")]
fn is_quit_key(key: crossterm::event::KeyEvent) -> bool {
    use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};

    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

#[cfg(all(test, feature = "plot"))]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn quit_keys() {
        let press = KeyEventKind::Press;
        assert!(is_quit_key(key(KeyCode::Char('q'), KeyModifiers::NONE, press)));
        assert!(is_quit_key(key(KeyCode::Esc, KeyModifiers::NONE, press)));
        assert!(is_quit_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL, press)));
        assert!(!is_quit_key(key(KeyCode::Char('c'), KeyModifiers::NONE, press)));
        assert!(!is_quit_key(key(KeyCode::Char('x'), KeyModifiers::NONE, press)));
    }

    #[test]
    fn release_events_ignored() {
        let release = KeyEventKind::Release;
        assert!(!is_quit_key(key(KeyCode::Char('q'), KeyModifiers::NONE, release)));
    }
}
