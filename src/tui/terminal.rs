//! Raw-mode terminal lifecycle.

use std::io::{self, IsTerminal, Stdout};

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::{DeskError, Result};

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

fn io_error(context: &str) -> impl FnOnce(io::Error) -> DeskError + '_ {
    move |e| DeskError::Io(format!("{context}: {e}"))
}

/// Enters raw mode on the alternate screen.
///
/// A panic hook is installed that leaves raw mode before the default hook
/// prints, so a panic never leaves the shell unusable.
///
/// # Errors
///
/// Returns [`DeskError::Io`] if stdout is not a TTY or the terminal cannot
/// be switched.
pub fn setup_terminal() -> Result<Tui> {
    if !io::stdout().is_terminal() {
        return Err(DeskError::Io("depthdesk needs an interactive terminal".to_string()));
    }

    enable_raw_mode().map_err(io_error("enable raw mode"))?;

    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(io_error("enter alternate screen")(e));
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        previous(info);
    }));

    Terminal::new(CrosstermBackend::new(stdout)).map_err(|e| {
        let _ = disable_raw_mode();
        io_error("create terminal")(e)
    })
}

/// Leaves raw mode and the alternate screen.
///
/// # Errors
///
/// Returns [`DeskError::Io`] if the terminal cannot be restored.
pub fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().map_err(io_error("disable raw mode"))?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .map_err(io_error("leave alternate screen"))?;
    terminal.show_cursor().map_err(io_error("show cursor"))?;
    Ok(())
}
