//! Markets tab layout.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
};

use crate::tui::app::App;
use crate::tui::components::{market_list, status_bar, tab_bar};

/// Renders the markets tab.
pub fn render(frame: &mut Frame, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
            Constraint::Min(5),    // Market list
            Constraint::Length(1), // Keybindings help
        ])
        .split(frame.area());

    tab_bar::render(frame, layout[0], app);
    status_bar::render(frame, layout[1], app);
    market_list::render(frame, layout[2], app);

    let help = "[j/k]move [Enter]trade [/]search [v]filter [f]avourite [r]retry [D]theme [Tab]switch tab [q]quit";
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        layout[3],
    );
}
