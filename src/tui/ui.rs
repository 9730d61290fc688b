//! Main UI rendering coordinator.

use ratatui::Frame;

use super::app::{App, Tab};
use super::tabs::{markets, portfolio, trade};

/// Renders the entire application UI.
pub fn render(frame: &mut Frame, app: &App) {
    match app.active_tab {
        Tab::Markets => markets::render(frame, app),
        Tab::Trade => trade::render(frame, app),
        Tab::Portfolio => portfolio::render(frame, app),
    }
}
