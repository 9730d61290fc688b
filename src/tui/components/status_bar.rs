//! Status bar component.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::tui::app::{App, ConnectionStatus, Mode};

/// Renders the status bar.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let status_color = match app.connection_status {
        ConnectionStatus::Connected => Color::Green,
        ConnectionStatus::Connecting | ConnectionStatus::Reconnecting => Color::Yellow,
        ConnectionStatus::Disconnected => Color::Red,
    };

    let heartbeat = match app.last_heartbeat {
        Some(at) => format!(" hb {}s ", at.elapsed().as_secs()),
        None => " hb -- ".to_string(),
    };

    let account = match app.address.as_deref() {
        Some(address) => Span::styled(
            format!(" {} ", shorten(address)),
            Style::default().fg(Color::Cyan),
        ),
        None => Span::styled(" No Account ", Style::default().fg(Color::DarkGray)),
    };

    let mode = match app.mode {
        Mode::Normal => Span::raw(""),
        Mode::Search => Span::styled(" SEARCH ", Style::default().fg(Color::Black).bg(Color::Yellow)),
        Mode::EditSize => Span::styled(" SIZE ", Style::default().fg(Color::Black).bg(Color::Yellow)),
    };

    let error_span = match app.error_message {
        Some(ref error) => Span::styled(
            format!(" {} ", error.message),
            Style::default().fg(Color::Red),
        ),
        None => Span::raw(""),
    };

    let line = Line::from(vec![
        mode,
        Span::styled(
            format!(" {} ", app.connection_status.label()),
            Style::default().fg(status_color),
        ),
        Span::raw("│"),
        Span::raw(heartbeat),
        Span::raw("│"),
        account,
        Span::raw("│"),
        error_span,
    ]);

    let para = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(para, area);
}

/// `0x12ab…cdef` style abbreviation for long addresses.
fn shorten(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 12 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}

#[cfg(test)]
mod tests {
    use super::shorten;

    #[test]
    fn shortens_long_addresses() {
        assert_eq!(shorten("0x1234567890abcdef"), "0x1234…cdef");
        assert_eq!(shorten("short"), "short");
    }
}
