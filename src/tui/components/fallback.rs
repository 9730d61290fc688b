//! Placeholder panels for queries that have not produced data.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Error panel shown in place of a widget whose query failed with nothing
/// cached. The user clears it with `r`.
pub fn render_error(frame: &mut Frame, area: Rect, title: &str, message: &str) {
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let lines = vec![
        Line::from(Span::styled(
            "Failed to load",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "[r] reset and retry",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let para = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    // Centre vertically once wrapped.
    let used = u16::try_from(para.line_count(inner.width)).unwrap_or(u16::MAX);
    let top = inner.height.saturating_sub(used) / 2;
    let body = Rect {
        y: inner.y + top,
        height: inner.height - top,
        ..inner
    };
    frame.render_widget(para, body);
}

pub fn render_loading(frame: &mut Frame, area: Rect, title: &str) {
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let para = Paragraph::new("Loading...")
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(para, area);
}
