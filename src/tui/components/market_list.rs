//! Market list table with filter and search.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
};
use rust_decimal::Decimal;

use crate::market::format::format_decimal;
use crate::models::MarketData;
use crate::query::{QueryKey, QueryStatus};
use crate::tui::app::{App, Focus, Mode};

use super::fallback;

/// Renders the searchable market list.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    match app.markets.status(&QueryKey::markets()) {
        QueryStatus::Loading => return fallback::render_loading(frame, area, "Markets"),
        QueryStatus::Failed(message) => {
            return fallback::render_error(frame, area, "Markets", message);
        }
        QueryStatus::Ready(_) => {}
    }

    let [search_area, table_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).areas(area);
    render_search(frame, search_area, app);

    let markets = app.visible_markets();
    let favorites = &app.settings.settings().favorites;
    let current = app.market.read(|m| m.symbol.clone());

    let rows = markets.iter().map(|m| {
        let star = if favorites.contains(&m.symbol) { "★" } else { " " };
        let mut style = Style::default();
        if m.symbol == current {
            style = style.add_modifier(Modifier::BOLD);
        }
        Row::new(vec![
            Cell::from(star).style(Style::default().fg(Color::Yellow)),
            Cell::from(m.symbol.to_string()),
            Cell::from(m.kind.label()),
            Cell::from(format_decimal(m.last_price, m.price_precision)),
            change_cell(m.change_24h),
            Cell::from(format_decimal(m.volume_24h, 0)),
            Cell::from(funding(m)),
        ])
        .style(style)
    });

    let header = Row::new(vec!["", "Market", "Type", "Last", "24h", "Volume", "Funding"])
        .style(Style::default().fg(Color::DarkGray));

    let border_style = if app.focus == Focus::MarketList {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title(format!(
            " Markets [{}] {} ",
            app.market_filter.label(),
            markets.len()
        ))
        .borders(Borders::ALL)
        .border_style(border_style);

    let table = Table::new(
        rows,
        [
            Constraint::Length(1),
            Constraint::Min(12),
            Constraint::Length(8),
            Constraint::Length(14),
            Constraint::Length(8),
            Constraint::Length(14),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().bg(Color::DarkGray))
    .highlight_symbol("> ");

    let mut state = TableState::default().with_selected(Some(app.market_index));
    frame.render_stateful_widget(table, table_area, &mut state);
}

fn render_search(frame: &mut Frame, area: Rect, app: &App) {
    let editing = app.mode == Mode::Search;
    let text = if app.search.is_empty() && !editing {
        Span::styled(
            "[/] search  [v] filter  [f] favourite  [Enter] trade",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::raw(app.search.as_str().to_string())
    };
    frame.render_widget(Paragraph::new(Line::from(vec![Span::raw(" / "), text])), area);
    if editing {
        let x = area.x.saturating_add(3).saturating_add(app.search.cursor_column());
        frame.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y));
    }
}

fn change_cell(change: Decimal) -> Cell<'static> {
    let color = if change >= Decimal::ZERO {
        Color::Green
    } else {
        Color::Red
    };
    Cell::from(format!("{:+.2}%", change)).style(Style::default().fg(color))
}

fn funding(market: &MarketData) -> String {
    market
        .funding_rate
        .map(|rate| format!("{:.4}%", rate * Decimal::ONE_HUNDRED))
        .unwrap_or_default()
}
