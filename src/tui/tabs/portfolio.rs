//! Portfolio tab: positions, open orders and order history for the
//! connected address.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table},
};
use rust_decimal::Decimal;

use crate::models::OrderSide;
use crate::models::account::UserData;
use crate::query::QueryStatus;
use crate::tui::app::App;
use crate::tui::components::{fallback, status_bar, tab_bar};

/// Renders the portfolio tab.
pub fn render(frame: &mut Frame, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
            Constraint::Min(6),    // Content
            Constraint::Length(1), // Keybindings help
        ])
        .split(frame.area());

    tab_bar::render(frame, layout[0], app);
    status_bar::render(frame, layout[1], app);

    match app.user_data_status() {
        None => {
            let para = Paragraph::new("No account connected. Set DEPTHDESK_ADDRESS and DEPTHDESK_USER_URL.")
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().title(" Portfolio ").borders(Borders::ALL));
            frame.render_widget(para, layout[2]);
        }
        Some(QueryStatus::Loading) => fallback::render_loading(frame, layout[2], "Portfolio"),
        Some(QueryStatus::Failed(message)) => {
            fallback::render_error(frame, layout[2], "Portfolio", message);
        }
        Some(QueryStatus::Ready(data)) => render_user_data(frame, layout[2], data),
    }

    let help = "[r]retry [D]theme [Tab]switch tab [q]quit";
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        layout[3],
    );
}

fn render_user_data(frame: &mut Frame, area: Rect, data: &UserData) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    render_positions(frame, sections[0], data);
    render_open_orders(frame, sections[1], data);
    render_history(frame, sections[2], data);
}

fn side_style(side: OrderSide) -> Style {
    match side {
        OrderSide::Buy => Style::default().fg(Color::Green),
        OrderSide::Sell => Style::default().fg(Color::Red),
    }
}

fn section(title: &str, count: usize) -> Block<'static> {
    Block::default()
        .title(format!(" {title} ({count}) "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

fn header(cells: Vec<&'static str>) -> Row<'static> {
    Row::new(cells).style(Style::default().fg(Color::DarkGray))
}

fn render_positions(frame: &mut Frame, area: Rect, data: &UserData) {
    let rows = data.positions.iter().map(|p| {
        let pnl_color = if p.unrealized_pnl >= Decimal::ZERO {
            Color::Green
        } else {
            Color::Red
        };
        Row::new(vec![
            Line::from(p.symbol.to_string()),
            Line::from(Span::styled(p.side.to_string(), side_style(p.side))),
            Line::from(p.size.to_string()),
            Line::from(p.entry_price.to_string()),
            Line::from(p.mark_price.to_string()),
            Line::from(Span::styled(
                format!("{:+}", p.unrealized_pnl),
                Style::default().fg(pnl_color),
            )),
            Line::from(
                p.liquidation_price
                    .map(|l| l.to_string())
                    .unwrap_or_else(|| "--".to_string()),
            ),
        ])
    });
    let table = Table::new(rows, [Constraint::Ratio(1, 7); 7])
        .header(header(vec![
            "Market", "Side", "Size", "Entry", "Mark", "PnL", "Liq.",
        ]))
        .block(section("Positions", data.positions.len()));
    frame.render_widget(table, area);
}

fn render_open_orders(frame: &mut Frame, area: Rect, data: &UserData) {
    let rows = data.open_orders.iter().map(|o| {
        Row::new(vec![
            Line::from(o.symbol.to_string()),
            Line::from(Span::styled(o.side.to_string(), side_style(o.side))),
            Line::from(o.order_type.label()),
            Line::from(
                o.price
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "MARKET".to_string()),
            ),
            Line::from(format!("{}/{}", o.filled, o.size)),
            Line::from(o.created_at.clone()),
        ])
    });
    let table = Table::new(rows, [Constraint::Ratio(1, 6); 6])
        .header(header(vec!["Market", "Side", "Type", "Price", "Filled", "Created"]))
        .block(section("Open Orders", data.open_orders.len()));
    frame.render_widget(table, area);
}

fn render_history(frame: &mut Frame, area: Rect, data: &UserData) {
    let rows = data.order_history.iter().map(|o| {
        Row::new(vec![
            Line::from(o.symbol.to_string()),
            Line::from(Span::styled(o.side.to_string(), side_style(o.side))),
            Line::from(o.order_type.label()),
            Line::from(
                o.avg_price
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "--".to_string()),
            ),
            Line::from(o.size.to_string()),
            Line::from(o.status.label()),
            Line::from(o.updated_at.clone()),
        ])
    });
    let table = Table::new(rows, [Constraint::Ratio(1, 7); 7])
        .header(header(vec![
            "Market", "Side", "Type", "Avg Price", "Size", "Status", "Updated",
        ]))
        .block(section("Order History", data.order_history.len()));
    frame.render_widget(table, area);
}
