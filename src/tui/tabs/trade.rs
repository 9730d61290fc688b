//! Trade tab layout: ladder, depth chart, order ticket and trades.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use rust_decimal::Decimal;

use crate::market::format::format_decimal;
use crate::market::{DepthView, Side};
use crate::query::{QueryKey, QueryStatus};
use crate::store::CurrentMarket;
use crate::tui::app::{App, Focus};
use crate::tui::components::depth_chart::DepthChart;
use crate::tui::components::orderbook::{OrderBookView, book_rows};
use crate::tui::components::{fallback, order_ticket, status_bar, tab_bar, trades};

/// Renders the trade tab.
pub fn render(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Ticker header
            Constraint::Min(12),   // Book | depth | ticket
            Constraint::Length(8), // Trades
            Constraint::Length(1), // Keybindings help
        ])
        .split(frame.area());

    tab_bar::render(frame, main_layout[0], app);
    status_bar::render(frame, main_layout[1], app);

    // One snapshot per frame so every panel draws the same dispatch.
    let market = app.market.snapshot();
    let (price_precision, size_precision) = app.precision();

    render_ticker_header(frame, main_layout[2], app, &market, price_precision);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(40),
            Constraint::Percentage(25),
        ])
        .split(main_layout[3]);

    if let QueryStatus::Failed(message) = app.markets.status(&QueryKey::markets()) {
        fallback::render_error(frame, columns[0], "Order Book", message);
    } else {
        render_orderbook(frame, columns[0], app, &market, price_precision, size_precision);
    }
    render_depth(frame, columns[1], app, &market, price_precision, size_precision);
    order_ticket::render(frame, columns[2], app);

    trades::render(
        frame,
        main_layout[4],
        &market,
        price_precision,
        size_precision,
    );

    let help = "[j/k]row [Enter]click price [p]last price [[/]]depth cursor [g]resolution [h/l]focus [Z]reset market [Tab]switch tab [q]quit";
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        main_layout[5],
    );
}

fn render_ticker_header(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    market: &CurrentMarket,
    price_precision: u32,
) {
    let title = Span::styled(
        format!(" {} ", market.symbol),
        Style::default().add_modifier(Modifier::BOLD),
    );

    let content = match app.ticker.as_ref() {
        Some(t) => {
            let change_color = if t.change >= Decimal::ZERO {
                Color::Green
            } else {
                Color::Red
            };
            let arrow = if t.change >= Decimal::ZERO { "▲" } else { "▼" };
            Line::from(vec![
                title,
                Span::styled(arrow, Style::default().fg(change_color)),
                Span::styled(
                    format!(" {} ", format_decimal(t.last, price_precision)),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("Bid: "),
                Span::styled(
                    format!("{} ", format_decimal(t.bid, price_precision)),
                    Style::default().fg(Color::Green),
                ),
                Span::raw("Ask: "),
                Span::styled(
                    format!("{} ", format_decimal(t.ask, price_precision)),
                    Style::default().fg(Color::Red),
                ),
                Span::styled(
                    format!("{:+.2}% ", t.change_pct),
                    Style::default().fg(change_color),
                ),
                Span::raw(format!(
                    "H {} L {}",
                    format_decimal(t.high, price_precision),
                    format_decimal(t.low, price_precision)
                )),
            ])
        }
        None => Line::from(vec![
            title,
            Span::styled(" -- ", Style::default().fg(Color::DarkGray)),
        ]),
    };

    let para = Paragraph::new(content).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(para, area);
}

fn panel(title: String, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

fn render_orderbook(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    market: &CurrentMarket,
    price_precision: u32,
    size_precision: u32,
) {
    let palette = app.palette();
    let bids = book_rows(&market.bids, Side::Bid, price_precision, size_precision);
    let asks = book_rows(&market.asks, Side::Ask, price_precision, size_precision);
    let spread = market
        .spread()
        .map(|s| format_decimal(s, price_precision));

    let view = OrderBookView::new(&bids, &asks)
        .spread(spread)
        .cursor(app.book_cursor)
        .colors(
            (palette.buy_stroke, palette.buy_fill),
            (palette.sell_stroke, palette.sell_fill),
        )
        .block(panel(
            " Order Book ".to_string(),
            app.focus == Focus::OrderBook,
        ));
    frame.render_widget(view, area);
}

fn render_depth(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    market: &CurrentMarket,
    price_precision: u32,
    size_precision: u32,
) {
    let block = panel(
        format!(" Depth [{}] ", app.resolution.label()),
        app.focus == Focus::DepthChart,
    );
    match DepthView::from_ladders(&market.bids, &market.asks) {
        Ok(view) => {
            let chart = DepthChart::new(&view, app.palette())
                .resolution(app.resolution)
                .cursor(app.depth_cursor)
                .precision(price_precision, size_precision)
                .block(block);
            frame.render_widget(chart, area);
        }
        Err(e) => {
            let para = Paragraph::new(e.to_string())
                .style(Style::default().fg(Color::Red))
                .block(block);
            frame.render_widget(para, area);
        }
    }
}
