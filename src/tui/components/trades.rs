//! Recent trades list.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::market::format::format_decimal;
use crate::models::OrderSide;
use crate::store::CurrentMarket;

/// Renders the most recent trades, newest first.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    market: &CurrentMarket,
    price_precision: u32,
    size_precision: u32,
) {
    let block = Block::default()
        .title(" Trades ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = vec![Line::from(Span::styled(
        format!("{:>12} {:>10} {:>9}", "Price", "Size", "Time"),
        Style::default().fg(Color::DarkGray),
    ))];

    for trade in market
        .trades
        .iter()
        .take(inner.height.saturating_sub(1) as usize)
    {
        let color = match trade.side {
            OrderSide::Buy => Color::Green,
            OrderSide::Sell => Color::Red,
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:>12} ", format_decimal(trade.price, price_precision)),
                Style::default().fg(color),
            ),
            Span::raw(format!(
                "{:>10} ",
                format_decimal(trade.qty, size_precision)
            )),
            Span::styled(
                format!("{:>9}", extract_time(&trade.timestamp)),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    if market.trades.is_empty() {
        lines.push(Line::from(Span::styled(
            "No trades",
            Style::default().fg(Color::DarkGray),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Extracts `HH:MM:SS` from an RFC3339 timestamp.
fn extract_time(timestamp: &str) -> &str {
    match timestamp.split_once('T') {
        Some((_, time)) => {
            let end = time.find(['.', 'Z', '+']).unwrap_or(time.len()).min(8);
            &time[..end]
        }
        None => timestamp,
    }
}

#[cfg(test)]
mod tests {
    use super::extract_time;

    #[test]
    fn extracts_clock_time() {
        assert_eq!(extract_time("2024-01-15T12:34:56.789Z"), "12:34:56");
        assert_eq!(extract_time("2024-01-15T12:34:56Z"), "12:34:56");
        assert_eq!(extract_time("12:00"), "12:00");
    }
}
