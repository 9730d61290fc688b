//! Order ticket showing the order being composed.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::models::OrderSide;
use crate::store::{CurrentOrder, OrderPrice};
use crate::tui::app::{App, Focus, Mode};

/// Renders the order ticket.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let order = app.order.snapshot();
    let border_style = if app.focus == Focus::OrderTicket {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title(format!(" Order {} ", order.market))
        .borders(Borders::ALL)
        .border_style(border_style);

    let side_style = match order.side {
        OrderSide::Buy => Style::default().fg(Color::Black).bg(Color::Green),
        OrderSide::Sell => Style::default().fg(Color::Black).bg(Color::Red),
    };
    let label = Style::default().fg(Color::DarkGray);

    let price = match order.price {
        OrderPrice::Market => "MARKET".to_string(),
        OrderPrice::Limit(p) if p.is_zero() => "--".to_string(),
        OrderPrice::Limit(p) => p.to_string(),
    };

    let size_line = if app.mode == Mode::EditSize {
        Line::from(vec![
            Span::styled("Size     ", label),
            Span::styled(
                format!("{}▏", app.size_input.as_str()),
                Style::default().add_modifier(Modifier::UNDERLINED),
            ),
            Span::styled(format!(" {}", order.base), label),
        ])
    } else {
        Line::from(vec![
            Span::styled("Size     ", label),
            Span::raw(display_or_dash(&order.size_base_text)),
            Span::styled(format!(" {}", order.base), label),
        ])
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(format!(" {} ", order.side), side_style.add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            Span::styled(order.order_type.label(), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {}", order.time_in_force.label()), label),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled("Price    ", label), Span::raw(price)]),
        size_line,
        Line::from(vec![
            Span::styled("Value    ", label),
            Span::raw(display_or_dash(&order.size_quote_text)),
            Span::styled(format!(" {}", order.quote), label),
        ]),
        Line::from(""),
        flags_line(&order),
        Line::from(""),
        Line::from(Span::styled(
            "[t]ype [s]ide [i] size [x] tif [R]educe [P]ost [L] sl [T] tp [z] reset",
            label,
        )),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn flags_line(order: &CurrentOrder) -> Line<'static> {
    let flag = |name: &'static str, on: bool| {
        let style = if on {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Span::styled(format!("[{}] {name} ", if on { 'x' } else { ' ' }), style)
    };
    Line::from(vec![
        flag("Reduce", order.reduce_only),
        flag("Post", order.post_only),
        flag("SL", order.attach_stop_loss),
        flag("TP", order.attach_take_profit),
    ])
}

fn display_or_dash(text: &str) -> String {
    if text.is_empty() {
        "--".to_string()
    } else {
        text.to_string()
    }
}
