//! Order book ladder with depth bars.

use std::ops::Range;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Widget},
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::market::format::format_decimal;
use crate::market::{OrderRung, Side};
use crate::tui::app::BookCursor;

/// One rendered ladder row.
#[derive(Debug, Clone, PartialEq)]
pub struct BookRow {
    pub side: Side,
    pub price: String,
    pub size: String,
    pub total: String,
    /// Cumulative size as a percentage of the side's largest total, 0 to 100.
    pub depth_pct: f64,
}

/// Maps rungs to display rows, keeping their order.
///
/// Bars are scaled against the largest cumulative total on this side; a
/// side whose totals are all zero gets empty bars.
pub fn book_rows(
    rungs: &[OrderRung],
    side: Side,
    price_precision: u32,
    size_precision: u32,
) -> Vec<BookRow> {
    let max_total = rungs
        .iter()
        .map(|r| r.cumulative)
        .max()
        .unwrap_or(Decimal::ZERO);

    rungs
        .iter()
        .map(|rung| BookRow {
            side,
            price: format_decimal(rung.price, price_precision),
            size: format_decimal(rung.size, size_precision),
            total: format_decimal(rung.cumulative, size_precision),
            depth_pct: depth_pct(rung.cumulative, max_total),
        })
        .collect()
}

fn depth_pct(total: Decimal, max_total: Decimal) -> f64 {
    if max_total <= Decimal::ZERO || total <= Decimal::ZERO {
        return 0.0;
    }
    let pct = (total / max_total * Decimal::ONE_HUNDRED)
        .to_f64()
        .unwrap_or(0.0);
    pct.clamp(0.0, 100.0)
}

/// Two-sided ladder: asks above the spread (best ask lowest), bids below.
pub struct OrderBookView<'a> {
    bids: &'a [BookRow],
    asks: &'a [BookRow],
    spread: Option<String>,
    cursor: Option<BookCursor>,
    bid_style: (Color, Color),
    ask_style: (Color, Color),
    block: Option<Block<'a>>,
}

impl<'a> OrderBookView<'a> {
    pub fn new(bids: &'a [BookRow], asks: &'a [BookRow]) -> Self {
        Self {
            bids,
            asks,
            spread: None,
            cursor: None,
            bid_style: (Color::Green, Color::Rgb(14, 60, 40)),
            ask_style: (Color::Red, Color::Rgb(70, 20, 24)),
            block: None,
        }
    }

    pub fn spread(mut self, spread: Option<String>) -> Self {
        self.spread = spread;
        self
    }

    pub fn cursor(mut self, cursor: Option<BookCursor>) -> Self {
        self.cursor = cursor;
        self
    }

    /// Text and bar colours per side.
    pub fn colors(mut self, bid: (Color, Color), ask: (Color, Color)) -> Self {
        self.bid_style = bid;
        self.ask_style = ask;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn visible(&self, side: Side, rows: usize) -> Range<usize> {
        let len = match side {
            Side::Bid => self.bids.len(),
            Side::Ask => self.asks.len(),
        };
        let cursor = self.cursor.filter(|c| c.side == side).map(|c| c.index);
        visible_rows(len, rows, cursor)
    }

    fn draw_row(&self, buf: &mut Buffer, area: Rect, y: u16, row: &BookRow, index: usize) {
        let (text_color, bar_color) = match row.side {
            Side::Bid => self.bid_style,
            Side::Ask => self.ask_style,
        };

        // Bar first, growing from the right edge; text is drawn over it.
        let bar_width = bar_width(area.width, row.depth_pct);
        for x in (area.right() - bar_width)..area.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_bg(bar_color);
            }
        }

        let selected = self
            .cursor
            .is_some_and(|c| c.side == row.side && c.index == index);
        let mut style = Style::default().fg(text_color);
        if selected {
            style = style.add_modifier(Modifier::REVERSED);
        }

        let col = usize::from(area.width / 3);
        let line = format!(
            "{:<col$}{:>col$}{:>rest$}",
            row.price,
            row.size,
            row.total,
            rest = usize::from(area.width).saturating_sub(col * 2)
        );
        buf.set_stringn(area.x, y, &line, usize::from(area.width), style);
        if !selected {
            // Size and total in the default foreground.
            buf.set_style(
                Rect::new(area.x + col as u16, y, area.width - col as u16, 1),
                Style::default().fg(Color::Reset),
            );
        }
    }
}

/// Rows of one side that fit in `rows` lines, scrolled outward just far
/// enough to keep `cursor` on screen.
fn visible_rows(len: usize, rows: usize, cursor: Option<usize>) -> Range<usize> {
    let shown = len.min(rows);
    let start = match cursor {
        Some(index) if index >= shown => (index + 1 - shown).min(len - shown),
        _ => 0,
    };
    start..start + shown
}

fn bar_width(width: u16, pct: f64) -> u16 {
    let cells = (f64::from(width) * pct / 100.0).round();
    (cells.clamp(0.0, f64::from(width))) as u16
}

impl Widget for OrderBookView<'_> {
    fn render(mut self, area: Rect, buf: &mut Buffer) {
        let area = match self.block.take() {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };
        if area.height < 3 || area.width < 9 {
            return;
        }

        let col = usize::from(area.width / 3);
        let header = format!(
            "{:<col$}{:>col$}{:>rest$}",
            "Price",
            "Size",
            "Total",
            rest = usize::from(area.width).saturating_sub(col * 2)
        );
        buf.set_stringn(
            area.x,
            area.y,
            &header,
            usize::from(area.width),
            Style::default().fg(Color::DarkGray),
        );

        let body = area.height - 2;
        let per_side = usize::from(body / 2);
        let mut y = area.y + 1;

        // Asks: furthest visible at the top, best ask just above the spread.
        let asks = self.visible(Side::Ask, per_side);
        y += (per_side - asks.len()) as u16;
        for index in asks.rev() {
            self.draw_row(buf, area, y, &self.asks[index], index);
            y += 1;
        }

        let spread = self.spread.as_deref().unwrap_or("--");
        buf.set_stringn(
            area.x,
            y,
            format!("{:^width$}", format!("Spread {spread}"), width = usize::from(area.width)),
            usize::from(area.width),
            Style::default().fg(Color::DarkGray),
        );
        y += 1;

        for index in self.visible(Side::Bid, per_side) {
            self.draw_row(buf, area, y, &self.bids[index], index);
            y += 1;
        }
    }
}
