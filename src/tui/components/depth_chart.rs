//! Depth chart: filled and stroked step curves of cumulative size.
//!
//! The chart is redrawn from the current ladders on every frame. Bids fill
//! the left half up to the mid price, asks the right half. Fill colours are
//! drawn first as vertical strokes down to the baseline, then the outline of
//! each side is stroked on top.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, Paragraph, Widget,
        canvas::{Canvas, Context, Line as CanvasLine},
    },
};

use crate::market::{DepthCurve, DepthView, Side};
use crate::tui::theme::DepthPalette;

/// Rows below the plot: price axis and tooltip.
pub const AXIS_ROWS: u16 = 2;

/// Headroom above the deepest level, as a fraction of it.
const Y_HEADROOM: f64 = 0.05;

/// Dot density of the plot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Resolution {
    Block,
    HalfBlock,
    #[default]
    Braille,
}

impl Resolution {
    /// Vertical dots per terminal row.
    pub fn factor(self) -> u32 {
        match self {
            Resolution::Block => 1,
            Resolution::HalfBlock => 2,
            Resolution::Braille => 4,
        }
    }

    /// Horizontal dots per terminal column.
    pub fn horizontal_factor(self) -> u32 {
        match self {
            Resolution::Block | Resolution::HalfBlock => 1,
            Resolution::Braille => 2,
        }
    }

    pub fn marker(self) -> Marker {
        match self {
            Resolution::Block => Marker::Block,
            Resolution::HalfBlock => Marker::HalfBlock,
            Resolution::Braille => Marker::Braille,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Resolution::Block => "block",
            Resolution::HalfBlock => "half",
            Resolution::Braille => "braille",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Resolution::Block => Resolution::HalfBlock,
            Resolution::HalfBlock => Resolution::Braille,
            Resolution::Braille => Resolution::Block,
        }
    }
}

/// Plot size in dots for a container of `width` x `height` cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlotGeometry {
    pub width: u32,
    pub height: u32,
}

impl PlotGeometry {
    pub fn new(width: u16, height: u16, resolution: Resolution) -> Self {
        Self {
            width: u32::from(width) * resolution.horizontal_factor(),
            height: u32::from(height.saturating_sub(AXIS_ROWS)) * resolution.factor(),
        }
    }
}

/// One filled column: the price at its centre and the depth there.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FillColumn {
    pub price: f64,
    pub side: Side,
    pub depth: f64,
}

/// Samples the step curves at `columns` evenly spaced prices in `bounds`.
///
/// Columns at or below the mid price read the bid curve, the rest read the
/// ask curve.
pub fn fill_columns(view: &DepthView, bounds: (f64, f64), columns: u32) -> Vec<FillColumn> {
    let Some(mid) = view.mid_price() else {
        return Vec::new();
    };
    let (lo, hi) = bounds;
    let span = hi - lo;
    (0..columns)
        .map(|i| {
            let price = lo + (f64::from(i) + 0.5) / f64::from(columns) * span;
            let curve = if price <= mid { &view.bids } else { &view.asks };
            FillColumn {
                price,
                side: curve.side(),
                depth: curve.value_at(price),
            }
        })
        .collect()
}

/// Depth chart widget.
pub struct DepthChart<'a> {
    view: &'a DepthView,
    palette: DepthPalette,
    resolution: Resolution,
    cursor: Option<f64>,
    price_precision: usize,
    size_precision: usize,
    block: Option<Block<'a>>,
}

impl<'a> DepthChart<'a> {
    pub fn new(view: &'a DepthView, palette: DepthPalette) -> Self {
        Self {
            view,
            palette,
            resolution: Resolution::default(),
            cursor: None,
            price_precision: 2,
            size_precision: 4,
            block: None,
        }
    }

    pub fn resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn cursor(mut self, price: Option<f64>) -> Self {
        self.cursor = price;
        self
    }

    pub fn precision(mut self, price: u32, size: u32) -> Self {
        self.price_precision = price as usize;
        self.size_precision = size as usize;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn colors(&self, side: Side) -> (Color, Color) {
        match side {
            Side::Bid => (self.palette.buy_fill, self.palette.buy_stroke),
            Side::Ask => (self.palette.sell_fill, self.palette.sell_stroke),
        }
    }

    fn paint(&self, ctx: &mut Context<'_>, bounds: (f64, f64), geometry: PlotGeometry) {
        for column in fill_columns(self.view, bounds, geometry.width) {
            if column.depth > 0.0 {
                let (fill, _) = self.colors(column.side);
                ctx.draw(&CanvasLine::new(
                    column.price,
                    0.0,
                    column.price,
                    column.depth,
                    fill,
                ));
            }
        }
        ctx.layer();

        for curve in [&self.view.bids, &self.view.asks] {
            self.stroke(ctx, curve, bounds);
        }

        if let Some(price) = self.cursor {
            ctx.layer();
            ctx.draw(&CanvasLine::new(
                price,
                0.0,
                price,
                self.view.y_max() * (1.0 + Y_HEADROOM),
                self.palette.font,
            ));
        }
    }

    fn stroke(&self, ctx: &mut Context<'_>, curve: &DepthCurve, bounds: (f64, f64)) {
        let far_edge = match curve.side() {
            Side::Bid => bounds.0,
            Side::Ask => bounds.1,
        };
        let (_, stroke) = self.colors(curve.side());
        for pair in curve.outline(far_edge).windows(2) {
            let ((x1, y1), (x2, y2)) = (pair[0], pair[1]);
            ctx.draw(&CanvasLine::new(x1, y1, x2, y2, stroke));
        }
    }

    fn axis_line(&self, bounds: (f64, f64), width: u16) -> Line<'static> {
        let p = self.price_precision;
        let lo = format!("{:.p$}", bounds.0);
        let mid = self
            .view
            .mid_price()
            .map_or_else(String::new, |m| format!("{m:.p$}"));
        let hi = format!("{:.p$}", bounds.1);
        let gap = usize::from(width).saturating_sub(lo.len() + mid.len() + hi.len()) / 2;
        Line::from(Span::styled(
            format!("{lo}{:gap$}{mid}{:gap$}{hi}", "", ""),
            Style::default().fg(self.palette.font),
        ))
    }

    fn tooltip_line(&self) -> Line<'static> {
        let Some(tip) = self.cursor.and_then(|price| self.view.tooltip_at(price)) else {
            return Line::from(Span::styled(
                "[ / ] move cursor",
                Style::default().fg(Color::DarkGray),
            ));
        };
        let (_, stroke) = self.colors(tip.side);
        Line::from(vec![
            Span::styled(
                format!("{} ", tip.side.label()),
                Style::default().fg(stroke),
            ),
            Span::styled(
                format!(
                    "{:.p$}  Total {:.s$}",
                    tip.price,
                    tip.cumulative,
                    p = self.price_precision,
                    s = self.size_precision
                ),
                Style::default().fg(self.palette.font),
            ),
        ])
    }
}

impl Widget for DepthChart<'_> {
    fn render(mut self, area: Rect, buf: &mut Buffer) {
        let area = match self.block.take() {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };

        let bounds = match self.view.x_bounds() {
            Some((lo, hi)) if hi > lo => (lo, hi),
            Some((p, _)) => (p - 1.0, p + 1.0),
            None => {
                Paragraph::new("No depth")
                    .style(Style::default().fg(Color::DarkGray))
                    .render(area, buf);
                return;
            }
        };

        let geometry = PlotGeometry::new(area.width, area.height, self.resolution);
        if geometry.height == 0 || geometry.width == 0 {
            return;
        }

        let [plot, axis, tooltip] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let y_max = (self.view.y_max() * (1.0 + Y_HEADROOM)).max(f64::EPSILON);
        Canvas::default()
            .marker(self.resolution.marker())
            .background_color(self.palette.background)
            .x_bounds([bounds.0, bounds.1])
            .y_bounds([0.0, y_max])
            .paint(|ctx| self.paint(ctx, bounds, geometry))
            .render(plot, buf);

        Paragraph::new(self.axis_line(bounds, axis.width)).render(axis, buf);
        Paragraph::new(self.tooltip_line()).render(tooltip, buf);
    }
}
