//! Live bid/ask ladders and the rung arrays derived from them.
//!
//! [`LadderBook`] applies feed snapshots and incremental updates to the two
//! sides of the viewed market and keeps them sorted (asks ascending, bids
//! descending). [`LadderBook::rungs`] turns a side into [`OrderRung`]s whose
//! cumulative size grows walking away from the best price.

use rust_decimal::Decimal;
use tracing::warn;

use super::format::format_decimal;
use crate::models::book::PriceLevel;

/// One side of an order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Side::Bid => "BID",
            Side::Ask => "ASK",
        }
    }

    /// Returns `true` if `a` is a better price than `b` on this side.
    pub fn is_better(self, a: Decimal, b: Decimal) -> bool {
        match self {
            Side::Bid => a > b,
            Side::Ask => a < b,
        }
    }
}

/// One price level of a ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderRung {
    pub price: Decimal,
    pub size: Decimal,
    /// Sum of sizes from the best price up to and including this level.
    pub cumulative: Decimal,
    /// Number of contributing orders.
    pub count: u32,
}

/// Pre-formatted text for one ladder level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLevel {
    pub price: String,
    pub size: String,
}

/// Sorted bid and ask levels for one market.
#[derive(Debug, Clone, Default)]
pub struct LadderBook {
    bids: Vec<PriceLevel>,
    asks: Vec<PriceLevel>,
    max_depth: usize,
}

impl LadderBook {
    /// Creates an empty book keeping at most `max_depth` levels per side.
    pub fn new(max_depth: usize) -> Self {
        Self {
            bids: Vec::with_capacity(max_depth),
            asks: Vec::with_capacity(max_depth),
            max_depth: max_depth.max(1),
        }
    }

    /// Removes every level from both sides.
    pub fn clear(&mut self) {
        self.bids.clear();
        self.asks.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    pub fn levels(&self, side: Side) -> &[PriceLevel] {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    /// Replaces one side wholesale.
    ///
    /// Levels with a negative price or quantity, or with zero quantity, are
    /// dropped.
    pub fn apply_snapshot(&mut self, side: Side, levels: Vec<PriceLevel>) {
        let mut levels: Vec<PriceLevel> = levels
            .into_iter()
            .filter(|l| is_valid_level(l) && l.qty > Decimal::ZERO)
            .collect();
        sort_side(side, &mut levels);
        levels.truncate(self.max_depth);
        *self.side_mut(side) = levels;
    }

    /// Applies incremental changes to one side.
    ///
    /// A level with zero quantity removes that price; any other level
    /// inserts or replaces it.
    pub fn apply_update(&mut self, side: Side, changes: Vec<PriceLevel>) {
        let max_depth = self.max_depth;
        let levels = self.side_mut(side);
        for change in changes {
            if !is_valid_level(&change) {
                warn!(price = %change.price, qty = %change.qty, "Dropping invalid price level");
                continue;
            }
            if change.qty.is_zero() {
                levels.retain(|l| l.price != change.price);
            } else if let Some(existing) = levels.iter_mut().find(|l| l.price == change.price) {
                existing.qty = change.qty;
                existing.count = change.count;
            } else {
                levels.push(change);
            }
        }
        sort_side(side, levels);
        levels.truncate(max_depth);
    }

    /// Returns the side as rungs with running cumulative size.
    pub fn rungs(&self, side: Side) -> Vec<OrderRung> {
        let mut cumulative = Decimal::ZERO;
        self.levels(side)
            .iter()
            .map(|level| {
                cumulative += level.qty;
                OrderRung {
                    price: level.price,
                    size: level.qty,
                    cumulative,
                    count: level.count.unwrap_or(1),
                }
            })
            .collect()
    }

    /// Returns the side as formatted text pairs.
    pub fn raw(&self, side: Side, price_precision: u32, size_precision: u32) -> Vec<RawLevel> {
        self.levels(side)
            .iter()
            .map(|level| RawLevel {
                price: format_decimal(level.price, price_precision),
                size: format_decimal(level.qty, size_precision),
            })
            .collect()
    }

    fn side_mut(&mut self, side: Side) -> &mut Vec<PriceLevel> {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }
}

fn is_valid_level(level: &PriceLevel) -> bool {
    level.price > Decimal::ZERO && !level.qty.is_sign_negative()
}

fn sort_side(side: Side, levels: &mut [PriceLevel]) {
    match side {
        Side::Bid => levels.sort_by(|a, b| b.price.cmp(&a.price)),
        Side::Ask => levels.sort_by(|a, b| a.price.cmp(&b.price)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn level(price: Decimal, qty: Decimal) -> PriceLevel {
        PriceLevel {
            price,
            qty,
            count: None,
        }
    }

    #[test]
    fn snapshot_sorts_each_side() {
        let mut book = LadderBook::new(10);
        book.apply_snapshot(Side::Bid, vec![level(dec!(98), dec!(2)), level(dec!(100), dec!(5))]);
        book.apply_snapshot(Side::Ask, vec![level(dec!(103), dec!(1)), level(dec!(101), dec!(4))]);

        let bids: Vec<_> = book.levels(Side::Bid).iter().map(|l| l.price).collect();
        let asks: Vec<_> = book.levels(Side::Ask).iter().map(|l| l.price).collect();
        assert_eq!(bids, vec![dec!(100), dec!(98)]);
        assert_eq!(asks, vec![dec!(101), dec!(103)]);
    }

    #[test]
    fn update_inserts_replaces_and_removes() {
        let mut book = LadderBook::new(10);
        book.apply_snapshot(Side::Bid, vec![level(dec!(100), dec!(5)), level(dec!(99), dec!(3))]);
        book.apply_update(
            Side::Bid,
            vec![
                level(dec!(99), dec!(0)),
                level(dec!(100), dec!(6)),
                level(dec!(99.5), dec!(1)),
            ],
        );

        assert_eq!(
            book.levels(Side::Bid),
            &[level(dec!(100), dec!(6)), level(dec!(99.5), dec!(1))]
        );
    }

    #[test]
    fn depth_is_capped_after_update() {
        let mut book = LadderBook::new(2);
        book.apply_snapshot(Side::Ask, vec![level(dec!(101), dec!(1)), level(dec!(102), dec!(1))]);
        book.apply_update(Side::Ask, vec![level(dec!(100.5), dec!(2))]);

        let asks: Vec<_> = book.levels(Side::Ask).iter().map(|l| l.price).collect();
        assert_eq!(asks, vec![dec!(100.5), dec!(101)]);
    }

    #[test]
    fn rejects_negative_levels() {
        let mut book = LadderBook::new(5);
        book.apply_snapshot(Side::Bid, vec![level(dec!(100), dec!(-1)), level(dec!(-3), dec!(1))]);
        book.apply_update(Side::Bid, vec![level(dec!(99), dec!(-2))]);
        assert!(book.is_empty());
    }

    #[test]
    fn rungs_accumulate_from_best_price() {
        let mut book = LadderBook::new(5);
        book.apply_snapshot(
            Side::Bid,
            vec![
                level(dec!(98), dec!(2)),
                level(dec!(100), dec!(5)),
                level(dec!(99), dec!(3)),
            ],
        );

        let rungs = book.rungs(Side::Bid);
        let cumulative: Vec<_> = rungs.iter().map(|r| r.cumulative).collect();
        assert_eq!(cumulative, vec![dec!(5), dec!(8), dec!(10)]);
        assert!(rungs.iter().all(|r| r.count == 1));
    }

    #[test]
    fn raw_levels_are_formatted() {
        let mut book = LadderBook::new(5);
        book.apply_snapshot(Side::Ask, vec![level(dec!(42155), dec!(0.75))]);
        assert_eq!(
            book.raw(Side::Ask, 1, 3),
            vec![RawLevel {
                price: "42,155.0".to_string(),
                size: "0.750".to_string(),
            }]
        );
    }
}
