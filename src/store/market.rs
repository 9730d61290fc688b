//! The market currently being viewed.

use rust_decimal::Decimal;

use super::Reducible;
use crate::market::{OrderRung, RawLevel};
use crate::models::trade::TradeData;
use crate::models::{MarketData, MarketKind, MarketSymbol};

/// Maximum number of recent trades kept, most recent first.
pub const MAX_RECENT_TRADES: usize = 100;

/// Symbol, trades and ladders of the viewed market.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentMarket {
    pub symbol: MarketSymbol,
    pub kind: MarketKind,
    pub base: String,
    pub quote: String,
    /// Most recent first.
    pub trades: Vec<TradeData>,
    /// Descending by price.
    pub bids: Vec<OrderRung>,
    /// Ascending by price.
    pub asks: Vec<OrderRung>,
    pub raw_bids: Vec<RawLevel>,
    pub raw_asks: Vec<RawLevel>,
}

impl Default for CurrentMarket {
    fn default() -> Self {
        Self {
            symbol: MarketSymbol::new("BTC-PERP"),
            kind: MarketKind::Futures,
            base: "BTC".to_string(),
            quote: "USD".to_string(),
            trades: Vec::new(),
            bids: Vec::new(),
            asks: Vec::new(),
            raw_bids: Vec::new(),
            raw_asks: Vec::new(),
        }
    }
}

impl CurrentMarket {
    pub fn best_bid(&self) -> Option<&OrderRung> {
        self.bids.first()
    }

    pub fn best_ask(&self) -> Option<&OrderRung> {
        self.asks.first()
    }

    /// Best ask minus best bid.
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()?.price - self.best_bid()?.price)
    }

    pub fn last_trade(&self) -> Option<&TradeData> {
        self.trades.first()
    }

    /// Builds the next trade list with `incoming` (oldest first, as the feed
    /// delivers them) placed in front of the current trades.
    pub fn trades_with(&self, incoming: Vec<TradeData>) -> Vec<TradeData> {
        let mut next: Vec<TradeData> = incoming.into_iter().rev().collect();
        next.extend(self.trades.iter().cloned());
        next.truncate(MAX_RECENT_TRADES);
        next
    }
}

/// Partial update of [`CurrentMarket`]. Present fields replace the stored
/// value wholesale; arrays are not merged element-wise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketPatch {
    pub symbol: Option<MarketSymbol>,
    pub kind: Option<MarketKind>,
    pub base: Option<String>,
    pub quote: Option<String>,
    pub trades: Option<Vec<TradeData>>,
    pub bids: Option<Vec<OrderRung>>,
    pub asks: Option<Vec<OrderRung>>,
    pub raw_bids: Option<Vec<RawLevel>>,
    pub raw_asks: Option<Vec<RawLevel>>,
}

impl MarketPatch {
    /// Switches the view to `market`, clearing trades and ladders in the
    /// same dispatch.
    pub fn select(market: &MarketData) -> Self {
        Self {
            symbol: Some(market.symbol.clone()),
            kind: Some(market.kind),
            base: Some(market.base.clone()),
            quote: Some(market.quote.clone()),
            trades: Some(Vec::new()),
            bids: Some(Vec::new()),
            asks: Some(Vec::new()),
            raw_bids: Some(Vec::new()),
            raw_asks: Some(Vec::new()),
        }
    }

    /// Replaces both ladders together.
    pub fn ladders(
        bids: Vec<OrderRung>,
        asks: Vec<OrderRung>,
        raw_bids: Vec<RawLevel>,
        raw_asks: Vec<RawLevel>,
    ) -> Self {
        Self {
            bids: Some(bids),
            asks: Some(asks),
            raw_bids: Some(raw_bids),
            raw_asks: Some(raw_asks),
            ..Self::default()
        }
    }

    pub fn trades(trades: Vec<TradeData>) -> Self {
        Self {
            trades: Some(trades),
            ..Self::default()
        }
    }
}

impl Reducible for CurrentMarket {
    type Patch = MarketPatch;

    fn apply(&mut self, patch: MarketPatch) {
        if let Some(symbol) = patch.symbol {
            self.symbol = symbol;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(base) = patch.base {
            self.base = base;
        }
        if let Some(quote) = patch.quote {
            self.quote = quote;
        }
        if let Some(mut trades) = patch.trades {
            trades.truncate(MAX_RECENT_TRADES);
            self.trades = trades;
        }
        if let Some(bids) = patch.bids {
            self.bids = bids;
        }
        if let Some(asks) = patch.asks {
            self.asks = asks;
        }
        if let Some(raw_bids) = patch.raw_bids {
            self.raw_bids = raw_bids;
        }
        if let Some(raw_asks) = patch.raw_asks {
            self.raw_asks = raw_asks;
        }
    }
}
