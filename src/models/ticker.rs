//! Ticker channel models.

use rust_decimal::Decimal;
use serde::Deserialize;

/// An update message from the `ticker` channel.
#[derive(Debug, Clone, Deserialize)]
pub struct TickerUpdateResponse {
    pub channel: String,
    #[serde(rename = "type")]
    pub tpe: String,
    pub data: Vec<TickerData>,
}

/// Top-of-book and 24h statistics for one market.
#[derive(Debug, Clone, Deserialize)]
pub struct TickerData {
    pub symbol: String,
    pub bid: Decimal,
    pub bid_qty: Decimal,
    pub ask: Decimal,
    pub ask_qty: Decimal,
    pub last: Decimal,
    pub volume: Decimal,
    pub vwap: Decimal,
    pub low: Decimal,
    pub high: Decimal,
    pub change: Decimal,
    pub change_pct: Decimal,
}
