//! Trade channel models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::OrderSide;

/// An update message from the `trade` channel.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeUpdateResponse {
    pub channel: String,
    #[serde(rename = "type")]
    pub tpe: String,
    pub data: Vec<TradeData>,
}

/// A single executed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeData {
    pub symbol: String,
    /// Aggressor side.
    pub side: OrderSide,
    pub price: Decimal,
    pub qty: Decimal,
    /// Order type that triggered this trade (e.g., `"market"`, `"limit"`).
    #[serde(default)]
    pub ord_type: String,
    pub trade_id: u64,
    pub timestamp: String,
}
