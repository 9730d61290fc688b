//! Order book channel models.

use rust_decimal::Decimal;
use serde::Deserialize;

/// An update message from the `book` channel.
#[derive(Debug, Clone, Deserialize)]
pub struct BookUpdateResponse {
    pub channel: String,
    /// `"snapshot"` or `"update"`.
    #[serde(rename = "type")]
    pub tpe: String,
    pub data: Vec<BookData>,
}

impl BookUpdateResponse {
    /// Returns `true` when the message replaces both sides wholesale.
    pub fn is_snapshot(&self) -> bool {
        self.tpe == "snapshot"
    }
}

/// Order book snapshot or incremental update for a single market.
#[derive(Debug, Clone, Deserialize)]
pub struct BookData {
    pub symbol: String,
    #[serde(default)]
    pub bids: Vec<PriceLevel>,
    #[serde(default)]
    pub asks: Vec<PriceLevel>,
    #[serde(default)]
    pub checksum: u64,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// A single aggregated price level.
///
/// A zero `qty` in an incremental update removes the level.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriceLevel {
    pub price: Decimal,
    pub qty: Decimal,
    /// Number of resting orders at this level, when the venue reports it.
    #[serde(default)]
    pub count: Option<u32>,
}
