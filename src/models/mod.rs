//! Wire and domain models.
//!
//! Contains the streaming feed's channel definitions and request/response
//! types, the polled market and user data records, and the order vocabulary
//! shared by the order ticket and the user data views.

pub mod account;
pub mod book;
pub mod market;
pub mod order;
pub mod ticker;
pub mod trade;

use serde::{Deserialize, Serialize};

pub use market::{MarketData, MarketKind, MarketSnapshot, MarketSymbol};
pub use order::{OrderSide, OrderType, TimeInForce};

/// Public feed channels consumed by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Book,
    Ticker,
    Trades,
    Status,
    Heartbeat,
}

impl Channel {
    /// Returns the wire-format channel name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Book => "book",
            Channel::Ticker => "ticker",
            Channel::Trades => "trade",
            Channel::Status => "status",
            Channel::Heartbeat => "heartbeat",
        }
    }
}

/// A `subscribe` or `unsubscribe` request sent to the feed.
#[derive(Debug, Serialize)]
pub struct SubscriptionRequest {
    pub method: String,
    pub params: Params,
}

impl SubscriptionRequest {
    /// Builds a `subscribe` request for `channel` on `symbols`.
    pub fn subscribe(channel: Channel, symbols: &[String]) -> Self {
        Self {
            method: "subscribe".to_string(),
            params: Params::new(channel, symbols),
        }
    }

    /// Builds an `unsubscribe` request for `channel` on `symbols`.
    pub fn unsubscribe(channel: Channel, symbols: &[String]) -> Self {
        Self {
            method: "unsubscribe".to_string(),
            params: Params::new(channel, symbols),
        }
    }

    /// Sets the requested book depth (only meaningful for [`Channel::Book`]).
    pub fn with_depth(mut self, depth: u16) -> Self {
        self.params.depth = Some(depth);
        self
    }
}

/// Channel and symbol parameters used in subscribe/unsubscribe requests.
#[derive(Debug, Serialize)]
pub struct Params {
    pub channel: String,
    pub symbol: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u16>,
}

impl Params {
    fn new(channel: Channel, symbols: &[String]) -> Self {
        Self {
            channel: channel.as_str().to_string(),
            symbol: symbols.to_vec(),
            depth: None,
        }
    }
}

/// A `ping` request used to test connection liveness.
#[derive(Debug, Serialize)]
pub struct PingRequest {
    pub method: String,
}

impl PingRequest {
    pub fn new() -> Self {
        Self {
            method: "ping".to_string(),
        }
    }
}

impl Default for PingRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// System status update broadcast on the `status` channel.
#[derive(Debug, Deserialize)]
pub struct StatusUpdateResponse {
    pub channel: String,
    #[serde(rename = "type")]
    pub tpe: String,
    pub data: Vec<StatusData>,
}

/// Detailed system status information.
#[derive(Debug, Deserialize)]
pub struct StatusData {
    pub api_version: String,
    pub connection_id: u64,
    pub system: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_subscription_carries_depth() {
        let request = SubscriptionRequest::subscribe(Channel::Book, &["BTC/USD".to_string()])
            .with_depth(25);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["method"], "subscribe");
        assert_eq!(json["params"]["channel"], "book");
        assert_eq!(json["params"]["symbol"][0], "BTC/USD");
        assert_eq!(json["params"]["depth"], 25);
    }

    #[test]
    fn trade_unsubscription_omits_depth() {
        let request = SubscriptionRequest::unsubscribe(Channel::Trades, &["ETH/USD".to_string()]);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["method"], "unsubscribe");
        assert_eq!(json["params"]["channel"], "trade");
        assert!(json["params"].get("depth").is_none());
    }
}
