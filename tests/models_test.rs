//! Deserialization tests for the feed and data service models.

use rust_decimal_macros::dec;

use depthdesk::models::account::{OrderStatus, UserData};
use depthdesk::models::book::{BookUpdateResponse, PriceLevel};
use depthdesk::models::ticker::TickerUpdateResponse;
use depthdesk::models::trade::TradeUpdateResponse;
use depthdesk::models::{
    MarketKind, MarketSnapshot, MarketSymbol, OrderSide, OrderType, StatusUpdateResponse,
};

const BOOK_JSON: &str = include_str!("fixtures/book.json");
const TRADE_JSON: &str = include_str!("fixtures/trade.json");
const TICKER_JSON: &str = include_str!("fixtures/ticker.json");
const STATUS_JSON: &str = include_str!("fixtures/status.json");
const MARKETS_JSON: &str = include_str!("fixtures/markets.json");
const USER_DATA_JSON: &str = include_str!("fixtures/user_data.json");

#[test]
fn test_book_snapshot_deserializes() {
    let response: BookUpdateResponse = serde_json::from_str(BOOK_JSON).unwrap();

    assert!(response.is_snapshot());
    let data = &response.data[0];
    assert_eq!(data.symbol, "BTC/USD");
    assert_eq!(data.bids.len(), 3);
    assert_eq!(
        data.bids[0],
        PriceLevel {
            price: dec!(42150.5),
            qty: dec!(1.25),
            count: None,
        }
    );
    assert_eq!(data.asks[1].price, dec!(42152.5));
    assert_eq!(data.checksum, 2439117997);
}

#[test]
fn test_trade_update_deserializes() {
    let response: TradeUpdateResponse = serde_json::from_str(TRADE_JSON).unwrap();

    let trade = &response.data[0];
    assert_eq!(trade.side, OrderSide::Sell);
    assert_eq!(trade.price, dec!(42150.5));
    assert_eq!(trade.qty, dec!(0.01));
    assert_eq!(trade.trade_id, 74018295);
}

#[test]
fn test_ticker_snapshot_deserializes() {
    let response: TickerUpdateResponse = serde_json::from_str(TICKER_JSON).unwrap();

    let ticker = &response.data[0];
    assert_eq!(ticker.bid, dec!(42150.5));
    assert_eq!(ticker.ask, dec!(42151.0));
    assert_eq!(ticker.change_pct, dec!(1.47));
}

#[test]
fn test_status_update_deserializes() {
    let response: StatusUpdateResponse = serde_json::from_str(STATUS_JSON).unwrap();

    assert_eq!(response.tpe, "update");
    assert_eq!(response.data[0].system, "online");
    assert_eq!(response.data[0].api_version, "v2");
}

#[test]
fn test_market_snapshot_deserializes() {
    let snapshot: MarketSnapshot = serde_json::from_str(MARKETS_JSON).unwrap();

    let btc = &snapshot.futures[0];
    assert_eq!(btc.symbol, MarketSymbol::new("BTC-PERP"));
    assert_eq!(btc.kind, MarketKind::Futures);
    assert_eq!(btc.tick_size, dec!(0.5));
    assert_eq!(btc.funding_rate, Some(dec!(0.0001)));
    assert_eq!(btc.feed_symbol(), "BTC/USD");

    let eth = &snapshot.spot[0];
    assert_eq!(eth.kind, MarketKind::Spot);
    assert!(eth.funding_rate.is_none());
    assert!(eth.validate().is_ok());
}

#[test]
fn test_spot_market_with_funding_is_rejected() {
    let mut snapshot: MarketSnapshot = serde_json::from_str(MARKETS_JSON).unwrap();

    assert!(snapshot.spot[1].validate().is_err());
    assert_eq!(snapshot.retain_valid(), 1);
    assert_eq!(snapshot.spot.len(), 1);
    assert_eq!(snapshot.futures.len(), 1);
}

#[test]
fn test_feed_symbol_defaults_to_symbol() {
    let snapshot: MarketSnapshot = serde_json::from_str(MARKETS_JSON).unwrap();
    assert_eq!(snapshot.spot[1].feed_symbol(), "SOL-USD");
}

#[test]
fn test_user_data_deserializes() {
    let data: UserData = serde_json::from_str(USER_DATA_JSON).unwrap();

    assert_eq!(data.open_orders.len(), 2);
    assert_eq!(data.open_orders[0].order_type, OrderType::Limit);
    assert_eq!(data.open_orders[0].price, Some(dec!(42000)));
    assert_eq!(data.open_orders[1].order_type, OrderType::StopMarket);
    assert!(data.open_orders[1].price.is_none());
    assert_eq!(data.open_orders[1].filled, dec!(0));

    assert_eq!(data.order_history[0].status, OrderStatus::Filled);
    assert_eq!(data.positions[0].liquidation_price, Some(dec!(31020.5)));
}

#[test]
fn test_empty_user_data_defaults() {
    let data: UserData = serde_json::from_str("{}").unwrap();
    assert_eq!(data, UserData::default());
}

#[test]
fn test_unbounded_precision_is_rejected() {
    let mut snapshot: MarketSnapshot = serde_json::from_str(MARKETS_JSON).unwrap();
    snapshot.futures[0].price_precision = 4_000_000_000;
    assert!(snapshot.futures[0].validate().is_err());

    snapshot.futures[0].price_precision = 28;
    assert!(snapshot.futures[0].validate().is_ok());
    snapshot.spot[0].size_precision = 29;
    assert!(snapshot.spot[0].validate().is_err());

    // The funding-carrying spot record goes too.
    assert_eq!(snapshot.retain_valid(), 2);
    assert_eq!(snapshot.futures.len(), 1);
    assert!(snapshot.spot.is_empty());
}
