//! Drives the app state through feed and poll messages the way the main
//! loop does.

use rust_decimal_macros::dec;

use depthdesk::feed::{FeedCommand, PollCommand};
use depthdesk::market::Side;
use depthdesk::models::MarketSnapshot;
use depthdesk::models::book::BookUpdateResponse;
use depthdesk::models::trade::TradeUpdateResponse;
use depthdesk::settings::SettingsStore;
use depthdesk::store::OrderPrice;
use depthdesk::tui::app::{BookCursor, Tab};
use depthdesk::tui::theme::ThemeVars;
use depthdesk::tui::{Action, App, Message, update};

const BOOK_JSON: &str = include_str!("fixtures/book.json");
const TRADE_JSON: &str = include_str!("fixtures/trade.json");
const MARKETS_JSON: &str = include_str!("fixtures/markets.json");

fn app(dir: &tempfile::TempDir) -> App {
    let settings = SettingsStore::load(dir.path().join("settings.json")).unwrap();
    App::new(settings, ThemeVars::default(), None, 25)
}

fn loaded_app(dir: &tempfile::TempDir) -> App {
    let mut app = app(dir);
    let mut snapshot: MarketSnapshot = serde_json::from_str(MARKETS_JSON).unwrap();
    snapshot.retain_valid();
    update(&mut app, Message::Markets(Ok(snapshot)));
    let book: BookUpdateResponse = serde_json::from_str(BOOK_JSON).unwrap();
    update(&mut app, Message::Book(book));
    app
}

#[test]
fn test_first_market_load_points_feed_at_default() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(&dir);
    let snapshot: MarketSnapshot = serde_json::from_str(MARKETS_JSON).unwrap();

    let action = update(&mut app, Message::Markets(Ok(snapshot.clone())));
    assert_eq!(
        action,
        Some(Action::Feed(FeedCommand::Watch("BTC/USD".to_string())))
    );
    // Later refreshes leave the feed alone.
    assert_eq!(update(&mut app, Message::Markets(Ok(snapshot))), None);
}

#[test]
fn test_book_snapshot_fills_both_ladders() {
    let dir = tempfile::tempdir().unwrap();
    let app = loaded_app(&dir);

    let market = app.market.snapshot();
    assert_eq!(market.bids.len(), 3);
    assert_eq!(market.asks.len(), 2);
    assert_eq!(market.bids[2].cumulative, dec!(4.75));
    assert_eq!(market.raw_bids[0].price, "42,150.5");
    assert_eq!(market.spread(), Some(dec!(0.5)));
}

#[test]
fn test_book_for_other_symbol_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(&dir);
    app.feed_symbol = Some("ETH/USD".to_string());

    let book: BookUpdateResponse = serde_json::from_str(BOOK_JSON).unwrap();
    update(&mut app, Message::Book(book));

    assert!(app.market.snapshot().bids.is_empty());
}

#[test]
fn test_clicking_book_row_fills_ticket() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = loaded_app(&dir);
    app.set_tab(Tab::Trade);

    app.move_book_cursor(true);
    assert_eq!(
        app.book_cursor,
        Some(BookCursor {
            side: Side::Bid,
            index: 0
        })
    );
    app.click_selected_row();

    assert_eq!(app.order.snapshot().price, OrderPrice::Limit(dec!(42150.5)));
}

#[test]
fn test_size_commit_uses_limit_price() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = loaded_app(&dir);
    app.click_price("42,150.5");

    for c in "2".chars() {
        app.size_input.insert(c);
    }
    app.commit_size();

    let order = app.order.snapshot();
    assert_eq!(order.size_base_text, "2.000");
    assert_eq!(order.size_quote, dec!(84301.0));
    assert_eq!(order.size_quote_text, "84,301.0");
    assert!(app.size_input.is_empty());
}

#[test]
fn test_last_trade_click() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = loaded_app(&dir);
    let trades: TradeUpdateResponse = serde_json::from_str(TRADE_JSON).unwrap();
    update(&mut app, Message::Trade(trades));

    app.click_last_price();

    assert_eq!(app.order.snapshot().price, OrderPrice::Limit(dec!(42150.5)));
}

#[test]
fn test_failed_first_load_shows_panel_then_retries() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = app(&dir);

    update(&mut app, Message::Markets(Err("connection refused".to_string())));
    assert!(app.error_message.is_none());

    let action = app.reset_query();
    assert_eq!(action, Some(Action::Poll(PollCommand::Refresh)));
}
