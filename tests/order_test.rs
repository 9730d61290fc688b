use rust_decimal_macros::dec;

use depthdesk::DeskError;
use depthdesk::models::OrderType;
use depthdesk::store::order::price_click;
use depthdesk::store::{CurrentOrder, OrderPatch, OrderPrice, Store};

#[test]
fn test_price_click_sets_limit_price() {
    let store: Store<CurrentOrder> = Store::default();

    let patch = price_click(&store.snapshot(), "42,150.5").unwrap().unwrap();
    store.update(patch);

    assert_eq!(store.snapshot().price, OrderPrice::Limit(dec!(42150.5)));
}

#[test]
fn test_price_click_ignored_for_market_orders() {
    let store: Store<CurrentOrder> = Store::default();
    let order = store.snapshot();
    store.update(OrderPatch::order_type(&order, OrderType::Market));

    assert!(price_click(&store.snapshot(), "42,150.5").unwrap().is_none());
    assert_eq!(store.snapshot().price, OrderPrice::Market);
}

#[test]
fn test_stop_and_profit_market_keep_sentinel() {
    for order_type in [OrderType::StopMarket, OrderType::ProfitMarket] {
        let mut order = CurrentOrder::default();
        let patch = OrderPatch::order_type(&order, order_type);
        depthdesk::store::Reducible::apply(&mut order, patch);
        assert!(price_click(&order, "100").unwrap().is_none(), "{order_type:?}");
    }
}

#[test]
fn test_negative_click_is_rejected() {
    let err = price_click(&CurrentOrder::default(), "-5").unwrap_err();
    assert!(matches!(err, DeskError::InvalidInput(_)));
}
