use rust_decimal_macros::dec;

use depthdesk::DeskError;
use depthdesk::market::{DepthCurve, DepthView, LadderBook, Side};
use depthdesk::models::book::PriceLevel;

fn level(price: rust_decimal::Decimal, qty: rust_decimal::Decimal) -> PriceLevel {
    PriceLevel {
        price,
        qty,
        count: None,
    }
}

fn book() -> LadderBook {
    let mut book = LadderBook::new(25);
    book.apply_snapshot(
        Side::Bid,
        vec![level(dec!(98), dec!(2)), level(dec!(100), dec!(5)), level(dec!(99), dec!(3))],
    );
    book.apply_snapshot(
        Side::Ask,
        vec![level(dec!(102), dec!(4)), level(dec!(101), dec!(2))],
    );
    book
}

#[test]
fn test_bid_curve_steps_outward() {
    let book = book();
    let view = DepthView::from_ladders(&book.rungs(Side::Bid), &book.rungs(Side::Ask)).unwrap();

    assert_eq!(view.bids.value_at(100.0), 5.0);
    assert_eq!(view.bids.value_at(99.5), 5.0);
    assert_eq!(view.bids.value_at(99.0), 8.0);
    assert_eq!(view.bids.value_at(97.0), 10.0);
    // Above the best bid there is nothing to sell into.
    assert_eq!(view.bids.value_at(100.5), 0.0);
}

#[test]
fn test_ask_curve_steps_outward() {
    let book = book();
    let view = DepthView::from_ladders(&book.rungs(Side::Bid), &book.rungs(Side::Ask)).unwrap();

    assert_eq!(view.asks.value_at(100.5), 0.0);
    assert_eq!(view.asks.value_at(101.0), 2.0);
    assert_eq!(view.asks.value_at(150.0), 6.0);
    assert_eq!(view.mid_price(), Some(100.5));
    assert_eq!(view.x_bounds(), Some((98.0, 102.0)));
    assert_eq!(view.y_max(), 10.0);
}

#[test]
fn test_tooltip_picks_side_by_mid() {
    let book = book();
    let view = DepthView::from_ladders(&book.rungs(Side::Bid), &book.rungs(Side::Ask)).unwrap();

    let bid = view.tooltip_at(99.0).unwrap();
    assert_eq!((bid.side, bid.cumulative), (Side::Bid, 8.0));
    let ask = view.tooltip_at(101.5).unwrap();
    assert_eq!((ask.side, ask.cumulative), (Side::Ask, 2.0));
}

#[test]
fn test_updates_keep_cumulative_monotonic() {
    let mut book = book();
    book.apply_update(Side::Bid, vec![level(dec!(99), dec!(0)), level(dec!(97), dec!(1))]);

    let rungs = book.rungs(Side::Bid);
    let prices: Vec<_> = rungs.iter().map(|r| r.price).collect();
    let totals: Vec<_> = rungs.iter().map(|r| r.cumulative).collect();
    assert_eq!(prices, vec![dec!(100), dec!(98), dec!(97)]);
    assert_eq!(totals, vec![dec!(5), dec!(7), dec!(8)]);
}

#[test]
fn test_out_of_order_points_are_rejected() {
    let err = DepthCurve::from_points(Side::Ask, vec![(101.0, 1.0), (100.0, 2.0)]).unwrap_err();
    assert!(matches!(err, DeskError::InvalidInput(_)));

    let err = DepthCurve::from_points(Side::Bid, vec![(100.0, f64::NAN)]).unwrap_err();
    assert!(matches!(err, DeskError::InvalidInput(_)));
}

#[test]
fn test_empty_book_has_no_bounds() {
    let view = DepthView::from_ladders(&[], &[]).unwrap();
    assert!(view.is_empty());
    assert!(view.x_bounds().is_none());
    assert!(view.mid_price().is_none());
    assert!(view.tooltip_at(100.0).is_none());
}
