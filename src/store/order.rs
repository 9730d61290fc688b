//! The order currently being composed on the ticket.

use std::fmt;

use rust_decimal::Decimal;

use super::Reducible;
use crate::market::format::{format_decimal, parse_displayed};
use crate::models::{MarketData, MarketSymbol, OrderSide, OrderType, TimeInForce};

/// Limit price, or the market sentinel for market-tagged order types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderPrice {
    Market,
    Limit(Decimal),
}

impl OrderPrice {
    pub fn limit(self) -> Option<Decimal> {
        match self {
            OrderPrice::Market => None,
            OrderPrice::Limit(price) => Some(price),
        }
    }
}

impl fmt::Display for OrderPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderPrice::Market => f.write_str("MARKET"),
            OrderPrice::Limit(price) => write!(f, "{price}"),
        }
    }
}

/// Everything the ticket needs to submit an order.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentOrder {
    pub market: MarketSymbol,
    pub base: String,
    pub quote: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub price: OrderPrice,
    pub size_base: Decimal,
    pub size_base_text: String,
    pub size_quote: Decimal,
    pub size_quote_text: String,
    pub reduce_only: bool,
    pub post_only: bool,
    pub attach_stop_loss: bool,
    pub attach_take_profit: bool,
    pub time_in_force: TimeInForce,
}

impl Default for CurrentOrder {
    fn default() -> Self {
        Self {
            market: MarketSymbol::new("BTC-PERP"),
            base: "BTC".to_string(),
            quote: "USD".to_string(),
            side: OrderSide::Buy,
            order_type: OrderType::Limit,
            price: OrderPrice::Limit(Decimal::ZERO),
            size_base: Decimal::ZERO,
            size_base_text: String::new(),
            size_quote: Decimal::ZERO,
            size_quote_text: String::new(),
            reduce_only: false,
            post_only: false,
            attach_stop_loss: false,
            attach_take_profit: false,
            time_in_force: TimeInForce::GoodTilCancel,
        }
    }
}

/// Partial update of [`CurrentOrder`]; same merge rules as the market patch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderPatch {
    pub market: Option<MarketSymbol>,
    pub base: Option<String>,
    pub quote: Option<String>,
    pub side: Option<OrderSide>,
    pub order_type: Option<OrderType>,
    pub price: Option<OrderPrice>,
    pub size_base: Option<Decimal>,
    pub size_base_text: Option<String>,
    pub size_quote: Option<Decimal>,
    pub size_quote_text: Option<String>,
    pub reduce_only: Option<bool>,
    pub post_only: Option<bool>,
    pub attach_stop_loss: Option<bool>,
    pub attach_take_profit: Option<bool>,
    pub time_in_force: Option<TimeInForce>,
}

impl OrderPatch {
    /// Points the ticket at `market`, keeping the other fields.
    pub fn market(market: &MarketData) -> Self {
        Self {
            market: Some(market.symbol.clone()),
            base: Some(market.base.clone()),
            quote: Some(market.quote.clone()),
            ..Self::default()
        }
    }

    /// Changes the order type. Market-tagged types also switch the price to
    /// the market sentinel; leaving one restores an empty limit price.
    pub fn order_type(current: &CurrentOrder, order_type: OrderType) -> Self {
        let price = match (order_type.is_market(), current.price) {
            (true, _) => Some(OrderPrice::Market),
            (false, OrderPrice::Market) => Some(OrderPrice::Limit(Decimal::ZERO)),
            (false, OrderPrice::Limit(_)) => None,
        };
        Self {
            order_type: Some(order_type),
            price,
            ..Self::default()
        }
    }

    /// Sets the base size and derives the quote size at `price`, updating
    /// the numeric values and their display strings together.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::InvalidInput`](crate::DeskError::InvalidInput) if
    /// the quote size does not fit in a `Decimal`.
    pub fn size_from_base(
        base: Decimal,
        price: Decimal,
        base_precision: u32,
        quote_precision: u32,
    ) -> crate::Result<Self> {
        let base = base.round_dp(base_precision);
        let quote = base
            .checked_mul(price)
            .ok_or_else(|| {
                crate::DeskError::InvalidInput(format!("size {base} at {price} is too large"))
            })?
            .round_dp(quote_precision);
        Ok(Self {
            size_base: Some(base),
            size_base_text: Some(format_decimal(base, base_precision)),
            size_quote: Some(quote),
            size_quote_text: Some(format_decimal(quote, quote_precision)),
            ..Self::default()
        })
    }
}

/// Builds the patch for clicking a displayed price (order book row or
/// last-price line).
///
/// Market-tagged orders keep their implicit price and yield `None`.
///
/// # Errors
///
/// Returns [`DeskError::InvalidInput`](crate::DeskError::InvalidInput) if
/// the displayed text is not a non-negative number.
pub fn price_click(order: &CurrentOrder, displayed: &str) -> crate::Result<Option<OrderPatch>> {
    if order.order_type.is_market() {
        return Ok(None);
    }
    let price = parse_displayed(displayed)?;
    Ok(Some(OrderPatch {
        price: Some(OrderPrice::Limit(price)),
        ..OrderPatch::default()
    }))
}

impl Reducible for CurrentOrder {
    type Patch = OrderPatch;

    fn apply(&mut self, patch: OrderPatch) {
        if let Some(market) = patch.market {
            self.market = market;
        }
        if let Some(base) = patch.base {
            self.base = base;
        }
        if let Some(quote) = patch.quote {
            self.quote = quote;
        }
        if let Some(side) = patch.side {
            self.side = side;
        }
        if let Some(order_type) = patch.order_type {
            self.order_type = order_type;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(size_base) = patch.size_base {
            self.size_base = size_base;
        }
        if let Some(text) = patch.size_base_text {
            self.size_base_text = text;
        }
        if let Some(size_quote) = patch.size_quote {
            self.size_quote = size_quote;
        }
        if let Some(text) = patch.size_quote_text {
            self.size_quote_text = text;
        }
        if let Some(flag) = patch.reduce_only {
            self.reduce_only = flag;
        }
        if let Some(flag) = patch.post_only {
            self.post_only = flag;
        }
        if let Some(flag) = patch.attach_stop_loss {
            self.attach_stop_loss = flag;
        }
        if let Some(flag) = patch.attach_take_profit {
            self.attach_take_profit = flag;
        }
        if let Some(tif) = patch.time_in_force {
            self.time_in_force = tif;
        }
    }
}
