//! User data returned for a connected address.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{MarketSymbol, OrderSide, OrderType};

/// Open orders, order history and positions for one address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    #[serde(default)]
    pub open_orders: Vec<OpenOrder>,
    #[serde(default)]
    pub order_history: Vec<HistoricalOrder>,
    #[serde(default)]
    pub positions: Vec<Position>,
}

/// A resting order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenOrder {
    pub order_id: String,
    pub symbol: MarketSymbol,
    pub side: OrderSide,
    pub order_type: OrderType,
    /// Absent for market-tagged order types.
    #[serde(default)]
    pub price: Option<Decimal>,
    pub size: Decimal,
    #[serde(default)]
    pub filled: Decimal,
    pub created_at: String,
}

/// Terminal state of a historical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Filled,
    Canceled,
    Expired,
    Rejected,
}

impl OrderStatus {
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Filled => "filled",
            OrderStatus::Canceled => "canceled",
            OrderStatus::Expired => "expired",
            OrderStatus::Rejected => "rejected",
        }
    }
}

/// A completed, canceled or rejected order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalOrder {
    pub order_id: String,
    pub symbol: MarketSymbol,
    pub side: OrderSide,
    pub order_type: OrderType,
    #[serde(default)]
    pub avg_price: Option<Decimal>,
    pub size: Decimal,
    pub status: OrderStatus,
    pub updated_at: String,
}

/// An open derivatives position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: MarketSymbol,
    pub side: OrderSide,
    pub size: Decimal,
    pub entry_price: Decimal,
    pub mark_price: Decimal,
    pub unrealized_pnl: Decimal,
    #[serde(default)]
    pub liquidation_price: Option<Decimal>,
}
