//! Order vocabulary shared by the order ticket and user data views.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Order side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    #[default]
    Buy,
    Sell,
}

impl OrderSide {
    /// Returns the opposite side.
    pub fn flip(self) -> Self {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

/// Order type selectable on the ticket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    Market,
    #[default]
    Limit,
    StopMarket,
    StopLimit,
    Trailing,
    ProfitMarket,
    ProfitLimit,
}

impl OrderType {
    /// Every order type in ticket order.
    pub const ALL: [OrderType; 7] = [
        OrderType::Market,
        OrderType::Limit,
        OrderType::StopMarket,
        OrderType::StopLimit,
        OrderType::Trailing,
        OrderType::ProfitMarket,
        OrderType::ProfitLimit,
    ];

    /// Returns `true` for types that execute at the prevailing market price
    /// and therefore carry no user-entered limit price.
    pub fn is_market(self) -> bool {
        match self {
            OrderType::Market | OrderType::StopMarket | OrderType::ProfitMarket => true,
            OrderType::Limit
            | OrderType::StopLimit
            | OrderType::Trailing
            | OrderType::ProfitLimit => false,
        }
    }

    /// Returns the display label.
    pub fn label(self) -> &'static str {
        match self {
            OrderType::Market => "Market",
            OrderType::Limit => "Limit",
            OrderType::StopMarket => "Stop Market",
            OrderType::StopLimit => "Stop Limit",
            OrderType::Trailing => "Trailing Stop",
            OrderType::ProfitMarket => "Take Profit Market",
            OrderType::ProfitLimit => "Take Profit Limit",
        }
    }

    /// Returns the next type in ticket order, wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// How long an order remains active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeInForce {
    #[default]
    #[serde(rename = "GTC")]
    GoodTilCancel,
    #[serde(rename = "IOC")]
    ImmediateOrCancel,
    #[serde(rename = "FOK")]
    FillOrKill,
}

impl TimeInForce {
    pub fn label(self) -> &'static str {
        match self {
            TimeInForce::GoodTilCancel => "GTC",
            TimeInForce::ImmediateOrCancel => "IOC",
            TimeInForce::FillOrKill => "FOK",
        }
    }

    pub fn next(self) -> Self {
        match self {
            TimeInForce::GoodTilCancel => TimeInForce::ImmediateOrCancel,
            TimeInForce::ImmediateOrCancel => TimeInForce::FillOrKill,
            TimeInForce::FillOrKill => TimeInForce::GoodTilCancel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_tagged_types() {
        let market: Vec<_> = OrderType::ALL.into_iter().filter(|t| t.is_market()).collect();
        assert_eq!(
            market,
            vec![OrderType::Market, OrderType::StopMarket, OrderType::ProfitMarket]
        );
    }

    #[test]
    fn next_cycles_through_every_type() {
        let mut ty = OrderType::Market;
        for _ in 0..OrderType::ALL.len() {
            ty = ty.next();
        }
        assert_eq!(ty, OrderType::Market);
    }

    #[test]
    fn order_type_wire_names() {
        assert_eq!(serde_json::to_string(&OrderType::StopLimit).unwrap(), "\"StopLimit\"");
        assert_eq!(serde_json::to_string(&TimeInForce::FillOrKill).unwrap(), "\"FOK\"");
        assert_eq!(serde_json::to_string(&OrderSide::Sell).unwrap(), "\"sell\"");
    }
}
