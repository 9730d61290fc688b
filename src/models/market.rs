//! Market list records returned by the data service.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Opaque identifier of a tradable instrument (e.g. `"BTC-PERP"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketSymbol(String);

impl MarketSymbol {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MarketSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MarketSymbol {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Spot pair or perpetual future.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketKind {
    Spot,
    #[default]
    Futures,
}

impl MarketKind {
    pub fn label(self) -> &'static str {
        match self {
            MarketKind::Spot => "spot",
            MarketKind::Futures => "futures",
        }
    }
}

/// Largest scale a `Decimal` can carry.
pub const MAX_PRECISION: u32 = 28;

/// Static and live attributes of one market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    pub symbol: MarketSymbol,
    pub kind: MarketKind,
    pub base: String,
    pub quote: String,
    /// Minimum price increment.
    pub tick_size: Decimal,
    /// Minimum size increment.
    pub step_size: Decimal,
    pub price_precision: u32,
    pub size_precision: u32,
    pub last_price: Decimal,
    /// 24h change in percent.
    pub change_24h: Decimal,
    pub volume_24h: Decimal,
    #[serde(default)]
    pub funding_rate: Option<Decimal>,
    #[serde(default)]
    pub mark_price: Option<Decimal>,
    #[serde(default)]
    pub index_price: Option<Decimal>,
    #[serde(default)]
    pub open_interest: Option<Decimal>,
    /// Symbol used on the streaming feed when it differs from `symbol`.
    #[serde(default)]
    pub feed_symbol: Option<String>,
}

impl MarketData {
    /// Returns the symbol to subscribe to on the streaming feed.
    pub fn feed_symbol(&self) -> &str {
        self.feed_symbol.as_deref().unwrap_or(self.symbol.as_str())
    }

    /// Checks that derivative-only attributes appear only on futures markets,
    /// that increments are positive and that precisions fit a `Decimal`.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::InvalidInput`](crate::DeskError::InvalidInput)
    /// describing the first violation found.
    pub fn validate(&self) -> crate::Result<()> {
        if self.tick_size <= Decimal::ZERO || self.step_size <= Decimal::ZERO {
            return Err(crate::DeskError::InvalidInput(format!(
                "{}: increments must be positive",
                self.symbol
            )));
        }
        if self.price_precision > MAX_PRECISION || self.size_precision > MAX_PRECISION {
            return Err(crate::DeskError::InvalidInput(format!(
                "{}: precision exceeds {MAX_PRECISION} decimal places",
                self.symbol
            )));
        }
        if self.kind == MarketKind::Spot {
            let derivative_fields = [
                ("funding_rate", self.funding_rate.is_some()),
                ("mark_price", self.mark_price.is_some()),
                ("index_price", self.index_price.is_some()),
                ("open_interest", self.open_interest.is_some()),
            ];
            if let Some((name, _)) = derivative_fields.iter().find(|(_, present)| *present) {
                return Err(crate::DeskError::InvalidInput(format!(
                    "{}: spot market carries futures-only field {name}",
                    self.symbol
                )));
            }
        }
        Ok(())
    }
}

/// The full market list, refreshed wholesale on each poll.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    #[serde(default)]
    pub futures: Vec<MarketData>,
    #[serde(default)]
    pub spot: Vec<MarketData>,
}

impl MarketSnapshot {
    pub fn is_empty(&self) -> bool {
        self.futures.is_empty() && self.spot.is_empty()
    }

    /// Drops records that fail [`MarketData::validate`], returning how many
    /// were rejected.
    pub fn retain_valid(&mut self) -> usize {
        let before = self.futures.len() + self.spot.len();
        self.futures
            .retain(|m| m.kind == MarketKind::Futures && m.validate().is_ok());
        self.spot
            .retain(|m| m.kind == MarketKind::Spot && m.validate().is_ok());
        before - (self.futures.len() + self.spot.len())
    }
}
