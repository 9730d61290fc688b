//! Depth curve geometry.
//!
//! A [`DepthCurve`] holds one side's `(price, cumulative size)` points ordered
//! from the best price outward. Walking away from the best price, each rung's
//! cumulative value holds until the next rung is reached, and the last value
//! extends flat past the furthest rung. Prices better than the best rung have
//! no depth.
//!
//! Inputs are validated here, before any geometry is computed: non-finite or
//! negative values and out-of-order points are rejected.

use rust_decimal::prelude::ToPrimitive;

use super::ladder::{OrderRung, Side};
use crate::{DeskError, Result};

/// One validated curve vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthPoint {
    pub price: f64,
    pub cumulative: f64,
}

/// Step curve of cumulative size against price for one side.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthCurve {
    side: Side,
    points: Vec<DepthPoint>,
}

impl DepthCurve {
    /// Builds a curve from a ladder's rungs.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::InvalidInput`] if a value does not convert to a
    /// finite `f64`, is negative, or if the rungs are not ordered from the
    /// best price outward with non-decreasing cumulative size.
    pub fn from_rungs(side: Side, rungs: &[OrderRung]) -> Result<Self> {
        let points = rungs
            .iter()
            .map(|rung| {
                let price = rung.price.to_f64().ok_or_else(|| {
                    DeskError::InvalidInput(format!("price {} out of range", rung.price))
                })?;
                let cumulative = rung.cumulative.to_f64().ok_or_else(|| {
                    DeskError::InvalidInput(format!("size {} out of range", rung.cumulative))
                })?;
                Ok((price, cumulative))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_points(side, points)
    }

    /// Builds a curve from raw `(price, cumulative)` pairs.
    ///
    /// # Errors
    ///
    /// Same conditions as [`DepthCurve::from_rungs`].
    pub fn from_points(side: Side, points: Vec<(f64, f64)>) -> Result<Self> {
        let mut validated: Vec<DepthPoint> = Vec::with_capacity(points.len());
        for (price, cumulative) in points {
            if !price.is_finite() || !cumulative.is_finite() {
                return Err(DeskError::InvalidInput(format!(
                    "non-finite depth point ({price}, {cumulative})"
                )));
            }
            if price <= 0.0 || cumulative < 0.0 {
                return Err(DeskError::InvalidInput(format!(
                    "negative depth point ({price}, {cumulative})"
                )));
            }
            if let Some(prev) = validated.last() {
                let outward = match side {
                    Side::Bid => price < prev.price,
                    Side::Ask => price > prev.price,
                };
                if !outward {
                    return Err(DeskError::InvalidInput(format!(
                        "{} price {price} is not beyond {}",
                        side.label(),
                        prev.price
                    )));
                }
                if cumulative < prev.cumulative {
                    return Err(DeskError::InvalidInput(format!(
                        "cumulative size decreases at {price}"
                    )));
                }
            }
            validated.push(DepthPoint { price, cumulative });
        }
        Ok(Self {
            side,
            points: validated,
        })
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn points(&self) -> &[DepthPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn best_price(&self) -> Option<f64> {
        self.points.first().map(|p| p.price)
    }

    pub fn furthest_price(&self) -> Option<f64> {
        self.points.last().map(|p| p.price)
    }

    pub fn max_cumulative(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.cumulative)
    }

    /// Cumulative size available at `price` or better.
    pub fn value_at(&self, price: f64) -> f64 {
        let mut value = 0.0;
        for point in &self.points {
            let reached = match self.side {
                Side::Bid => point.price >= price,
                Side::Ask => point.price <= price,
            };
            if !reached {
                break;
            }
            value = point.cumulative;
        }
        value
    }

    /// Step vertices in ascending price order, extended flat to `far_edge`.
    ///
    /// The outline starts on the baseline at the best price, rises to the
    /// first cumulative value, and alternates horizontal and vertical
    /// segments outward.
    pub fn outline(&self, far_edge: f64) -> Vec<(f64, f64)> {
        let Some(first) = self.points.first() else {
            return Vec::new();
        };

        let mut vertices = Vec::with_capacity(self.points.len() * 2 + 2);
        vertices.push((first.price, 0.0));
        vertices.push((first.price, first.cumulative));
        for pair in self.points.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            vertices.push((next.price, prev.cumulative));
            vertices.push((next.price, next.cumulative));
        }
        let last = self.points[self.points.len() - 1];
        let beyond = match self.side {
            Side::Bid => far_edge < last.price,
            Side::Ask => far_edge > last.price,
        };
        if beyond {
            vertices.push((far_edge, last.cumulative));
        }

        if self.side == Side::Bid {
            vertices.reverse();
        }
        vertices
    }
}

/// Value under the chart cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tooltip {
    pub price: f64,
    pub side: Side,
    pub cumulative: f64,
}

/// Both depth curves plus the shared plotting bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthView {
    pub bids: DepthCurve,
    pub asks: DepthCurve,
}

impl DepthView {
    /// Validates both ladders and builds the view.
    ///
    /// # Errors
    ///
    /// Propagates the first validation failure from either side.
    pub fn from_ladders(bids: &[OrderRung], asks: &[OrderRung]) -> Result<Self> {
        Ok(Self {
            bids: DepthCurve::from_rungs(Side::Bid, bids)?,
            asks: DepthCurve::from_rungs(Side::Ask, asks)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Price range covered by both sides, or `None` when both are empty.
    pub fn x_bounds(&self) -> Option<(f64, f64)> {
        let prices = self
            .bids
            .points()
            .iter()
            .chain(self.asks.points())
            .map(|p| p.price);
        let (lo, hi) = prices.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p), hi.max(p))
        });
        if lo.is_finite() && hi.is_finite() {
            Some((lo, hi))
        } else {
            None
        }
    }

    /// Largest cumulative size on either side.
    pub fn y_max(&self) -> f64 {
        self.bids.max_cumulative().max(self.asks.max_cumulative())
    }

    /// Midpoint between the best bid and best ask, when both exist.
    pub fn mid_price(&self) -> Option<f64> {
        match (self.bids.best_price(), self.asks.best_price()) {
            (Some(bid), Some(ask)) => Some((bid + ask) / 2.0),
            (Some(bid), None) => Some(bid),
            (None, Some(ask)) => Some(ask),
            (None, None) => None,
        }
    }

    /// Returns the side and cumulative size under `price`.
    ///
    /// Prices at or below the mid price read the bid curve; prices above it
    /// read the ask curve.
    pub fn tooltip_at(&self, price: f64) -> Option<Tooltip> {
        let mid = self.mid_price()?;
        let curve = if price <= mid { &self.bids } else { &self.asks };
        Some(Tooltip {
            price,
            side: curve.side(),
            cumulative: curve.value_at(price),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bid_curve() -> DepthCurve {
        DepthCurve::from_points(Side::Bid, vec![(100.0, 5.0), (99.0, 8.0), (98.0, 10.0)]).unwrap()
    }

    #[test]
    fn bid_steps_hold_walking_down() {
        let curve = bid_curve();
        assert_eq!(curve.value_at(101.0), 0.0);
        assert_eq!(curve.value_at(100.0), 5.0);
        assert_eq!(curve.value_at(99.5), 5.0);
        assert_eq!(curve.value_at(99.0), 8.0);
        assert_eq!(curve.value_at(98.5), 8.0);
        assert_eq!(curve.value_at(97.0), 10.0);
    }

    #[test]
    fn ask_steps_hold_walking_up() {
        let curve =
            DepthCurve::from_points(Side::Ask, vec![(101.0, 2.0), (102.0, 5.0)]).unwrap();
        assert_eq!(curve.value_at(100.0), 0.0);
        assert_eq!(curve.value_at(101.5), 2.0);
        assert_eq!(curve.value_at(102.0), 5.0);
        assert_eq!(curve.value_at(250.0), 5.0);
    }

    #[test]
    fn bid_outline_is_ascending_and_extended() {
        let outline = bid_curve().outline(95.0);
        assert_eq!(
            outline,
            vec![
                (95.0, 10.0),
                (98.0, 10.0),
                (98.0, 8.0),
                (99.0, 8.0),
                (99.0, 5.0),
                (100.0, 5.0),
                (100.0, 0.0),
            ]
        );
    }

    #[test]
    fn ask_outline_starts_on_baseline() {
        let curve =
            DepthCurve::from_points(Side::Ask, vec![(101.0, 2.0), (102.0, 5.0)]).unwrap();
        assert_eq!(
            curve.outline(102.0),
            vec![(101.0, 0.0), (101.0, 2.0), (102.0, 2.0), (102.0, 5.0)]
        );
    }

    #[test]
    fn rejects_nan_and_negative_points() {
        assert!(DepthCurve::from_points(Side::Bid, vec![(f64::NAN, 1.0)]).is_err());
        assert!(DepthCurve::from_points(Side::Bid, vec![(100.0, f64::INFINITY)]).is_err());
        assert!(DepthCurve::from_points(Side::Ask, vec![(100.0, -1.0)]).is_err());
    }

    #[test]
    fn rejects_unsorted_points() {
        let err = DepthCurve::from_points(Side::Bid, vec![(98.0, 1.0), (99.0, 2.0)]);
        assert!(err.is_err());
        let err = DepthCurve::from_points(Side::Ask, vec![(101.0, 3.0), (102.0, 2.0)]);
        assert!(err.is_err());
    }

    #[test]
    fn empty_curve_has_no_outline() {
        let curve = DepthCurve::from_points(Side::Ask, Vec::new()).unwrap();
        assert!(curve.outline(10.0).is_empty());
        assert_eq!(curve.value_at(10.0), 0.0);
    }

    #[test]
    fn tooltip_reads_side_by_mid_price() {
        let view = DepthView {
            bids: bid_curve(),
            asks: DepthCurve::from_points(Side::Ask, vec![(101.0, 2.0)]).unwrap(),
        };
        assert_eq!(view.mid_price(), Some(100.5));
        assert_eq!(view.x_bounds(), Some((98.0, 101.0)));
        assert_eq!(view.y_max(), 10.0);

        let tip = view.tooltip_at(99.0).unwrap();
        assert_eq!(tip.side, Side::Bid);
        assert_eq!(tip.cumulative, 8.0);

        let tip = view.tooltip_at(101.0).unwrap();
        assert_eq!(tip.side, Side::Ask);
        assert_eq!(tip.cumulative, 2.0);
    }
}
