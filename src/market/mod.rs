//! Order book core: ladders, depth geometry, market selectors and number
//! formatting.

pub mod depth;
pub mod format;
pub mod ladder;
pub mod selectors;

pub use depth::{DepthCurve, DepthView, Tooltip};
pub use ladder::{LadderBook, OrderRung, RawLevel, Side};
