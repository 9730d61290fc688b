//! Reusable UI components.

pub mod depth_chart;
pub mod fallback;
pub mod market_list;
pub mod order_ticket;
pub mod orderbook;
pub mod status_bar;
pub mod tab_bar;
pub mod trades;
