//! Terminal trading front-end core.
//!
//! Keeps the viewed market's order book and recent trades in a typed
//! [`Store`](store::Store), derives ladder rows and depth curves from it, and
//! composes orders from price clicks. Market data arrives over a websocket
//! feed and a polled REST service.

pub mod config;
pub mod error;
pub mod feed;
pub mod market;
pub mod models;
pub mod query;
pub mod settings;
pub mod store;
pub mod tui;

pub use error::{DeskError, Result};
