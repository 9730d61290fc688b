//! Terminal user interface.
//!
//! A ratatui front-end over the market and order stores: market list,
//! order book with depth bars, depth chart, order ticket and portfolio.

pub mod app;
pub mod components;
pub mod event;
pub mod input;
pub mod tabs;
pub mod terminal;
pub mod theme;
pub mod ui;

pub use app::{Action, App};
pub use event::{Event, Message, update};
pub use terminal::{Tui, restore_terminal, setup_terminal};
pub use ui::render;
