//! Tab layouts.

pub mod markets;
pub mod portfolio;
pub mod trade;
