//! `greenerp-purchasing` — purchase-order workflow domain.
//!
//! The structural core of the service: order/line construction with monetary
//! and emission totals, the status lifecycle, and the stock-effect planner
//! that fires the fulfillment side effect exactly once.

pub mod order;
pub mod status;

pub use order::{LineRequest, Order, OrderLine, PricedLine, PricedOrder, co2_lookup, price_lines};
pub use status::{OrderStatus, StockEffect, stock_effect};
