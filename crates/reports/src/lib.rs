//! `greenerp-reports` — read-side emission rollups.
//!
//! Everything here is a pure fold over persisted rows; no mutation, no IO.

pub mod emissions;
pub mod recommendations;

pub use emissions::{ItemEmissions, SupplierEmissions, emissions_by_item, emissions_by_supplier};
pub use recommendations::{Recommendation, Recommendations, recommendations};
